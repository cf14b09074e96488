use dotenv::dotenv;

use db::{get_conn, models::Question, new_pool};

fn main() {
    dotenv().ok();

    let pool = new_pool();
    let conn = get_conn(&pool).unwrap();

    let bank: Vec<(&str, Vec<&str>, i32, i32)> = vec![
        (
            "Which planet is closest to the sun?",
            vec!["Venus", "Mercury", "Mars", "Earth"],
            1,
            100,
        ),
        (
            "What is the chemical symbol for gold?",
            vec!["Ag", "Gd", "Au", "Go"],
            2,
            100,
        ),
        (
            "How many continents are there?",
            vec!["Five", "Six", "Seven", "Eight"],
            2,
            50,
        ),
        (
            "Which language has the most native speakers?",
            vec!["English", "Mandarin Chinese", "Spanish", "Hindi"],
            1,
            150,
        ),
    ];

    for (question_text, options, correct_index, points) in bank {
        Question::create_bank(
            &conn,
            question_text.to_string(),
            options.into_iter().map(String::from).collect(),
            correct_index,
            points,
        )
        .unwrap();
    }
}
