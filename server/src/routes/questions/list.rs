use actix_web::{
    web::{block, Data, Json, Path},
    Result,
};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{Question, Session},
    PgPool,
};
use errors::Error;

/// What participants are shown: everything except the answer key.
#[derive(Debug, Deserialize, Serialize)]
pub struct QuestionView {
    pub id: i32,
    pub order_no: Option<i32>,
    pub question_text: String,
    pub options: Vec<String>,
    pub points: i32,
}

impl From<Question> for QuestionView {
    fn from(question: Question) -> Self {
        QuestionView {
            id: question.id,
            order_no: question.order_no,
            question_text: question.question_text,
            options: question.options,
            points: question.points,
        }
    }
}

pub async fn list(pool: Data<PgPool>, code: Path<String>) -> Result<Json<Vec<QuestionView>>, Error> {
    let code = code.into_inner();

    let questions = block(move || {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_code(&conn, &code)?;
        Question::list_for_session(&conn, session.id)
    })
    .await??;

    Ok(Json(questions.into_iter().map(QuestionView::from).collect()))
}

#[cfg(test)]
mod tests {
    use diesel::{self, RunQueryDsl};

    use db::{
        get_conn,
        models::Session,
        new_pool,
        schema::{questions, sessions},
    };

    use super::QuestionView;
    use crate::tests::helpers::tests::test_get;

    #[derive(Insertable)]
    #[table_name = "sessions"]
    struct NewSession {
        code: String,
        title: String,
    }

    #[derive(Insertable)]
    #[table_name = "questions"]
    struct NewQuestion {
        session_id: Option<i32>,
        order_no: Option<i32>,
        question_text: String,
        options: Vec<String>,
        correct_index: i32,
        points: i32,
    }

    #[actix_rt::test]
    async fn test_list_questions_in_order_without_answer_key() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        diesel::delete(questions::table).execute(&conn).unwrap();
        diesel::delete(sessions::table).execute(&conn).unwrap();

        let session: Session = diesel::insert_into(sessions::table)
            .values(NewSession {
                code: "QLST22".to_string(),
                title: "Quiz night".to_string(),
            })
            .get_result(&conn)
            .unwrap();

        for (order_no, text) in &[(2, "Second"), (1, "First")] {
            diesel::insert_into(questions::table)
                .values(NewQuestion {
                    session_id: Some(session.id),
                    order_no: Some(*order_no),
                    question_text: text.to_string(),
                    options: vec!["a".to_string(), "b".to_string()],
                    correct_index: 1,
                    points: 10,
                })
                .execute(&conn)
                .unwrap();
        }

        let res: (u16, Vec<QuestionView>) = test_get("/api/sessions/QLST22/questions", None).await;

        assert_eq!(res.0, 200);
        assert_eq!(res.1.len(), 2);
        assert_eq!(res.1[0].question_text, "First");
        assert_eq!(res.1[1].question_text, "Second");

        let raw: (u16, Vec<serde_json::Value>) =
            test_get("/api/sessions/QLST22/questions", None).await;
        assert!(raw.1[0].get("correct_index").is_none());

        diesel::delete(questions::table).execute(&conn).unwrap();
        diesel::delete(sessions::table).execute(&conn).unwrap();
    }
}
