use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json},
    Result,
};
use serde::{Deserialize, Serialize};

use auth::participant_identity;
use db::{
    get_conn,
    models::{Answer, RateLimit, RateLimitCategory},
    PgPool,
};
use errors::Error;

#[derive(Clone, Deserialize, Serialize)]
pub struct SubmitAnswerRequest {
    pub question_id: i32,
    pub answer_index: i32,
}

/// The participant and session come from the claim, so a submission
/// can only ever land in the session its author joined.
pub async fn create(
    id: Identity,
    pool: Data<PgPool>,
    params: Json<SubmitAnswerRequest>,
) -> Result<Json<Answer>, Error> {
    let claim = participant_identity(id)?;

    let answer = block(move || {
        let conn = get_conn(&pool)?;
        RateLimit::check(&conn, RateLimitCategory::Answer, &claim.id.to_string())?;
        Answer::create(
            &conn,
            claim.id,
            claim.session_id,
            params.question_id,
            params.answer_index,
        )
    })
    .await??;

    Ok(Json(answer))
}

#[cfg(test)]
mod tests {
    use chrono::{DateTime, Utc};
    use diesel::{self, QueryDsl, RunQueryDsl};

    use auth::{PrivateClaim, Role};
    use db::{
        get_conn,
        models::{Answer, Participant, Question, Session},
        new_pool,
        schema::{answers, participants, questions, rate_limits, sessions},
    };
    use errors::ErrorResponse;

    use super::SubmitAnswerRequest;
    use crate::tests::helpers::tests::{get_auth_token, test_post};

    #[derive(Insertable)]
    #[table_name = "sessions"]
    struct NewSession {
        code: String,
        title: String,
        ended_at: Option<DateTime<Utc>>,
    }

    #[derive(Insertable)]
    #[table_name = "participants"]
    struct NewParticipant {
        session_id: i32,
        display_name: String,
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

    fn insert_session(conn: &db::Connection, code: &str, ended: bool) -> Session {
        diesel::insert_into(sessions::table)
            .values(NewSession {
                code: code.to_string(),
                title: "Quiz night".to_string(),
                ended_at: if ended { Some(Utc::now()) } else { None },
            })
            .get_result(conn)
            .unwrap()
    }

    fn insert_participant(conn: &db::Connection, session_id: i32, name: &str) -> Participant {
        diesel::insert_into(participants::table)
            .values(NewParticipant {
                session_id,
                display_name: name.to_string(),
            })
            .get_result(conn)
            .unwrap()
    }

    fn insert_question(conn: &db::Connection, session_id: i32) -> Question {
        diesel::insert_into(questions::table)
            .values(NewQuestion {
                session_id: Some(session_id),
                order_no: Some(1),
                question_text: "Largest planet?".to_string(),
                options: vec!["Jupiter".to_string(), "Saturn".to_string()],
                correct_index: 0,
                points: 10,
            })
            .get_result(conn)
            .unwrap()
    }

    fn participant_token(participant: &Participant) -> String {
        get_auth_token(PrivateClaim::new(
            participant.id,
            participant.display_name.clone(),
            participant.session_id,
            Role::Participant,
        ))
    }

    fn clean(conn: &db::Connection) {
        diesel::delete(answers::table).execute(conn).unwrap();
        diesel::delete(questions::table).execute(conn).unwrap();
        diesel::delete(participants::table).execute(conn).unwrap();
        diesel::delete(sessions::table).execute(conn).unwrap();
        diesel::delete(rate_limits::table).execute(conn).unwrap();
    }

    #[actix_rt::test]
    async fn test_submit_correct_answer_earns_points() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW22", false);
        let participant = insert_participant(&conn, session.id, "casey");
        let question = insert_question(&conn, session.id);

        let res: (u16, Answer) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 0,
            },
            Some(participant_token(&participant)),
        )
        .await;

        assert_eq!(res.0, 200);
        assert_eq!(res.1.is_correct, true);
        assert_eq!(res.1.points_earned, 10);
        assert_eq!(res.1.participant_id, participant.id);

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_wrong_and_out_of_range_answers() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW33", false);
        let wrong = insert_participant(&conn, session.id, "wrong");
        let outlier = insert_participant(&conn, session.id, "outlier");
        let question = insert_question(&conn, session.id);

        let res: (u16, Answer) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 1,
            },
            Some(participant_token(&wrong)),
        )
        .await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.is_correct, false);
        assert_eq!(res.1.points_earned, 0);

        // an index past the options is graded as incorrect, not rejected
        let res: (u16, Answer) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 9,
            },
            Some(participant_token(&outlier)),
        )
        .await;
        assert_eq!(res.0, 200);
        assert_eq!(res.1.is_correct, false);

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_answer_twice_keeps_first() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW44", false);
        let participant = insert_participant(&conn, session.id, "casey");
        let question = insert_question(&conn, session.id);
        let token = participant_token(&participant);

        let first: (u16, Answer) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 1,
            },
            Some(token.clone()),
        )
        .await;
        assert_eq!(first.0, 200);

        let second: (u16, ErrorResponse) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 0,
            },
            Some(token),
        )
        .await;
        assert_eq!(second.0, 409);

        let stored: Answer = answers::table.find(first.1.id).first(&conn).unwrap();
        assert_eq!(stored.answer_index, 1);
        assert_eq!(stored.points_earned, 0);

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_answer_after_session_end() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW55", true);
        let participant = insert_participant(&conn, session.id, "casey");
        let question = insert_question(&conn, session.id);

        let res: (u16, ErrorResponse) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 0,
            },
            Some(participant_token(&participant)),
        )
        .await;
        assert_eq!(res.0, 409);
        assert_eq!(res.1.errors[0], "Session has ended");

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_answer_for_other_sessions_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW66", false);
        let other = insert_session(&conn, "ANSW77", false);
        let participant = insert_participant(&conn, session.id, "casey");
        let question = insert_question(&conn, other.id);

        let res: (u16, ErrorResponse) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 0,
            },
            Some(participant_token(&participant)),
        )
        .await;
        assert_eq!(res.0, 400);

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_answer_unknown_question() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW88", false);
        let participant = insert_participant(&conn, session.id, "casey");

        let res: (u16, ErrorResponse) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: 99999,
                answer_index: 0,
            },
            Some(participant_token(&participant)),
        )
        .await;
        assert_eq!(res.0, 404);

        clean(&conn);
    }

    #[actix_rt::test]
    async fn test_submit_answer_forbidden_for_organizers() {
        let pool = new_pool();
        let conn = get_conn(&pool).unwrap();
        clean(&conn);

        let session = insert_session(&conn, "ANSW99", false);
        let question = insert_question(&conn, session.id);
        let token = get_auth_token(PrivateClaim::new(
            session.id,
            session.code.clone(),
            session.id,
            Role::Organizer,
        ));

        let res: (u16, ErrorResponse) = test_post(
            "/api/answers",
            SubmitAnswerRequest {
                question_id: question.id,
                answer_index: 0,
            },
            Some(token),
        )
        .await;
        assert_eq!(res.0, 403);

        clean(&conn);
    }
}
