use actix_web::{
    web::{block, Data, Json, Path},
    Result,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use db::{
    get_conn,
    models::{Question, Session},
    PgPool,
};
use errors::Error;

#[derive(Debug, Deserialize, Serialize)]
pub struct SessionStatusResponse {
    pub id: i32,
    pub code: String,
    pub title: String,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub question_count: usize,
}

/// Public view of a session. Stays readable after the session ends so
/// participants can check results.
pub async fn status(
    pool: Data<PgPool>,
    code: Path<String>,
) -> Result<Json<SessionStatusResponse>, Error> {
    let code = code.into_inner();

    let response = block(move || -> Result<SessionStatusResponse, Error> {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_code(&conn, &code)?;
        let questions = Question::list_for_session(&conn, session.id)?;

        Ok(SessionStatusResponse {
            id: session.id,
            code: session.code,
            title: session.title,
            created_at: session.created_at,
            ended_at: session.ended_at,
            question_count: questions.len(),
        })
    })
    .await??;

    Ok(Json(response))
}
