use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json},
    Result,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use auth::require_organizer;
use db::{
    get_conn,
    models::{Question, Session},
    PgPool,
};
use errors::Error;

use crate::validate::validate;

fn default_points() -> i32 {
    10
}

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct CreateQuestionRequest {
    #[validate(length(min = "1"))]
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: i32,
    #[serde(default = "default_points")]
    pub points: i32,
}

/// Appends a question to the organizer's own session, taken from the
/// claim rather than the request body.
pub async fn create(
    id: Identity,
    pool: Data<PgPool>,
    params: Json<CreateQuestionRequest>,
) -> Result<Json<Question>, Error> {
    validate(&params)?;
    let (claim, _) = require_organizer(id)?;

    let question = block(move || {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_id(&conn, claim.session_id)?;
        Question::create_for_session(
            &conn,
            &session,
            params.question_text.clone(),
            params.options.clone(),
            params.correct_index,
            params.points,
        )
    })
    .await??;

    Ok(Json(question))
}
