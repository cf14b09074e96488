use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json},
    Result,
};
use serde::{Deserialize, Serialize};

use auth::require_organizer;
use db::{
    get_conn,
    models::{Question, Session},
    PgPool,
};
use errors::Error;

#[derive(Clone, Deserialize, Serialize)]
pub struct ImportQuestionsRequest {
    pub bank_ids: Vec<i32>,
}

#[derive(Deserialize, Serialize)]
pub struct ImportQuestionsResponse {
    pub imported: usize,
}

/// Copies bank questions into the organizer's session. The bank rows
/// themselves are never modified.
pub async fn import(
    id: Identity,
    pool: Data<PgPool>,
    params: Json<ImportQuestionsRequest>,
) -> Result<Json<ImportQuestionsResponse>, Error> {
    let (claim, _) = require_organizer(id)?;
    if params.bank_ids.is_empty() {
        return Err(Error::BadRequest("bank_ids must not be empty".to_string()));
    }

    let imported = block(move || {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_id(&conn, claim.session_id)?;
        Question::import_from_bank(&conn, &session, &params.bank_ids)
    })
    .await??;

    Ok(Json(ImportQuestionsResponse { imported }))
}
