use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json, Path},
    Result,
};

use auth::require_organizer;
use db::{get_conn, models::Question, PgPool};
use errors::Error;

/// Removes a bank template. Copies already imported into sessions are
/// unaffected.
pub async fn delete(
    id: Identity,
    pool: Data<PgPool>,
    bank_id: Path<i32>,
) -> Result<Json<()>, Error> {
    require_organizer(id)?;
    let bank_id = bank_id.into_inner();

    block(move || {
        let conn = get_conn(&pool)?;
        Question::delete_from_bank(&conn, bank_id)
    })
    .await??;

    Ok(Json(()))
}
