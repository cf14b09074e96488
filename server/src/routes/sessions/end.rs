use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json, Path},
    Result,
};

use auth::require_organizer;
use db::{get_conn, models::Session, PgPool};
use errors::Error;

/// Organizer-only, and only for the session named in the claim.
/// Ending twice is a no-op that returns the already ended session.
pub async fn end(
    id: Identity,
    pool: Data<PgPool>,
    code: Path<String>,
) -> Result<Json<Session>, Error> {
    let (claim, _) = require_organizer(id)?;
    let code = code.into_inner();

    let session = block(move || {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_code(&conn, &code)?;
        if session.id != claim.session_id {
            return Err(Error::Forbidden);
        }
        Session::end(&conn, &session.code)
    })
    .await??;

    Ok(Json(session))
}
