use actix_web::{
    web::{block, Data, Json},
    HttpRequest, Result,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::{
    get_conn,
    models::{Participant, RateLimit, RateLimitCategory, Session},
    PgPool,
};
use errors::Error;

use crate::routes::peer_identifier;
use crate::validate::validate;

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct JoinRequest {
    #[validate(length(min = "2"))]
    name: String,
    #[validate(length(equal = "6"))]
    code: String,
}

/// The joiner gets the session state alongside their own record, so no
/// follow-up load is needed to render the lobby.
#[derive(Deserialize, Serialize)]
pub struct JoinResponse {
    pub session: Session,
    pub participant: Participant,
}

pub async fn join(
    req: HttpRequest,
    pool: Data<PgPool>,
    params: Json<JoinRequest>,
) -> Result<Json<JoinResponse>, Error> {
    validate(&params)?;
    let identifier = peer_identifier(&req);

    let response = block(move || -> Result<JoinResponse, Error> {
        let conn = get_conn(&pool)?;
        RateLimit::check(&conn, RateLimitCategory::Join, &identifier)?;
        let session = Session::find_by_code(&conn, &params.code)?;
        let participant = Participant::create(&conn, &session, &params.name)?;
        Ok(JoinResponse {
            session,
            participant,
        })
    })
    .await??;

    Ok(Json(response))
}
