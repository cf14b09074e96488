use actix_web::{
    web::{block, Data, Json},
    HttpRequest, Result,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use db::{
    get_conn,
    models::{RateLimit, RateLimitCategory, Session},
    PgPool,
};
use errors::Error;

use crate::routes::peer_identifier;
use crate::validate::validate;

#[derive(Clone, Deserialize, Serialize, Validate)]
pub struct CreateSessionRequest {
    #[validate(length(min = "1"))]
    title: String,
}

/// The only response that carries the organizer token.
#[derive(Deserialize, Serialize)]
pub struct CreateSessionResponse {
    pub id: i32,
    pub code: String,
    pub title: String,
    pub token: String,
}

pub async fn create(
    req: HttpRequest,
    pool: Data<PgPool>,
    params: Json<CreateSessionRequest>,
) -> Result<Json<CreateSessionResponse>, Error> {
    validate(&params)?;
    let identifier = peer_identifier(&req);

    let session = block(move || -> Result<Session, Error> {
        let conn = get_conn(&pool)?;
        RateLimit::check(&conn, RateLimitCategory::Login, &identifier)?;
        let session = Session::create(&conn, params.title.clone())?;
        RateLimit::reset(&conn, RateLimitCategory::Login, &identifier)?;
        Ok(session)
    })
    .await??;

    let token = session.organizer.unwrap_or_default();
    Ok(Json(CreateSessionResponse {
        id: session.id,
        code: session.code,
        title: session.title,
        token,
    }))
}
