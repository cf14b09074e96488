use actix_web::{
    web::{block, Data, Json, Query},
    Result,
};
use serde::Deserialize;

use db::{
    get_conn,
    models::{Session, SessionSummary, DEFAULT_SESSION_LIST_LIMIT},
    PgPool,
};
use errors::Error;

#[derive(Deserialize)]
pub struct ListSessionsParams {
    limit: Option<i64>,
}

pub async fn list(
    pool: Data<PgPool>,
    params: Query<ListSessionsParams>,
) -> Result<Json<Vec<SessionSummary>>, Error> {
    let limit = params.limit.unwrap_or(DEFAULT_SESSION_LIST_LIMIT).max(1);

    let summaries = block(move || {
        let conn = get_conn(&pool)?;
        Session::list(&conn, limit)
    })
    .await??;

    Ok(Json(summaries))
}
