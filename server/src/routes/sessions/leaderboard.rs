use actix_web::{
    web::{block, Data, Json, Path, Query},
    Result,
};
use serde::Deserialize;

use db::{
    get_conn,
    models::{compute_leaderboard, LeaderboardEntry, Session, DEFAULT_LEADERBOARD_LIMIT},
    PgPool,
};
use errors::Error;

#[derive(Deserialize)]
pub struct LeaderboardParams {
    limit: Option<i64>,
}

/// Public, and still served after the session ends.
pub async fn leaderboard(
    pool: Data<PgPool>,
    code: Path<String>,
    params: Query<LeaderboardParams>,
) -> Result<Json<Vec<LeaderboardEntry>>, Error> {
    let code = code.into_inner();
    let limit = params.limit.unwrap_or(DEFAULT_LEADERBOARD_LIMIT).max(1);

    let entries = block(move || {
        let conn = get_conn(&pool)?;
        let session = Session::find_by_code(&conn, &code)?;
        compute_leaderboard(&conn, session.id, limit)
    })
    .await??;

    Ok(Json(entries))
}
