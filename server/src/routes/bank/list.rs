use actix_identity::Identity;
use actix_web::{
    web::{block, Data, Json},
    Result,
};

use auth::require_organizer;
use db::{get_conn, models::Question, PgPool};
use errors::Error;

pub async fn list(id: Identity, pool: Data<PgPool>) -> Result<Json<Vec<Question>>, Error> {
    require_organizer(id)?;

    let questions = block(move || {
        let conn = get_conn(&pool)?;
        Question::list_bank(&conn)
    })
    .await??;

    Ok(Json(questions))
}
