#[cfg(test)]
#[macro_use]
extern crate diesel;
#[macro_use]
extern crate log;
#[macro_use]
extern crate validator_derive;

use std::env;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpResponse, HttpServer};
use dotenv::dotenv;

mod middleware;
mod routes;
mod tests;
mod validate;

use crate::routes::routes;
use errors::ErrorResponse;

#[actix_rt::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init();

    let pool = db::new_pool();

    let conn = db::get_conn(&pool).expect("Failed to get connection for migrations");
    db::run_migrations(&conn).expect("Failed to run migrations");
    info!("migrations are up to date");

    HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&env::var("CLIENT_HOST").unwrap())
            .allow_any_method()
            .allowed_headers(vec![
                http::header::AUTHORIZATION,
                http::header::ACCEPT,
                http::header::CONTENT_TYPE,
            ])
            .max_age(3600);

        App::new()
            .wrap(cors)
            .wrap(Logger::default())
            .wrap(auth::get_identity_service())
            .data(pool.clone())
            .configure(routes)
            .default_service(web::route().to(|| async {
                HttpResponse::NotFound().json(ErrorResponse::from("Not Found"))
            }))
    })
    .bind("0.0.0.0:8080")?
    .run()
    .await
}
