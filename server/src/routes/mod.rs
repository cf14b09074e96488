use actix_web::{web, HttpRequest};

use crate::middleware::Auth;

pub mod answers;
pub mod bank;
pub mod questions;
pub mod sessions;

/// Rate-limit identifier for anonymous callers. Tests and direct
/// connections without a peer address all share one bucket.
pub(crate) fn peer_identifier(req: &HttpRequest) -> String {
    req.peer_addr()
        .map(|addr| addr.ip().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}

pub fn routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("").service(
            web::scope("/api")
                .service(
                    web::scope("/sessions")
                        .service(
                            web::resource("")
                                .route(web::post().to(sessions::create))
                                .route(web::get().to(sessions::list)),
                        )
                        .service(web::scope("/join").route("", web::post().to(sessions::join)))
                        .service(
                            web::scope("/{code}")
                                .route("", web::get().to(sessions::status))
                                .route("/leaderboard", web::get().to(sessions::leaderboard))
                                .route("/questions", web::get().to(questions::list))
                                .service(
                                    web::scope("/end")
                                        .wrap(Auth)
                                        .route("", web::post().to(sessions::end)),
                                ),
                        ),
                )
                .service(
                    web::scope("/questions")
                        .wrap(Auth)
                        .route("", web::post().to(questions::create))
                        .route("/import", web::post().to(questions::import)),
                )
                .service(
                    web::scope("/bank")
                        .wrap(Auth)
                        .service(
                            web::resource("")
                                .route(web::get().to(bank::list))
                                .route(web::post().to(bank::create)),
                        )
                        .route("/{id}", web::delete().to(bank::delete)),
                )
                .service(
                    web::scope("/answers")
                        .wrap(Auth)
                        .route("", web::post().to(answers::create)),
                ),
        ),
    );
}
