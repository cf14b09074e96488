#[cfg(test)]
pub mod tests {
    use std::env;
    use std::sync::Once;

    use actix_http::Request;
    use actix_web::{
        body::MessageBody,
        dev::{Service, ServiceResponse},
        error::Error,
        test, App,
    };
    use serde::{de::DeserializeOwned, Serialize};

    use auth::{create_jwt, get_identity_service, PrivateClaim};

    use crate::routes::routes;

    static INIT: Once = Once::new();

    /// One-time test process setup: env, signing key, schema.
    pub fn initialize() {
        INIT.call_once(|| {
            dotenv::dotenv().ok();
            if env::var("JWT_KEY").is_err() {
                env::set_var("JWT_KEY", "test-jwt-key");
            }
            let pool = db::new_pool();
            let conn = db::get_conn(&pool).unwrap();
            db::run_migrations(&conn).unwrap();
        });
    }

    pub async fn get_service(
    ) -> impl Service<Request, Response = ServiceResponse<impl MessageBody>, Error = Error> {
        initialize();
        test::init_service(
            App::new()
                .wrap(get_identity_service())
                .data(db::new_pool())
                .configure(routes),
        )
        .await
    }

    fn read_json<R>(body: &[u8], status: u16) -> R
    where
        R: DeserializeOwned,
    {
        serde_json::from_slice(body).unwrap_or_else(|_| {
            panic!(
                "response deserialization failed. response: {} status: {}",
                String::from_utf8(body.to_vec())
                    .unwrap_or_else(|_| "Could not convert Bytes -> String".to_string()),
                status
            )
        })
    }

    /// Helper for HTTP GET integration tests
    pub async fn test_get<R>(route: &str, token: Option<String>) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        let app = get_service().await;
        let mut req = test::TestRequest::get().uri(route);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", token));
        }

        let res = test::call_service(&app, req.to_request()).await;

        let status = res.status().as_u16();
        let body = test::read_body(res).await;
        (status, read_json(&body, status))
    }

    /// Helper for HTTP POST integration tests
    pub async fn test_post<T: Serialize, R>(
        route: &str,
        params: T,
        token: Option<String>,
    ) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        let app = get_service().await;

        let mut req = test::TestRequest::post().set_json(&params).uri(route);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", token));
        }

        let res = test::call_service(&app, req.to_request()).await;

        let status = res.status().as_u16();
        let body = test::read_body(res).await;
        (status, read_json(&body, status))
    }

    /// Helper for HTTP DELETE integration tests
    pub async fn test_delete<R>(route: &str, token: Option<String>) -> (u16, R)
    where
        R: DeserializeOwned,
    {
        let app = get_service().await;
        let mut req = test::TestRequest::delete().uri(route);
        if let Some(token) = token {
            req = req.insert_header(("Authorization", token));
        }

        let res = test::call_service(&app, req.to_request()).await;

        let status = res.status().as_u16();
        let body = test::read_body(res).await;
        (status, read_json(&body, status))
    }

    pub fn get_auth_token(private_claim: PrivateClaim) -> String {
        initialize();
        create_jwt(private_claim).unwrap()
    }
}
