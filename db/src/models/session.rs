use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DBError};
use diesel::sql_types::{BigInt, Integer, Nullable, Timestamptz, Varchar};
use diesel::{self, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use auth::{create_jwt, PrivateClaim, Role};
use errors::Error;

use crate::schema::sessions;
use crate::utils::generate_code;

/// How many collisions with existing codes we tolerate before giving up.
const CODE_ATTEMPTS: u32 = 5;

pub const DEFAULT_SESSION_LIST_LIMIT: i64 = 20;

#[derive(Debug, Deserialize, Identifiable, Queryable, Serialize)]
pub struct Session {
    pub id: i32,
    pub code: String,
    pub title: String,
    // The organizer column holds the session's owner token; it is only
    // handed out once, by the create response.
    #[serde(default, skip_serializing)]
    pub organizer: Option<String>,
    pub created_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
}

#[derive(Insertable)]
#[table_name = "sessions"]
struct NewSession {
    code: String,
    title: String,
}

/// Listing row: a session annotated with how many participants joined.
#[derive(Debug, Deserialize, QueryableByName, Serialize)]
pub struct SessionSummary {
    #[sql_type = "Integer"]
    pub id: i32,
    #[sql_type = "Varchar"]
    pub code: String,
    #[sql_type = "Varchar"]
    pub title: String,
    #[sql_type = "Timestamptz"]
    pub created_at: DateTime<Utc>,
    #[sql_type = "Nullable<Timestamptz>"]
    pub ended_at: Option<DateTime<Utc>>,
    #[sql_type = "BigInt"]
    pub participant_count: i64,
}

impl Session {
    /// Creates a session under a freshly generated code. A code that
    /// collides with an existing one is an expected outcome; we retry
    /// with a new code and only give up after `CODE_ATTEMPTS` rounds.
    pub fn create(conn: &PgConnection, title: String) -> Result<Session, Error> {
        use crate::schema::sessions::dsl;

        for _ in 0..CODE_ATTEMPTS {
            let inserted = diesel::insert_into(sessions::table)
                .values(NewSession {
                    code: generate_code(),
                    title: title.clone(),
                })
                .get_result::<Session>(conn);

            let session = match inserted {
                Ok(session) => session,
                Err(DBError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => continue,
                Err(err) => return Err(err.into()),
            };

            let jwt = create_jwt(PrivateClaim::new(
                session.id,
                session.code.clone(),
                session.id,
                Role::Organizer,
            ))?;
            let session = diesel::update(dsl::sessions.find(session.id))
                .set(dsl::organizer.eq(jwt))
                .get_result::<Session>(conn)?;

            info!("session {} created with code {}", session.id, session.code);
            return Ok(session);
        }

        Err(Error::ExhaustedRetries)
    }

    /// Codes are matched case-insensitively by normalizing to the
    /// uppercase form they were generated in.
    pub fn find_by_code(conn: &PgConnection, code: &str) -> Result<Session, Error> {
        use crate::schema::sessions::dsl;

        let code = code.trim().to_uppercase();
        dsl::sessions
            .filter(dsl::code.eq(code))
            .first::<Session>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))
    }

    pub fn find_by_id(conn: &PgConnection, session_id: i32) -> Result<Session, Error> {
        use crate::schema::sessions::dsl;

        dsl::sessions
            .find(session_id)
            .first::<Session>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))
    }

    /// Idempotent: ending an already ended session returns the stored
    /// row unchanged, so `ended_at` never moves once set.
    pub fn end(conn: &PgConnection, code: &str) -> Result<Session, Error> {
        use crate::schema::sessions::dsl;

        let session = Session::find_by_code(conn, code)?;
        if session.ended_at.is_some() {
            return Ok(session);
        }

        let session = diesel::update(dsl::sessions.find(session.id))
            .set(dsl::ended_at.eq(Utc::now()))
            .get_result::<Session>(conn)?;

        info!("session {} ended", session.code);
        Ok(session)
    }

    pub fn list(conn: &PgConnection, limit: i64) -> Result<Vec<SessionSummary>, Error> {
        let summaries = diesel::sql_query(
            "SELECT s.id, s.code, s.title, s.created_at, s.ended_at, \
                COUNT(p.id) AS participant_count \
             FROM sessions s \
             LEFT JOIN participants p ON p.session_id = s.id \
             GROUP BY s.id \
             ORDER BY s.created_at DESC \
             LIMIT $1",
        )
        .bind::<BigInt, _>(limit)
        .load::<SessionSummary>(conn)?;

        Ok(summaries)
    }

    /// Every mutating operation consults this; reads stay available
    /// after a session ends.
    pub fn ensure_open(&self) -> Result<(), Error> {
        if self.ended_at.is_some() {
            return Err(Error::SessionEnded);
        }
        Ok(())
    }
}
