use chrono::{DateTime, Utc};
use diesel::{self, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use auth::{create_jwt, PrivateClaim, Role};
use errors::Error;

use crate::models::Session;
use crate::schema::participants;

pub const MIN_DISPLAY_NAME_LENGTH: usize = 2;
pub const MAX_DISPLAY_NAME_LENGTH: usize = 30;

#[derive(Associations, Debug, Deserialize, Identifiable, Queryable, Serialize)]
#[belongs_to(Session)]
pub struct Participant {
    pub id: i32,
    pub session_id: i32,
    pub display_name: String,
    pub token: Option<String>,
    pub joined_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "participants"]
struct NewParticipant {
    session_id: i32,
    display_name: String,
}

/// Too-short names are rejected; too-long names are cut down to the
/// limit rather than bounced back at the participant. Duplicate names
/// within a session are deliberately allowed.
fn normalize_display_name(display_name: &str) -> Result<String, Error> {
    let trimmed = display_name.trim();
    if trimmed.chars().count() < MIN_DISPLAY_NAME_LENGTH {
        return Err(Error::ValidationError(vec![format!(
            "display name must be at least {} characters",
            MIN_DISPLAY_NAME_LENGTH
        )]));
    }

    Ok(trimmed.chars().take(MAX_DISPLAY_NAME_LENGTH).collect())
}

impl Participant {
    pub fn create(
        conn: &PgConnection,
        session: &Session,
        display_name: &str,
    ) -> Result<Participant, Error> {
        use crate::schema::participants::dsl;

        session.ensure_open()?;
        let display_name = normalize_display_name(display_name)?;

        let participant: Participant = diesel::insert_into(participants::table)
            .values(NewParticipant {
                session_id: session.id,
                display_name,
            })
            .get_result(conn)?;

        let jwt = create_jwt(PrivateClaim::new(
            participant.id,
            participant.display_name.clone(),
            session.id,
            Role::Participant,
        ))?;
        let participant: Participant = diesel::update(dsl::participants.find(participant.id))
            .set(dsl::token.eq(jwt))
            .get_result(conn)?;

        info!(
            "participant {} joined session {}",
            participant.id, session.code
        );
        Ok(participant)
    }
}
