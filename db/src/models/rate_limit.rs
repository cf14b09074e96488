use chrono::{DateTime, Duration, Utc};
use diesel::result::{DatabaseErrorKind, Error as DBError};
use diesel::{self, ExpressionMethods, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::schema::rate_limits;

/// Fixed-window counters per `(category, identifier)` key. A burst
/// straddling a window boundary can see up to twice the budget; that is
/// the accepted trade for a single upsert-style row per key.
#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize)]
pub enum RateLimitCategory {
    /// Organizer session creation.
    Login,
    /// Participants joining a session.
    Join,
    /// Answer submission.
    Answer,
}

impl RateLimitCategory {
    pub fn key(&self) -> &'static str {
        match self {
            RateLimitCategory::Login => "login",
            RateLimitCategory::Join => "join",
            RateLimitCategory::Answer => "answer",
        }
    }

    pub fn max_attempts(&self) -> i32 {
        match self {
            RateLimitCategory::Login => 5,
            RateLimitCategory::Join => 10,
            RateLimitCategory::Answer => 60,
        }
    }

    pub fn window(&self) -> Duration {
        match self {
            RateLimitCategory::Login => Duration::minutes(15),
            RateLimitCategory::Join => Duration::minutes(1),
            RateLimitCategory::Answer => Duration::minutes(1),
        }
    }
}

#[derive(Debug, Insertable, Queryable)]
#[table_name = "rate_limits"]
pub struct RateLimit {
    pub category: String,
    pub identifier: String,
    pub count: i32,
    pub reset_at: DateTime<Utc>,
}

impl RateLimit {
    /// Missing or expired window: reset to one attempt and allow. At
    /// the budget: deny with the seconds until the window resets.
    /// Otherwise: increment in place. The increment is a relative
    /// `count = count + 1` update, so concurrent callers cannot lose
    /// counts; the threshold read can over-admit a little under a
    /// heavy concurrent burst from one identifier, which we accept.
    pub fn check(
        conn: &PgConnection,
        category: RateLimitCategory,
        identifier: &str,
    ) -> Result<(), Error> {
        use crate::schema::rate_limits::dsl;

        let now = Utc::now();
        let existing = dsl::rate_limits
            .find((category.key(), identifier))
            .first::<RateLimit>(conn)
            .optional()?;

        match existing {
            None => {
                let inserted = diesel::insert_into(rate_limits::table)
                    .values(RateLimit {
                        category: category.key().to_string(),
                        identifier: identifier.to_string(),
                        count: 1,
                        reset_at: now + category.window(),
                    })
                    .execute(conn);

                match inserted {
                    Ok(_) => Ok(()),
                    // Another request created the row first; both count
                    // as admitted within the fresh window.
                    Err(DBError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => Ok(()),
                    Err(err) => Err(err.into()),
                }
            }
            Some(record) if record.reset_at <= now => {
                diesel::update(dsl::rate_limits.find((category.key(), identifier)))
                    .set((
                        dsl::count.eq(1),
                        dsl::reset_at.eq(now + category.window()),
                    ))
                    .execute(conn)?;
                Ok(())
            }
            Some(record) if record.count >= category.max_attempts() => {
                let retry_after = (record.reset_at - now).num_seconds().max(1);
                warn!(
                    "rate limit hit for {}:{}, retry in {}s",
                    category.key(),
                    identifier,
                    retry_after
                );
                Err(Error::RateLimited(retry_after))
            }
            Some(_) => {
                diesel::update(dsl::rate_limits.find((category.key(), identifier)))
                    .set(dsl::count.eq(dsl::count + 1))
                    .execute(conn)?;
                Ok(())
            }
        }
    }

    /// Clears a key, used after a successful privileged action so
    /// legitimate retries are not penalized.
    pub fn reset(
        conn: &PgConnection,
        category: RateLimitCategory,
        identifier: &str,
    ) -> Result<(), Error> {
        use crate::schema::rate_limits::dsl;

        diesel::delete(dsl::rate_limits.find((category.key(), identifier))).execute(conn)?;
        Ok(())
    }
}
