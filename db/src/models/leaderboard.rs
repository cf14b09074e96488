use chrono::{DateTime, Utc};
use diesel::sql_types::{BigInt, Integer, Text, Timestamptz};
use diesel::{self, PgConnection, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

pub const DEFAULT_LEADERBOARD_LIMIT: i64 = 20;

/// Derived row, never stored: the leaderboard is recomputed from raw
/// answers on every read, which keeps the write path free of counter
/// bookkeeping.
#[derive(Debug, Deserialize, QueryableByName, Serialize)]
pub struct LeaderboardEntry {
    #[sql_type = "Integer"]
    pub participant_id: i32,
    #[sql_type = "Text"]
    pub display_name: String,
    #[sql_type = "Integer"]
    pub total_points: i32,
    #[sql_type = "Integer"]
    pub correct_count: i32,
    #[sql_type = "Timestamptz"]
    pub last_answer_at: DateTime<Utc>,
}

/// Ties on points go to whoever finished answering earlier.
pub fn compute_leaderboard(
    conn: &PgConnection,
    session_id: i32,
    limit: i64,
) -> Result<Vec<LeaderboardEntry>, Error> {
    let entries = diesel::sql_query(
        "SELECT a.participant_id, p.display_name, \
            COALESCE(SUM(a.points_earned), 0)::INT4 AS total_points, \
            COUNT(*) FILTER (WHERE a.is_correct)::INT4 AS correct_count, \
            MAX(a.answered_at) AS last_answer_at \
         FROM answers a \
         JOIN participants p ON p.id = a.participant_id \
         WHERE a.session_id = $1 \
         GROUP BY a.participant_id, p.display_name \
         ORDER BY total_points DESC, last_answer_at ASC \
         LIMIT $2",
    )
    .bind::<Integer, _>(session_id)
    .bind::<BigInt, _>(limit)
    .load::<LeaderboardEntry>(conn)?;

    Ok(entries)
}
