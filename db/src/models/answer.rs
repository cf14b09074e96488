use chrono::{DateTime, Utc};
use diesel::result::{DatabaseErrorKind, Error as DBError};
use diesel::{self, OptionalExtension, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::models::{Participant, Question, Session};
use crate::schema::answers;

#[derive(Associations, Debug, Deserialize, Identifiable, Queryable, Serialize)]
#[belongs_to(Session)]
#[belongs_to(Participant)]
#[belongs_to(Question)]
pub struct Answer {
    pub id: i32,
    pub session_id: i32,
    pub participant_id: i32,
    pub question_id: i32,
    pub answer_index: i32,
    pub is_correct: bool,
    pub points_earned: i32,
    pub answered_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "answers"]
struct NewAnswer {
    session_id: i32,
    participant_id: i32,
    question_id: i32,
    answer_index: i32,
    is_correct: bool,
    points_earned: i32,
}

impl Answer {
    /// Records and grades one submission. The exactly-once guarantee is
    /// the store's unique constraint on `(participant_id, question_id)`,
    /// checked atomically at insert time; there is no check-then-insert
    /// window for two concurrent submissions to slip through.
    pub fn create(
        conn: &PgConnection,
        participant_id: i32,
        session_id: i32,
        question_id: i32,
        answer_index: i32,
    ) -> Result<Answer, Error> {
        use crate::schema::questions::dsl as questions_dsl;

        let question = questions_dsl::questions
            .find(question_id)
            .first::<Question>(conn)
            .optional()?
            .ok_or_else(|| Error::NotFound("Question not found".to_string()))?;

        // Rejects answers aimed at another session's question.
        match question.session_id {
            Some(owner) if owner == session_id => {}
            _ => return Err(Error::InvalidSession),
        }

        let session = Session::find_by_id(conn, session_id)?;
        session.ensure_open()?;

        // An out-of-range index is just a wrong answer, not an error;
        // the value is only ever compared for equality.
        let is_correct = answer_index == question.correct_index;
        let points_earned = if is_correct { question.points } else { 0 };

        let inserted = diesel::insert_into(answers::table)
            .values(NewAnswer {
                session_id,
                participant_id,
                question_id,
                answer_index,
                is_correct,
                points_earned,
            })
            .get_result::<Answer>(conn);

        match inserted {
            Ok(answer) => {
                info!(
                    "participant {} answered question {} in session {}: correct={}",
                    participant_id, question_id, session_id, is_correct
                );
                Ok(answer)
            }
            Err(DBError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)) => {
                Err(Error::DuplicateAnswer)
            }
            Err(err) => Err(err.into()),
        }
    }
}
