use std::collections::HashMap;

use chrono::{DateTime, Utc};
use diesel::{self, Connection, ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};
use serde::{Deserialize, Serialize};

use errors::Error;

use crate::models::Session;
use crate::schema::questions;

/// How many losses against a concurrent writer we tolerate before
/// giving up on appending a question.
const ORDER_ATTEMPTS: u32 = 5;

/// One row covers both flavors: bank questions (`session_id` and
/// `order_no` both null, reusable templates) and session questions
/// (both set, ordered within their session).
#[derive(Associations, Debug, Deserialize, Identifiable, Queryable, Serialize)]
#[belongs_to(Session)]
pub struct Question {
    pub id: i32,
    pub session_id: Option<i32>,
    pub order_no: Option<i32>,
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_index: i32,
    pub points: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Insertable)]
#[table_name = "questions"]
struct NewQuestion {
    session_id: Option<i32>,
    order_no: Option<i32>,
    question_text: String,
    options: Vec<String>,
    correct_index: i32,
    points: i32,
}

fn validate_content(
    question_text: &str,
    options: &[String],
    correct_index: i32,
    points: i32,
) -> Result<(), Error> {
    let mut errors = Vec::new();

    if question_text.trim().is_empty() {
        errors.push("question_text must not be empty".to_string());
    }
    if options.len() < 2 {
        errors.push("at least two options are required".to_string());
    }
    if correct_index < 0 || correct_index as usize >= options.len() {
        errors.push("correct_index must point at one of the options".to_string());
    }
    if points < 0 {
        errors.push("points must not be negative".to_string());
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(Error::ValidationError(errors))
    }
}

impl Question {
    /// Appends a question to an open session, numbering it from the
    /// current maximum at insert time rather than a cached counter.
    pub fn create_for_session(
        conn: &PgConnection,
        session: &Session,
        question_text: String,
        options: Vec<String>,
        correct_index: i32,
        points: i32,
    ) -> Result<Question, Error> {
        session.ensure_open()?;
        validate_content(&question_text, &options, correct_index, points)?;

        let session_id = session.id;
        // Two writers can read the same max concurrently; the unique
        // index on (session_id, order_no) makes the loser retry with a
        // fresh max.
        for _ in 0..ORDER_ATTEMPTS {
            let inserted = conn.transaction::<Question, Error, _>(|| {
                let order_no = Self::next_order_no(conn, session_id)?;
                let question = diesel::insert_into(questions::table)
                    .values(NewQuestion {
                        session_id: Some(session_id),
                        order_no: Some(order_no),
                        question_text: question_text.clone(),
                        options: options.clone(),
                        correct_index,
                        points,
                    })
                    .get_result::<Question>(conn)?;

                Ok(question)
            });

            match inserted {
                Ok(question) => return Ok(question),
                Err(Error::UniqueViolation(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(Error::ExhaustedRetries)
    }

    /// Copies bank questions into the session, appending after the
    /// current maximum `order_no` in the order the ids were given. The
    /// bank originals are left untouched.
    pub fn import_from_bank(
        conn: &PgConnection,
        session: &Session,
        bank_ids: &[i32],
    ) -> Result<usize, Error> {
        use crate::schema::questions::dsl;

        session.ensure_open()?;

        let bank_questions = dsl::questions
            .filter(dsl::id.eq_any(bank_ids))
            .filter(dsl::session_id.is_null())
            .load::<Question>(conn)?;

        if bank_questions.is_empty() {
            return Err(Error::NotFound(
                "No bank questions matched the given ids".to_string(),
            ));
        }

        let by_id: HashMap<i32, &Question> =
            bank_questions.iter().map(|q| (q.id, q)).collect();

        let session_id = session.id;
        // Same race as create_for_session: a concurrent append can take
        // the order_no the batch was about to use, so the whole batch
        // retries from a fresh max.
        for _ in 0..ORDER_ATTEMPTS {
            let result = conn.transaction::<usize, Error, _>(|| {
                let mut order_no = Self::next_order_no(conn, session_id)?;
                let mut imported = 0;

                for bank_id in bank_ids {
                    if let Some(bank_question) = by_id.get(bank_id) {
                        diesel::insert_into(questions::table)
                            .values(NewQuestion {
                                session_id: Some(session_id),
                                order_no: Some(order_no),
                                question_text: bank_question.question_text.clone(),
                                options: bank_question.options.clone(),
                                correct_index: bank_question.correct_index,
                                points: bank_question.points,
                            })
                            .execute(conn)?;
                        order_no += 1;
                        imported += 1;
                    }
                }

                Ok(imported)
            });

            match result {
                Ok(imported) => {
                    info!(
                        "imported {} bank questions into session {}",
                        imported, session.code
                    );
                    return Ok(imported);
                }
                Err(Error::UniqueViolation(_)) => continue,
                Err(err) => return Err(err),
            }
        }

        Err(Error::ExhaustedRetries)
    }

    pub fn list_for_session(conn: &PgConnection, session_id: i32) -> Result<Vec<Question>, Error> {
        use crate::schema::questions::dsl;

        let results = dsl::questions
            .filter(dsl::session_id.eq(session_id))
            .order(dsl::order_no.asc())
            .load::<Question>(conn)?;

        Ok(results)
    }

    pub fn create_bank(
        conn: &PgConnection,
        question_text: String,
        options: Vec<String>,
        correct_index: i32,
        points: i32,
    ) -> Result<Question, Error> {
        validate_content(&question_text, &options, correct_index, points)?;

        let question = diesel::insert_into(questions::table)
            .values(NewQuestion {
                session_id: None,
                order_no: None,
                question_text,
                options,
                correct_index,
                points,
            })
            .get_result::<Question>(conn)?;

        Ok(question)
    }

    pub fn delete_from_bank(conn: &PgConnection, bank_id: i32) -> Result<(), Error> {
        use crate::schema::questions::dsl;

        let deleted = diesel::delete(
            dsl::questions
                .filter(dsl::id.eq(bank_id))
                .filter(dsl::session_id.is_null()),
        )
        .execute(conn)?;

        if deleted == 0 {
            return Err(Error::NotFound("Bank question not found".to_string()));
        }

        Ok(())
    }

    pub fn list_bank(conn: &PgConnection) -> Result<Vec<Question>, Error> {
        use crate::schema::questions::dsl;

        let results = dsl::questions
            .filter(dsl::session_id.is_null())
            .order(dsl::id.asc())
            .load::<Question>(conn)?;

        Ok(results)
    }

    fn next_order_no(conn: &PgConnection, session_id: i32) -> Result<i32, Error> {
        use crate::schema::questions::dsl;

        let current_max = dsl::questions
            .filter(dsl::session_id.eq(session_id))
            .select(diesel::dsl::max(dsl::order_no))
            .first::<Option<i32>>(conn)?;

        Ok(current_max.unwrap_or(0) + 1)
    }
}
