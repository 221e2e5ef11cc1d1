//! Session record persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `sessions` table.

use chrono::{DateTime, NaiveDate, Utc};
use outreach_core::{SessionFields, SessionRecord, YearGroup};
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new session record.
pub async fn insert(pool: &PgPool, record: &SessionRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO sessions (id, school_name, session_type, location, activator, year_group,
         male_participants, female_participants, teacher_feedback, session_date,
         session_duration, latitude, longitude, created_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(record.id)
    .bind(&record.fields.school_name)
    .bind(&record.fields.session_type)
    .bind(&record.fields.location)
    .bind(&record.fields.activator)
    .bind(record.fields.year_group.as_str())
    .bind(record.fields.male_participants)
    .bind(record.fields.female_participants)
    .bind(&record.fields.teacher_feedback)
    .bind(record.fields.session_date)
    .bind(record.fields.session_duration)
    .bind(record.fields.latitude)
    .bind(record.fields.longitude)
    .bind(record.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Replace every mutable field of an existing session.
/// Returns `false` when no row matched.
pub async fn update(pool: &PgPool, record: &SessionRecord) -> Result<bool, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE sessions SET school_name = $1, session_type = $2, location = $3,
         activator = $4, year_group = $5, male_participants = $6, female_participants = $7,
         teacher_feedback = $8, session_date = $9, session_duration = $10,
         latitude = $11, longitude = $12
         WHERE id = $13",
    )
    .bind(&record.fields.school_name)
    .bind(&record.fields.session_type)
    .bind(&record.fields.location)
    .bind(&record.fields.activator)
    .bind(record.fields.year_group.as_str())
    .bind(record.fields.male_participants)
    .bind(record.fields.female_participants)
    .bind(&record.fields.teacher_feedback)
    .bind(record.fields.session_date)
    .bind(record.fields.session_duration)
    .bind(record.fields.latitude)
    .bind(record.fields.longitude)
    .bind(record.id)
    .execute(pool)
    .await?;

    Ok(result.rows_affected() > 0)
}

/// Delete a session. Attachment rows cascade at the database level.
/// Returns `false` when no row matched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all session records, for store hydration at startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<SessionRecord>, sqlx::Error> {
    let rows = sqlx::query_as::<_, SessionRow>(
        "SELECT id, school_name, session_type, location, activator, year_group,
         male_participants, female_participants, teacher_feedback, session_date,
         session_duration, latitude, longitude, created_at
         FROM sessions ORDER BY created_at",
    )
    .fetch_all(pool)
    .await?;

    // into_record() logs and skips rows with an unknown year_group label.
    Ok(rows.into_iter().filter_map(SessionRow::into_record).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct SessionRow {
    id: Uuid,
    school_name: String,
    session_type: String,
    location: String,
    activator: String,
    year_group: String,
    male_participants: i32,
    female_participants: i32,
    teacher_feedback: Option<String>,
    session_date: NaiveDate,
    session_duration: i32,
    latitude: Option<f64>,
    longitude: Option<f64>,
    created_at: DateTime<Utc>,
}

impl SessionRow {
    fn into_record(self) -> Option<SessionRecord> {
        let year_group = match YearGroup::parse(&self.year_group) {
            Ok(yg) => yg,
            Err(_) => {
                tracing::warn!(
                    id = %self.id,
                    year_group = %self.year_group,
                    "skipping session row with invalid year_group"
                );
                return None;
            }
        };
        Some(SessionRecord {
            id: self.id,
            fields: SessionFields {
                school_name: self.school_name,
                session_type: self.session_type,
                location: self.location,
                activator: self.activator,
                year_group,
                male_participants: self.male_participants,
                female_participants: self.female_participants,
                teacher_feedback: self.teacher_feedback,
                session_date: self.session_date,
                session_duration: self.session_duration,
                latitude: self.latitude,
                longitude: self.longitude,
            },
            created_at: self.created_at,
        })
    }
}
