//! Photo attachment persistence operations.
//!
//! All functions take a `&PgPool` and operate on the `session_photos` table.
//! Rows cascade when the owning session row is deleted.

use chrono::{DateTime, Utc};
use outreach_core::PhotoAttachment;
use sqlx::PgPool;
use uuid::Uuid;

/// Insert a new attachment row.
pub async fn insert(pool: &PgPool, photo: &PhotoAttachment) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO session_photos (id, session_id, filename, original_filename,
         file_size, uploaded_at)
         VALUES ($1, $2, $3, $4, $5, $6)",
    )
    .bind(photo.id)
    .bind(photo.session_id)
    .bind(&photo.filename)
    .bind(&photo.original_filename)
    .bind(photo.file_size)
    .bind(photo.uploaded_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Delete one attachment. Returns `false` when no row matched.
pub async fn delete(pool: &PgPool, id: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM session_photos WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Load all attachment rows, for store hydration at startup.
pub async fn load_all(pool: &PgPool) -> Result<Vec<PhotoAttachment>, sqlx::Error> {
    let rows = sqlx::query_as::<_, PhotoRow>(
        "SELECT id, session_id, filename, original_filename, file_size, uploaded_at
         FROM session_photos ORDER BY uploaded_at",
    )
    .fetch_all(pool)
    .await?;

    Ok(rows.into_iter().map(PhotoRow::into_attachment).collect())
}

/// Internal row type for SQLx mapping.
#[derive(sqlx::FromRow)]
struct PhotoRow {
    id: Uuid,
    session_id: Uuid,
    filename: String,
    original_filename: String,
    file_size: i64,
    uploaded_at: DateTime<Utc>,
}

impl PhotoRow {
    fn into_attachment(self) -> PhotoAttachment {
        PhotoAttachment {
            id: self.id,
            session_id: self.session_id,
            filename: self.filename,
            original_filename: self.original_filename,
            file_size: self.file_size,
            uploaded_at: self.uploaded_at,
        }
    }
}
