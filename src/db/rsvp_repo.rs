use chrono::{DateTime, Utc};
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    CategoryCounts, FamilyGuest, FamilyRecord, LegacyRecord, SubmissionRecord,
};

/// The narrow store interface over both RSVP collections.
///
/// `insert_family` is the only write path for new submissions; updates
/// and deletes exist solely for the targeted guest-removal flow.
pub struct RsvpRepository {
    pool: SqlitePool,
}

// Row types for database queries
#[derive(sqlx::FromRow)]
struct LegacyRow {
    id: String,
    first_name: String,
    last_name: String,
    intolerances: String,
    allergies: String,
    notes: String,
    category: Option<String>,
    created_at: Option<String>,
}

#[derive(sqlx::FromRow)]
struct FamilyRow {
    id: String,
    main_guest: String,
    adults: i64,
    children05: i64,
    children610: i64,
    notes: String,
    guests: String,
    total_people: i64,
    created_at: Option<String>,
}

impl LegacyRow {
    fn into_record(self) -> LegacyRecord {
        LegacyRecord {
            category: self.category.as_deref().and_then(|c| c.parse().ok()),
            created_at: parse_timestamp(self.created_at.as_deref()),
            id: self.id,
            first_name: self.first_name,
            last_name: self.last_name,
            intolerances: self.intolerances,
            allergies: self.allergies,
            notes: self.notes,
        }
    }
}

impl FamilyRow {
    fn into_record(self) -> FamilyRecord {
        // A malformed guests column contributes zero guests rather
        // than failing the whole listing.
        let guests: Vec<FamilyGuest> = serde_json::from_str(&self.guests).unwrap_or_default();
        FamilyRecord {
            counts: CategoryCounts::new(
                self.adults.max(0) as u32,
                self.children05.max(0) as u32,
                self.children610.max(0) as u32,
            ),
            created_at: parse_timestamp(self.created_at.as_deref()),
            total_people: self.total_people.max(0) as usize,
            id: self.id,
            main_guest: self.main_guest,
            notes: self.notes,
            guests,
        }
    }
}

fn parse_timestamp(raw: Option<&str>) -> Option<DateTime<Utc>> {
    raw.and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
}

impl RsvpRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list_legacy(&self) -> Result<Vec<LegacyRecord>, sqlx::Error> {
        let rows: Vec<LegacyRow> =
            sqlx::query_as("SELECT * FROM rsvps ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(LegacyRow::into_record).collect())
    }

    pub async fn list_family(&self) -> Result<Vec<FamilyRecord>, sqlx::Error> {
        let rows: Vec<FamilyRow> =
            sqlx::query_as("SELECT * FROM rsvps_family ORDER BY created_at DESC")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(FamilyRow::into_record).collect())
    }

    pub async fn get_family(&self, id: &str) -> Result<Option<FamilyRecord>, sqlx::Error> {
        let row: Option<FamilyRow> = sqlx::query_as("SELECT * FROM rsvps_family WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(FamilyRow::into_record))
    }

    /// Insert a new family submission. The store assigns the id and
    /// timestamp; both are returned through the record id.
    pub async fn insert_family(&self, record: &SubmissionRecord) -> Result<String, sqlx::Error> {
        let id = Uuid::new_v4().to_string();
        let guests =
            serde_json::to_string(&record.guests).unwrap_or_else(|_| "[]".to_string());
        let created_at = Utc::now().to_rfc3339();

        sqlx::query(
            r#"
            INSERT INTO rsvps_family (id, main_guest, adults, children05, children610, notes, guests, total_people, created_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&id)
        .bind(&record.main_guest)
        .bind(record.counts.adults as i64)
        .bind(record.counts.children05 as i64)
        .bind(record.counts.children610 as i64)
        .bind(&record.notes)
        .bind(&guests)
        .bind(record.total_people as i64)
        .bind(&created_at)
        .execute(&self.pool)
        .await?;

        Ok(id)
    }

    /// Write back a family record after an embedded guest removal.
    /// Returns false if the record no longer exists.
    pub async fn update_family(
        &self,
        id: &str,
        guests: &[FamilyGuest],
        counts: &CategoryCounts,
        total_people: usize,
    ) -> Result<bool, sqlx::Error> {
        let guests = serde_json::to_string(guests).unwrap_or_else(|_| "[]".to_string());

        let result = sqlx::query(
            r#"
            UPDATE rsvps_family
            SET guests = ?, adults = ?, children05 = ?, children610 = ?, total_people = ?
            WHERE id = ?
            "#,
        )
        .bind(&guests)
        .bind(counts.adults as i64)
        .bind(counts.children05 as i64)
        .bind(counts.children610 as i64)
        .bind(total_people as i64)
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Delete a family record. Returns false if nothing was deleted.
    pub async fn delete_family(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rsvps_family WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete a legacy record. Returns false if nothing was deleted.
    pub async fn delete_legacy(&self, id: &str) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM rsvps WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }
}
