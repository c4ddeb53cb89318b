//! RSVP repository for database operations.

use domain::models::{NewRsvp, Rsvp, RsvpStats};
use sqlx::SqlitePool;

use crate::entities::{RsvpEntity, RsvpStatsEntity};
use crate::metrics::QueryTimer;

/// Repository for RSVP records. Records are append-only.
#[derive(Clone)]
pub struct RsvpRepository {
    pool: SqlitePool,
}

impl RsvpRepository {
    /// Creates a new RsvpRepository with the given connection pool.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a new RSVP and return its assigned id.
    pub async fn insert(&self, rsvp: &NewRsvp) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("insert_rsvp");
        let result = sqlx::query(
            r#"
            INSERT INTO rsvps (name, email, phone, attending, adults, children, dietary, song, message)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&rsvp.name)
        .bind(&rsvp.email)
        .bind(&rsvp.phone)
        .bind(&rsvp.attending)
        .bind(rsvp.adults)
        .bind(rsvp.children)
        .bind(&rsvp.dietary)
        .bind(&rsvp.song)
        .bind(&rsvp.message)
        .execute(&self.pool)
        .await;
        timer.record();
        Ok(result?.last_insert_rowid())
    }

    /// List every RSVP, most recent first.
    pub async fn list_all(&self) -> Result<Vec<Rsvp>, sqlx::Error> {
        let timer = QueryTimer::new("list_rsvps");
        let result = sqlx::query_as::<_, RsvpEntity>(
            r#"
            SELECT id, name, email, phone, attending, adults, children, dietary, song, message, created_at
            FROM rsvps
            ORDER BY created_at DESC, id DESC
            "#,
        )
        .fetch_all(&self.pool)
        .await;
        timer.record();
        Ok(result?.into_iter().map(Rsvp::from).collect())
    }

    /// Aggregate counts. Guest sums only include confirmed attendees.
    pub async fn aggregate_stats(&self) -> Result<RsvpStats, sqlx::Error> {
        let timer = QueryTimer::new("rsvp_stats");
        let result = sqlx::query_as::<_, RsvpStatsEntity>(
            r#"
            SELECT
                COUNT(*) AS total,
                COALESCE(SUM(CASE WHEN attending = 'yes' THEN 1 ELSE 0 END), 0) AS attending,
                COALESCE(SUM(CASE WHEN attending = 'no' THEN 1 ELSE 0 END), 0) AS not_attending,
                COALESCE(SUM(CASE WHEN attending = 'yes' THEN adults ELSE 0 END), 0) AS total_adults,
                COALESCE(SUM(CASE WHEN attending = 'yes' THEN children ELSE 0 END), 0) AS total_children
            FROM rsvps
            "#,
        )
        .fetch_one(&self.pool)
        .await;
        timer.record();
        Ok(result?.into())
    }

    /// Count all RSVPs.
    pub async fn count(&self) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("count_rsvps");
        let result = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM rsvps")
            .fetch_one(&self.pool)
            .await;
        timer.record();
        result
    }
}
