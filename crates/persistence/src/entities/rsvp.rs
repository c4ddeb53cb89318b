//! RSVP entity (database row mapping).

use chrono::{DateTime, Utc};
use sqlx::FromRow;

/// Database row mapping for the rsvps table.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpEntity {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub attending: String,
    // Columns have defaults but no NOT NULL constraint.
    pub adults: Option<i64>,
    pub children: Option<i64>,
    pub dietary: Option<String>,
    pub song: Option<String>,
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<RsvpEntity> for domain::models::Rsvp {
    fn from(entity: RsvpEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            email: entity.email,
            phone: entity.phone,
            attending: entity.attending,
            adults: entity.adults.unwrap_or(1),
            children: entity.children.unwrap_or(0),
            dietary: entity.dietary,
            song: entity.song,
            message: entity.message,
            created_at: entity.created_at,
        }
    }
}

/// Aggregate row returned by the statistics query.
#[derive(Debug, Clone, FromRow)]
pub struct RsvpStatsEntity {
    pub total: i64,
    pub attending: i64,
    pub not_attending: i64,
    pub total_adults: i64,
    pub total_children: i64,
}

impl From<RsvpStatsEntity> for domain::models::RsvpStats {
    fn from(entity: RsvpStatsEntity) -> Self {
        Self {
            total: entity.total,
            attending: entity.attending,
            not_attending: entity.not_attending,
            total_adults: entity.total_adults,
            total_children: entity.total_children,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_conversion_fills_missing_counts() {
        let entity = RsvpEntity {
            id: 3,
            name: "Grace".to_string(),
            email: "grace@example.com".to_string(),
            phone: None,
            attending: "yes".to_string(),
            adults: None,
            children: None,
            dietary: None,
            song: Some("September".to_string()),
            message: None,
            created_at: Utc::now(),
        };

        let rsvp: domain::models::Rsvp = entity.into();
        assert_eq!(rsvp.id, 3);
        assert_eq!(rsvp.adults, 1);
        assert_eq!(rsvp.children, 0);
        assert_eq!(rsvp.song.as_deref(), Some("September"));
    }
}
