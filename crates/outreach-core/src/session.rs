//! # Session Record Types
//!
//! A session record is one logged outreach activity: which school, what kind
//! of session, who ran it, how many participants, when and (optionally) where.
//!
//! [`SessionFields`] holds the validated mutable fields; [`SessionRecord`]
//! wraps them with the store-assigned identifier and creation timestamp, both
//! immutable after creation. Updates replace the fields wholesale via
//! [`SessionRecord::apply`].

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// The closed set of grade-band labels a session audience can carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum YearGroup {
    #[serde(rename = "Year 1-2")]
    Year1To2,
    #[serde(rename = "Year 3-4")]
    Year3To4,
    #[serde(rename = "Year 5-6")]
    Year5To6,
    #[serde(rename = "Year 7-8")]
    Year7To8,
    #[serde(rename = "Year 9-10")]
    Year9To10,
    #[serde(rename = "Year 11-13")]
    Year11To13,
    #[serde(rename = "Mixed")]
    Mixed,
}

/// Error returned when a string is not one of the year-group labels.
#[derive(Debug, Error, PartialEq, Eq)]
#[error("unknown year group: {0}")]
pub struct UnknownYearGroup(pub String);

impl YearGroup {
    /// All labels, in display order.
    pub const ALL: [YearGroup; 7] = [
        YearGroup::Year1To2,
        YearGroup::Year3To4,
        YearGroup::Year5To6,
        YearGroup::Year7To8,
        YearGroup::Year9To10,
        YearGroup::Year11To13,
        YearGroup::Mixed,
    ];

    /// The exact label used on the wire and in storage.
    pub fn as_str(&self) -> &'static str {
        match self {
            YearGroup::Year1To2 => "Year 1-2",
            YearGroup::Year3To4 => "Year 3-4",
            YearGroup::Year5To6 => "Year 5-6",
            YearGroup::Year7To8 => "Year 7-8",
            YearGroup::Year9To10 => "Year 9-10",
            YearGroup::Year11To13 => "Year 11-13",
            YearGroup::Mixed => "Mixed",
        }
    }

    /// Parse an exact label. No trimming or case folding is applied; the
    /// submitted value must match the vocabulary verbatim.
    pub fn parse(label: &str) -> Result<Self, UnknownYearGroup> {
        Self::ALL
            .iter()
            .copied()
            .find(|yg| yg.as_str() == label)
            .ok_or_else(|| UnknownYearGroup(label.to_string()))
    }
}

impl std::fmt::Display for YearGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for YearGroup {
    type Err = UnknownYearGroup;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// The validated, mutable fields of a session record.
///
/// Constructed only via [`crate::input::SessionInput::resolve`], so every
/// instance satisfies the field constraints (lengths, ranges, date bounds).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionFields {
    pub school_name: String,
    pub session_type: String,
    pub location: String,
    /// The named staff member who ran the session.
    pub activator: String,
    pub year_group: YearGroup,
    pub male_participants: i32,
    pub female_participants: i32,
    pub teacher_feedback: Option<String>,
    pub session_date: NaiveDate,
    /// Session length in minutes.
    pub session_duration: i32,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
}

/// One reported outreach activity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct SessionRecord {
    /// Store-assigned identifier, immutable after creation.
    pub id: Uuid,
    #[serde(flatten)]
    pub fields: SessionFields,
    /// Assigned at creation, immutable thereafter.
    pub created_at: DateTime<Utc>,
}

impl SessionRecord {
    /// Build a record from validated fields.
    pub fn new(id: Uuid, fields: SessionFields, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            fields,
            created_at,
        }
    }

    /// Replace every mutable field. Identifier and creation timestamp are
    /// preserved.
    pub fn apply(&mut self, fields: SessionFields) {
        self.fields = fields;
    }

    /// Combined participant count across both genders.
    pub fn total_participants(&self) -> i64 {
        i64::from(self.fields.male_participants) + i64::from(self.fields.female_participants)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fields() -> SessionFields {
        SessionFields {
            school_name: "Auckland Primary School".to_string(),
            session_type: "School Festive Day".to_string(),
            location: "School Hall".to_string(),
            activator: "John Smith".to_string(),
            year_group: YearGroup::Year5To6,
            male_participants: 8,
            female_participants: 9,
            teacher_feedback: Some("Great engagement from students".to_string()),
            session_date: NaiveDate::from_ymd_opt(2025, 1, 16).unwrap(),
            session_duration: 60,
            latitude: Some(-36.8485),
            longitude: Some(174.7633),
        }
    }

    #[test]
    fn year_group_parse_valid_labels() {
        for yg in YearGroup::ALL {
            assert_eq!(YearGroup::parse(yg.as_str()), Ok(yg));
        }
    }

    #[test]
    fn year_group_parse_rejects_unknown() {
        assert!(YearGroup::parse("Year 14").is_err());
        assert!(YearGroup::parse("year 1-2").is_err());
        assert!(YearGroup::parse("").is_err());
    }

    #[test]
    fn year_group_serde_uses_label() {
        let json = serde_json::to_string(&YearGroup::Year11To13).unwrap();
        assert_eq!(json, "\"Year 11-13\"");
        let back: YearGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, YearGroup::Year11To13);
    }

    #[test]
    fn total_participants_sums_both_counts() {
        let record = SessionRecord::new(Uuid::new_v4(), fields(), Utc::now());
        assert_eq!(record.total_participants(), 17);
    }

    #[test]
    fn apply_preserves_id_and_created_at() {
        let mut record = SessionRecord::new(Uuid::new_v4(), fields(), Utc::now());
        let id = record.id;
        let created = record.created_at;

        let mut replacement = fields();
        replacement.school_name = "Wellington High School".to_string();
        replacement.male_participants = 65;
        record.apply(replacement);

        assert_eq!(record.id, id);
        assert_eq!(record.created_at, created);
        assert_eq!(record.fields.school_name, "Wellington High School");
        assert_eq!(record.fields.male_participants, 65);
    }

    #[test]
    fn record_serializes_flat() {
        let record = SessionRecord::new(Uuid::nil(), fields(), Utc::now());
        let value = serde_json::to_value(&record).unwrap();
        // Fields are flattened next to id/created_at, not nested.
        assert!(value.get("school_name").is_some());
        assert!(value.get("fields").is_none());
        assert_eq!(value["session_date"], "2025-01-16");
        assert_eq!(value["year_group"], "Year 5-6");
    }
}
