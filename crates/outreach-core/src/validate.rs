//! # Session Field Validation
//!
//! Maps a [`SessionInput`] candidate to an ordered list of human-readable
//! error messages. The walk is all-or-nothing: every applicable rule is
//! evaluated in one pass, a missing or wrong-typed field yields a message
//! instead of aborting, and an empty result is the only "valid" signal.
//!
//! Rule order is stable: the required-fields check first (in field
//! declaration order), then the per-field rules in declaration order. Range
//! checks for numeric fields only run when the value actually parses, so a
//! non-numeric count produces a single type error, not a type error plus a
//! spurious range error. The cross-field total-participants rule is skipped
//! when either count is absent or unparseable.

use chrono::NaiveDate;

use crate::input::{FieldValue, SessionInput};
use crate::session::{SessionFields, YearGroup};

/// Earliest acceptable session date.
pub fn min_session_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2020, 1, 1).expect("2020-01-01 is a valid date")
}

/// Mandatory fields, in declaration order.
const REQUIRED_FIELDS: [&str; 9] = [
    "school_name",
    "session_type",
    "location",
    "activator",
    "year_group",
    "male_participants",
    "female_participants",
    "session_date",
    "session_duration",
];

/// Human-readable label for a field name: underscores become spaces and each
/// word is title-cased ("male_participants" -> "Male Participants").
fn field_label(name: &str) -> String {
    name.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// A present, non-blank value.
fn present(value: &Option<FieldValue>) -> Option<&FieldValue> {
    value.as_ref().filter(|v| !v.is_blank())
}

/// A present, non-blank value rendered as text.
fn text(value: &Option<FieldValue>) -> Option<String> {
    present(value).map(FieldValue::as_text)
}

/// Length rule shared by the free-text fields. Bounds are in characters,
/// measured after trimming.
fn check_length(value: &Option<FieldValue>, label: &str, min: usize, max: usize, errors: &mut Vec<String>) {
    if let Some(raw) = text(value) {
        let len = raw.trim().chars().count();
        if len < min {
            errors.push(format!("{label} must be at least {min} characters long"));
        }
        if len > max {
            errors.push(format!("{label} must be less than {max} characters"));
        }
    }
}

/// Participant-count rule. Returns the parsed count when the value is
/// present and numeric so the caller can run the total rule; range
/// violations still return the value.
fn check_count(value: &Option<FieldValue>, label: &str, errors: &mut Vec<String>) -> Option<i64> {
    let value = present(value)?;
    match value.as_i64() {
        Some(n) => {
            if n < 0 {
                errors.push(format!("{label} cannot be negative"));
            }
            if n > 1000 {
                errors.push(format!("{label} seems too high (max 1000)"));
            }
            Some(n)
        }
        None => {
            errors.push(format!("{label} must be a valid number"));
            None
        }
    }
}

/// Optional-coordinate rule: parse failure and out-of-range produce distinct
/// messages, and only one of them.
fn check_coordinate(
    value: &Option<FieldValue>,
    label: &str,
    min: f64,
    max: f64,
    errors: &mut Vec<String>,
) {
    let Some(value) = present(value) else {
        return;
    };
    match value.as_f64() {
        Some(v) if v < min || v > max => {
            errors.push(format!("{label} must be between {min} and {max}"));
        }
        Some(_) => {}
        None => errors.push(format!("{label} must be a valid number")),
    }
}

impl SessionInput {
    fn field(&self, name: &str) -> &Option<FieldValue> {
        match name {
            "school_name" => &self.school_name,
            "session_type" => &self.session_type,
            "location" => &self.location,
            "activator" => &self.activator,
            "year_group" => &self.year_group,
            "male_participants" => &self.male_participants,
            "female_participants" => &self.female_participants,
            "session_date" => &self.session_date,
            "session_duration" => &self.session_duration,
            "teacher_feedback" => &self.teacher_feedback,
            "latitude" => &self.latitude,
            "longitude" => &self.longitude,
            _ => &None,
        }
    }

    /// Evaluate every rule and return the violations, in rule order.
    /// An empty vector means the input is valid.
    ///
    /// `today` is the reference date for the session-date bounds; callers
    /// pass the current calendar date.
    pub fn validate(&self, today: NaiveDate) -> Vec<String> {
        let mut errors = Vec::new();

        for name in REQUIRED_FIELDS {
            if present(self.field(name)).is_none() {
                errors.push(format!("{} is required", field_label(name)));
            }
        }

        check_length(&self.school_name, "School name", 2, 100, &mut errors);
        check_length(&self.session_type, "Session type", 2, 50, &mut errors);
        check_length(&self.location, "Location", 2, 100, &mut errors);
        check_length(&self.activator, "Activator name", 2, 50, &mut errors);

        if let Some(raw) = text(&self.activator) {
            let name = raw.trim();
            let allowed = name
                .chars()
                .all(|c| c.is_ascii_alphabetic() || c == ' ' || c == '-' || c == '.');
            if !allowed {
                errors.push(
                    "Activator name can only contain letters, spaces, hyphens, and periods"
                        .to_string(),
                );
            }
        }

        if let Some(raw) = text(&self.year_group) {
            if YearGroup::parse(&raw).is_err() {
                errors.push("Please select a valid year group".to_string());
            }
        }

        let male = check_count(&self.male_participants, "Male participants", &mut errors);
        let female = check_count(&self.female_participants, "Female participants", &mut errors);
        if let (Some(male), Some(female)) = (male, female) {
            let total = male + female;
            if total == 0 {
                errors.push("Total participants must be greater than 0".to_string());
            }
            if total > 2000 {
                errors.push("Total participants seems too high (max 2000)".to_string());
            }
        }

        if let Some(value) = present(&self.session_duration) {
            match value.as_i64() {
                Some(minutes) => {
                    if minutes <= 0 {
                        errors.push("Session duration must be greater than 0 minutes".to_string());
                    }
                    if minutes > 480 {
                        errors.push("Session duration seems too long (max 8 hours)".to_string());
                    }
                }
                None => errors.push("Session duration must be a valid number".to_string()),
            }
        }

        if let Some(raw) = text(&self.session_date) {
            match NaiveDate::parse_from_str(raw.trim(), "%Y-%m-%d") {
                Ok(date) => {
                    if date > today {
                        errors.push("Session date cannot be in the future".to_string());
                    }
                    if date < min_session_date() {
                        errors.push("Session date seems too old".to_string());
                    }
                }
                Err(_) => errors.push("Please provide a valid session date".to_string()),
            }
        }

        check_coordinate(&self.latitude, "Latitude", -90.0, 90.0, &mut errors);
        check_coordinate(&self.longitude, "Longitude", -180.0, 180.0, &mut errors);

        if let Some(raw) = text(&self.teacher_feedback) {
            if raw.chars().count() > 1000 {
                errors.push("Teacher feedback must be less than 1000 characters".to_string());
            }
        }

        errors
    }

    /// Validate and, on success, convert to the typed field set.
    ///
    /// The error side carries the full ordered message list, suitable for
    /// returning to the client verbatim.
    pub fn resolve(&self, today: NaiveDate) -> Result<SessionFields, Vec<String>> {
        let errors = self.validate(today);
        if !errors.is_empty() {
            return Err(errors);
        }
        self.to_fields()
            .ok_or_else(|| vec!["Session data could not be interpreted".to_string()])
    }

    /// Typed conversion. Only meaningful after `validate` returned empty;
    /// every step mirrors a rule the validator already enforced.
    fn to_fields(&self) -> Option<SessionFields> {
        Some(SessionFields {
            school_name: text(&self.school_name)?.trim().to_string(),
            session_type: text(&self.session_type)?.trim().to_string(),
            location: text(&self.location)?.trim().to_string(),
            activator: text(&self.activator)?.trim().to_string(),
            year_group: YearGroup::parse(&text(&self.year_group)?).ok()?,
            male_participants: i32::try_from(present(&self.male_participants)?.as_i64()?).ok()?,
            female_participants: i32::try_from(present(&self.female_participants)?.as_i64()?)
                .ok()?,
            teacher_feedback: text(&self.teacher_feedback).map(|s| s.trim().to_string()),
            session_date: NaiveDate::parse_from_str(
                text(&self.session_date)?.trim(),
                "%Y-%m-%d",
            )
            .ok()?,
            session_duration: i32::try_from(present(&self.session_duration)?.as_i64()?).ok()?,
            latitude: match present(&self.latitude) {
                Some(v) => Some(v.as_f64()?),
                None => None,
            },
            longitude: match present(&self.longitude) {
                Some(v) => Some(v.as_f64()?),
                None => None,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Days;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 1, 20).unwrap()
    }

    /// A fully valid submission.
    fn valid_input() -> SessionInput {
        SessionInput {
            school_name: Some("Auckland Primary School".into()),
            session_type: Some("School Festive Day".into()),
            location: Some("School Hall".into()),
            activator: Some("John Smith".into()),
            year_group: Some("Year 5-6".into()),
            male_participants: Some(8.into()),
            female_participants: Some(9.into()),
            teacher_feedback: Some("Great engagement from students".into()),
            session_date: Some("2025-01-16".into()),
            session_duration: Some(60.into()),
            latitude: Some((-36.8485).into()),
            longitude: Some(174.7633.into()),
        }
    }

    #[test]
    fn valid_input_produces_no_errors() {
        assert_eq!(valid_input().validate(today()), Vec::<String>::new());
    }

    #[test]
    fn optional_fields_may_be_absent() {
        let mut input = valid_input();
        input.teacher_feedback = None;
        input.latitude = None;
        input.longitude = None;
        assert!(input.validate(today()).is_empty());
    }

    #[test]
    fn empty_input_reports_every_required_field_once() {
        let errors = SessionInput::default().validate(today());
        let expected = vec![
            "School Name is required",
            "Session Type is required",
            "Location is required",
            "Activator is required",
            "Year Group is required",
            "Male Participants is required",
            "Female Participants is required",
            "Session Date is required",
            "Session Duration is required",
        ];
        assert_eq!(errors, expected);
    }

    #[test]
    fn blank_string_counts_as_missing() {
        let mut input = valid_input();
        input.school_name = Some("   ".into());
        let errors = input.validate(today());
        assert_eq!(errors, vec!["School Name is required"]);
    }

    #[test]
    fn missing_count_fires_only_the_required_rule() {
        let mut input = valid_input();
        input.male_participants = None;
        let errors = input.validate(today());
        // No spurious total-participants or type error alongside it.
        assert_eq!(errors, vec!["Male Participants is required"]);
    }

    #[test]
    fn string_length_bounds() {
        let mut input = valid_input();
        input.school_name = Some("A".into());
        assert_eq!(
            input.validate(today()),
            vec!["School name must be at least 2 characters long"]
        );

        let mut input = valid_input();
        input.school_name = Some("x".repeat(101).as_str().into());
        assert_eq!(
            input.validate(today()),
            vec!["School name must be less than 100 characters"]
        );

        let mut input = valid_input();
        input.session_type = Some("y".repeat(51).as_str().into());
        assert_eq!(
            input.validate(today()),
            vec!["Session type must be less than 50 characters"]
        );

        // Boundary lengths pass.
        let mut input = valid_input();
        input.school_name = Some("x".repeat(100).as_str().into());
        input.location = Some("lo".into());
        assert!(input.validate(today()).is_empty());
    }

    #[test]
    fn activator_character_class() {
        let mut input = valid_input();
        input.activator = Some("Mary-Jane St. Clair".into());
        assert!(input.validate(today()).is_empty());

        input.activator = Some("John Smith 3rd".into());
        assert_eq!(
            input.validate(today()),
            vec!["Activator name can only contain letters, spaces, hyphens, and periods"]
        );
    }

    #[test]
    fn year_group_membership() {
        let mut input = valid_input();
        input.year_group = Some("Year 14".into());
        assert_eq!(
            input.validate(today()),
            vec!["Please select a valid year group"]
        );
    }

    #[test]
    fn count_upper_boundary() {
        let mut input = valid_input();
        input.male_participants = Some(1000.into());
        assert!(input.validate(today()).is_empty());

        input.male_participants = Some(1001.into());
        assert_eq!(
            input.validate(today()),
            vec!["Male participants seems too high (max 1000)"]
        );
    }

    #[test]
    fn negative_count_is_a_range_error_not_a_type_error() {
        let mut input = valid_input();
        input.male_participants = Some((-1i64).into());
        assert_eq!(
            input.validate(today()),
            vec!["Male participants cannot be negative"]
        );
    }

    #[test]
    fn non_numeric_count_is_a_type_error_only() {
        let mut input = valid_input();
        input.female_participants = Some("abc".into());
        // One type error; no range error and no total error.
        assert_eq!(
            input.validate(today()),
            vec!["Female participants must be a valid number"]
        );
    }

    #[test]
    fn numeric_string_counts_parse() {
        let mut input = valid_input();
        input.male_participants = Some(" 12 ".into());
        input.female_participants = Some("0".into());
        assert!(input.validate(today()).is_empty());
    }

    #[test]
    fn zero_total_fails_even_when_counts_are_individually_valid() {
        let mut input = valid_input();
        input.male_participants = Some(0.into());
        input.female_participants = Some(0.into());
        assert_eq!(
            input.validate(today()),
            vec!["Total participants must be greater than 0"]
        );
    }

    #[test]
    fn total_upper_bound() {
        let mut input = valid_input();
        input.male_participants = Some(1000.into());
        input.female_participants = Some(1001.into());
        assert_eq!(
            input.validate(today()),
            vec![
                "Female participants seems too high (max 1000)",
                "Total participants seems too high (max 2000)",
            ]
        );
    }

    #[test]
    fn duration_rules() {
        let mut input = valid_input();
        input.session_duration = Some(0.into());
        assert_eq!(
            input.validate(today()),
            vec!["Session duration must be greater than 0 minutes"]
        );

        input.session_duration = Some(481.into());
        assert_eq!(
            input.validate(today()),
            vec!["Session duration seems too long (max 8 hours)"]
        );

        input.session_duration = Some("ninety".into());
        assert_eq!(
            input.validate(today()),
            vec!["Session duration must be a valid number"]
        );

        input.session_duration = Some(480.into());
        assert!(input.validate(today()).is_empty());
    }

    #[test]
    fn date_boundaries() {
        let mut input = valid_input();
        input.session_date = Some(today().to_string().as_str().into());
        assert!(input.validate(today()).is_empty());

        let tomorrow = today().checked_add_days(Days::new(1)).unwrap();
        input.session_date = Some(tomorrow.to_string().as_str().into());
        assert_eq!(
            input.validate(today()),
            vec!["Session date cannot be in the future"]
        );

        input.session_date = Some("2020-01-01".into());
        assert!(input.validate(today()).is_empty());

        input.session_date = Some("2019-12-31".into());
        assert_eq!(input.validate(today()), vec!["Session date seems too old"]);
    }

    #[test]
    fn unparseable_date_suppresses_range_checks() {
        let mut input = valid_input();
        input.session_date = Some("16/01/2025".into());
        assert_eq!(
            input.validate(today()),
            vec!["Please provide a valid session date"]
        );
    }

    #[test]
    fn coordinate_rules_distinguish_parse_from_range() {
        let mut input = valid_input();
        input.latitude = Some(91.0.into());
        assert_eq!(
            input.validate(today()),
            vec!["Latitude must be between -90 and 90"]
        );

        input.latitude = Some("north".into());
        assert_eq!(
            input.validate(today()),
            vec!["Latitude must be a valid number"]
        );

        input.latitude = Some((-90.0).into());
        input.longitude = Some(180.5.into());
        assert_eq!(
            input.validate(today()),
            vec!["Longitude must be between -180 and 180"]
        );
    }

    #[test]
    fn blank_coordinate_is_treated_as_absent() {
        let mut input = valid_input();
        input.latitude = Some("".into());
        input.longitude = Some("  ".into());
        assert!(input.validate(today()).is_empty());
    }

    #[test]
    fn feedback_length_cap() {
        let mut input = valid_input();
        input.teacher_feedback = Some("f".repeat(1000).as_str().into());
        assert!(input.validate(today()).is_empty());

        input.teacher_feedback = Some("f".repeat(1001).as_str().into());
        assert_eq!(
            input.validate(today()),
            vec!["Teacher feedback must be less than 1000 characters"]
        );
    }

    #[test]
    fn multiple_violations_come_back_together_in_order() {
        let mut input = valid_input();
        input.school_name = Some("A".into());
        input.male_participants = Some("lots".into());
        input.session_duration = Some(0.into());
        let errors = input.validate(today());
        assert_eq!(
            errors,
            vec![
                "School name must be at least 2 characters long",
                "Male participants must be a valid number",
                "Session duration must be greater than 0 minutes",
            ]
        );
    }

    #[test]
    fn resolve_produces_trimmed_typed_fields() {
        let mut input = valid_input();
        input.school_name = Some("  Auckland Primary School  ".into());
        input.female_participants = Some("9".into());
        let fields = input.resolve(today()).unwrap();
        assert_eq!(fields.school_name, "Auckland Primary School");
        assert_eq!(fields.male_participants, 8);
        assert_eq!(fields.female_participants, 9);
        assert_eq!(fields.year_group, YearGroup::Year5To6);
        assert_eq!(
            fields.session_date,
            NaiveDate::from_ymd_opt(2025, 1, 16).unwrap()
        );
        assert_eq!(fields.latitude, Some(-36.8485));
    }

    #[test]
    fn resolve_surfaces_the_error_list() {
        let err = SessionInput::default().resolve(today()).unwrap_err();
        assert_eq!(err.len(), 9);
        assert_eq!(err[0], "School Name is required");
    }

    #[test]
    fn resolve_maps_absent_optionals_to_none() {
        let mut input = valid_input();
        input.teacher_feedback = Some("".into());
        input.latitude = None;
        input.longitude = Some(" ".into());
        let fields = input.resolve(today()).unwrap();
        assert_eq!(fields.teacher_feedback, None);
        assert_eq!(fields.latitude, None);
        assert_eq!(fields.longitude, None);
    }

    #[test]
    fn validate_is_deterministic() {
        let mut input = valid_input();
        input.school_name = Some("A".into());
        input.latitude = Some("x".into());
        let first = input.validate(today());
        let second = input.validate(today());
        assert_eq!(first, second);
    }
}
