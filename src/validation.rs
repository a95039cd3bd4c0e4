use serde::Serialize;

use crate::models::LectureSubmission;

/// One violated rule: which field, what the client sent, a stable rule code
/// and a human-readable reason.
#[derive(Debug, Clone, Serialize)]
pub struct ValidationError {
    pub field: String,
    pub rejected_value: Option<String>,
    pub code: String,
    pub reason: String,
}

/// Accumulator for a single validation pass. Rules append entries instead
/// of returning early, so one response reports every violation at once.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(Vec<ValidationError>);

impl ValidationErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(
        &mut self,
        field: &str,
        rejected_value: Option<String>,
        code: &str,
        reason: impl Into<String>,
    ) {
        self.0.push(ValidationError {
            field: field.to_string(),
            rejected_value,
            code: code.to_string(),
            reason: reason.into(),
        });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn entries(&self) -> &[ValidationError] {
        &self.0
    }
}

/// Domain rules that per-field constraints cannot express. Advisory only:
/// never fails via control flow and never mutates the submission. The
/// caller rejects the request iff the accumulator is non-empty afterwards.
pub fn validate_submission(sub: &LectureSubmission, errors: &mut ValidationErrors) {
    if sub.title.trim().is_empty() {
        errors.push(
            "title",
            Some(sub.title.clone()),
            "title.blank",
            "title must not be blank",
        );
    }

    if let Some(price) = sub.price {
        if price < 0 {
            errors.push(
                "price",
                Some(price.to_string()),
                "price.negative",
                "price must not be negative",
            );
        }
    }

    if let (Some(begin), Some(end)) = (sub.begin_at, sub.end_at) {
        if end <= begin {
            errors.push(
                "end_at",
                Some(end.to_rfc3339()),
                "end_at.before_begin",
                "end_at must be after begin_at",
            );
        }
    }

    let paid = sub.price.is_some_and(|p| p > 0);
    let no_location = sub.location.as_deref().map(str::trim).is_none_or(str::is_empty);
    if paid && no_location {
        errors.push(
            "location",
            sub.location.clone(),
            "location.required_when_paid",
            "a paid lecture must name a location",
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    fn valid_submission() -> LectureSubmission {
        LectureSubmission {
            title: "Intro to Rust".to_string(),
            description: None,
            begin_at: Some(Utc::now()),
            end_at: Some(Utc::now() + Duration::hours(2)),
            price: Some(10000),
            location: Some("Room 3".to_string()),
        }
    }

    #[test]
    fn valid_submission_accumulates_nothing() {
        let mut errors = ValidationErrors::new();
        validate_submission(&valid_submission(), &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn inverted_time_range_is_rejected_on_end_at() {
        let mut sub = valid_submission();
        std::mem::swap(&mut sub.begin_at, &mut sub.end_at);

        let mut errors = ValidationErrors::new();
        validate_submission(&sub, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.entries()[0].field, "end_at");
        assert_eq!(errors.entries()[0].code, "end_at.before_begin");
    }

    #[test]
    fn paid_lecture_without_location_is_rejected() {
        let mut sub = valid_submission();
        sub.location = None;

        let mut errors = ValidationErrors::new();
        validate_submission(&sub, &mut errors);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.entries()[0].code, "location.required_when_paid");
    }

    #[test]
    fn free_lecture_without_location_is_fine() {
        let mut sub = valid_submission();
        sub.price = Some(0);
        sub.location = None;

        let mut errors = ValidationErrors::new();
        validate_submission(&sub, &mut errors);
        assert!(errors.is_empty());
    }

    #[test]
    fn independent_violations_accumulate_in_one_pass() {
        let mut sub = valid_submission();
        std::mem::swap(&mut sub.begin_at, &mut sub.end_at);
        sub.location = Some("  ".to_string());

        let mut errors = ValidationErrors::new();
        validate_submission(&sub, &mut errors);
        assert_eq!(errors.len(), 2);

        let codes: Vec<&str> = errors.entries().iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"end_at.before_begin"));
        assert!(codes.contains(&"location.required_when_paid"));
    }

    #[test]
    fn blank_title_and_negative_price_are_rejected() {
        let mut sub = valid_submission();
        sub.title = "   ".to_string();
        sub.price = Some(-1);

        let mut errors = ValidationErrors::new();
        validate_submission(&sub, &mut errors);

        let codes: Vec<&str> = errors.entries().iter().map(|e| e.code.as_str()).collect();
        assert!(codes.contains(&"title.blank"));
        assert!(codes.contains(&"price.negative"));
    }
}
