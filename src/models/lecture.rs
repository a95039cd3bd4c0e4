use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Lecture {
    pub id: i64,
    pub title: String,
    pub description: Option<String>,
    pub begin_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub price: Option<i64>,
    pub location: Option<String>,
    pub free: bool,
    pub offline: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Caller-supplied fields for create and update. `free` and `offline` are
/// deliberately absent: clients cannot set them, they are recomputed on
/// every write.
#[derive(Debug, Clone, Deserialize)]
pub struct LectureSubmission {
    pub title: String,
    pub description: Option<String>,
    pub begin_at: Option<DateTime<Utc>>,
    pub end_at: Option<DateTime<Utc>>,
    pub price: Option<i64>,
    pub location: Option<String>,
}

/// Derived-flag rule: a lecture is free when no positive price is set, and
/// offline when no location is given.
pub fn derive_flags(price: Option<i64>, location: Option<&str>) -> (bool, bool) {
    let free = price.unwrap_or(0) == 0;
    let offline = location.map(str::trim).is_none_or(str::is_empty);
    (free, offline)
}

impl Lecture {
    /// Builds a fresh entity from a submission. Flags come from
    /// `refresh_derived`, never from the caller.
    pub fn from_submission(sub: LectureSubmission, now: DateTime<Utc>) -> Self {
        let mut lecture = Lecture {
            id: 0,
            title: sub.title,
            description: sub.description,
            begin_at: sub.begin_at,
            end_at: sub.end_at,
            price: sub.price,
            location: sub.location,
            free: false,
            offline: false,
            created_at: now,
            updated_at: now,
        };
        lecture.refresh_derived();
        lecture
    }

    /// Overlays submitted fields onto an existing row, then re-derives both
    /// flags together. Update is read-modify-write.
    pub fn apply_submission(&mut self, sub: LectureSubmission, now: DateTime<Utc>) {
        self.title = sub.title;
        self.description = sub.description;
        self.begin_at = sub.begin_at;
        self.end_at = sub.end_at;
        self.price = sub.price;
        self.location = sub.location;
        self.updated_at = now;
        self.refresh_derived();
    }

    /// Recomputes `free` and `offline` from the current price and location.
    /// Called exactly once per write path, immediately before the row is
    /// persisted.
    pub fn refresh_derived(&mut self) {
        let (free, offline) = derive_flags(self.price, self.location.as_deref());
        self.free = free;
        self.offline = offline;
    }
}
