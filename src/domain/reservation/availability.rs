//! Date ranges and the overlap rule shared by every availability check.

use chrono::NaiveDate;

use super::model::Reservation;
use crate::domain::{DomainError, DomainResult};

/// How two ranges that only touch at a boundary date are treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BoundaryPolicy {
    /// `[a, b]` and `[b, c]` do not overlap: a car returned on `b` can be
    /// picked up again on `b`.
    #[default]
    AllowBackToBack,
    /// Sharing a boundary date counts as an overlap.
    Inclusive,
}

impl BoundaryPolicy {
    pub fn from_allow_back_to_back(allow: bool) -> Self {
        if allow {
            Self::AllowBackToBack
        } else {
            Self::Inclusive
        }
    }
}

/// A rental period. `end` is always strictly after `start`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateRange {
    pub fn new(start: NaiveDate, end: NaiveDate) -> DomainResult<Self> {
        if end <= start {
            return Err(DomainError::Validation(
                "End date must be after start date".to_string(),
            ));
        }
        Ok(Self { start, end })
    }

    /// Rebuilds a range from persisted bounds, which were validated on the
    /// way in.
    pub(crate) fn from_stored(start: NaiveDate, end: NaiveDate) -> Self {
        Self { start, end }
    }

    pub fn start(&self) -> NaiveDate {
        self.start
    }

    pub fn end(&self) -> NaiveDate {
        self.end
    }

    /// Billable days: both the pickup and the return day are charged.
    pub fn rental_days(&self) -> i64 {
        ((self.end - self.start).num_days().abs() + 1).max(1)
    }

    pub fn overlaps(&self, other: &DateRange, policy: BoundaryPolicy) -> bool {
        match policy {
            BoundaryPolicy::AllowBackToBack => self.start < other.end && other.start < self.end,
            BoundaryPolicy::Inclusive => self.start <= other.end && other.start <= self.end,
        }
    }
}

/// Returns the first reservation in `existing` that would be double-booked
/// by `candidate`.
///
/// Only blocking reservations of the same car count, and `candidate` never
/// conflicts with itself.
pub fn find_conflict<'a>(
    candidate: &Reservation,
    existing: impl IntoIterator<Item = &'a Reservation>,
    policy: BoundaryPolicy,
) -> Option<&'a Reservation> {
    let period = candidate.period();
    existing.into_iter().find(|other| {
        other.id != candidate.id
            && other.car_id == candidate.car_id
            && other.status.is_blocking()
            && other.period().overlaps(&period, policy)
    })
}

/// Parses a booking date. Accepts `YYYY-MM-DD` or an RFC 3339 timestamp,
/// which is truncated to its calendar date.
pub fn parse_date(field: &str, value: &str) -> DomainResult<NaiveDate> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }

    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .or_else(|_| chrono::DateTime::parse_from_rfc3339(value).map(|dt| dt.date_naive()))
        .map_err(|_| DomainError::Validation(format!("{} is not a valid date: {}", field, value)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn range(start: &str, end: &str) -> DateRange {
        DateRange::new(d(start), d(end)).unwrap()
    }

    #[test]
    fn end_must_be_after_start() {
        assert!(matches!(
            DateRange::new(d("2025-06-03"), d("2025-06-03")),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            DateRange::new(d("2025-06-03"), d("2025-06-01")),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn rental_days_counts_both_ends() {
        assert_eq!(range("2025-06-01", "2025-06-03").rental_days(), 3);
        assert_eq!(range("2025-06-01", "2025-06-02").rental_days(), 2);
        assert_eq!(range("2025-12-30", "2026-01-02").rental_days(), 4);
    }

    #[test]
    fn back_to_back_ranges_do_not_overlap_by_default() {
        let first = range("2025-07-10", "2025-07-15");
        let next = range("2025-07-15", "2025-07-20");
        assert!(!first.overlaps(&next, BoundaryPolicy::AllowBackToBack));
        assert!(!next.overlaps(&first, BoundaryPolicy::AllowBackToBack));
        assert!(first.overlaps(&next, BoundaryPolicy::Inclusive));
    }

    #[test]
    fn intersecting_ranges_overlap_under_both_policies() {
        let a = range("2025-07-10", "2025-07-15");
        let b = range("2025-07-12", "2025-07-20");
        let inner = range("2025-07-11", "2025-07-12");
        for policy in [BoundaryPolicy::AllowBackToBack, BoundaryPolicy::Inclusive] {
            assert!(a.overlaps(&b, policy));
            assert!(b.overlaps(&a, policy));
            assert!(a.overlaps(&inner, policy));
        }
    }

    #[test]
    fn disjoint_ranges_never_overlap() {
        let a = range("2025-07-01", "2025-07-03");
        let b = range("2025-07-05", "2025-07-08");
        assert!(!a.overlaps(&b, BoundaryPolicy::Inclusive));
        assert!(!a.overlaps(&b, BoundaryPolicy::AllowBackToBack));
    }

    #[test]
    fn parse_date_accepts_plain_and_rfc3339() {
        assert_eq!(parse_date("start_date", "2025-06-01").unwrap(), d("2025-06-01"));
        assert_eq!(
            parse_date("start_date", "2025-06-01T10:30:00Z").unwrap(),
            d("2025-06-01")
        );
    }

    #[test]
    fn parse_date_rejects_empty_and_garbage() {
        assert!(matches!(parse_date("end_date", "  "), Err(DomainError::Validation(_))));
        assert!(matches!(parse_date("end_date", "tomorrow"), Err(DomainError::Validation(_))));
    }
}
