//! Reservation domain entity

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;

use super::availability::DateRange;
use crate::domain::car::CarSummary;
use crate::domain::user::CustomerSummary;
use crate::domain::{DomainError, DomainResult};

/// Reservation status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReservationStatus {
    /// Awaiting review
    Pending,
    /// Booked through the customer flow
    Active,
    /// Confirmed by an administrator
    Approved,
    /// Declined by an administrator
    Rejected,
    /// Rental finished
    Completed,
    /// Withdrawn by the customer or an administrator
    Cancelled,
}

impl ReservationStatus {
    pub const ALL: [ReservationStatus; 6] = [
        Self::Pending,
        Self::Active,
        Self::Approved,
        Self::Rejected,
        Self::Completed,
        Self::Cancelled,
    ];

    /// Statuses that occupy the car for their date range.
    pub const BLOCKING: [ReservationStatus; 2] = [Self::Active, Self::Approved];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Active => "ACTIVE",
            Self::Approved => "APPROVED",
            Self::Rejected => "REJECTED",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn is_blocking(&self) -> bool {
        Self::BLOCKING.contains(self)
    }

    pub fn is_terminal(&self) -> bool {
        self.allowed_transitions().is_empty()
    }

    pub fn allowed_transitions(&self) -> &'static [ReservationStatus] {
        use ReservationStatus::*;
        match self {
            Pending => &[Active, Approved, Rejected, Cancelled],
            Active => &[Approved, Rejected, Completed, Cancelled],
            Approved => &[Active, Completed, Cancelled],
            Rejected | Completed | Cancelled => &[],
        }
    }

    pub fn can_transition_to(&self, next: ReservationStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

impl FromStr for ReservationStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| DomainError::Validation(format!("Invalid status: {}", s)))
    }
}

impl std::fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Booking of one car by one customer for a date range
#[derive(Debug, Clone, PartialEq)]
pub struct Reservation {
    pub id: String,
    pub customer_id: String,
    pub car_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    /// Total price in cents
    pub total_cost_cents: i64,
    pub status: ReservationStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Reservation {
    /// Creates an `ACTIVE` reservation priced at `price_per_day_cents` for
    /// every billable day of `period`. Fails if the total does not fit.
    pub fn new(
        customer_id: impl Into<String>,
        car_id: impl Into<String>,
        period: DateRange,
        price_per_day_cents: i64,
    ) -> DomainResult<Self> {
        let total_cost_cents = period
            .rental_days()
            .checked_mul(price_per_day_cents)
            .ok_or_else(|| {
                DomainError::Validation("Total cost for the selected dates is too large".to_string())
            })?;
        let now = Utc::now();
        Ok(Self {
            id: uuid::Uuid::new_v4().to_string(),
            customer_id: customer_id.into(),
            car_id: car_id.into(),
            start_date: period.start(),
            end_date: period.end(),
            total_cost_cents,
            status: ReservationStatus::Active,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn period(&self) -> DateRange {
        DateRange::from_stored(self.start_date, self.end_date)
    }

    pub fn is_owned_by(&self, customer_id: &str) -> bool {
        self.customer_id == customer_id
    }

    pub fn total_cost(&self) -> Decimal {
        Decimal::new(self.total_cost_cents, 2)
    }

    /// Moves to `next` if the transition table allows it.
    pub fn transition_to(&mut self, next: ReservationStatus) -> DomainResult<()> {
        if self.status == next {
            return Err(DomainError::InvalidState(format!(
                "Reservation is already {}",
                next
            )));
        }
        if !self.status.can_transition_to(next) {
            return Err(DomainError::InvalidState(format!(
                "Cannot change reservation status from {} to {}",
                self.status, next
            )));
        }
        self.status = next;
        self.updated_at = Utc::now();
        Ok(())
    }

    /// Customer cancellation: only before the start date has begun.
    pub fn cancel(&mut self, now: DateTime<Utc>) -> DomainResult<()> {
        if self.start_date <= now.date_naive() {
            return Err(DomainError::InvalidState(
                "Cannot cancel booking after start date".to_string(),
            ));
        }
        if self.status == ReservationStatus::Cancelled {
            return Err(DomainError::InvalidState(
                "Booking is already cancelled".to_string(),
            ));
        }
        self.transition_to(ReservationStatus::Cancelled)
    }
}

/// A reservation together with the summaries the views embed.
#[derive(Debug, Clone)]
pub struct ReservationDetails {
    pub reservation: Reservation,
    pub car: CarSummary,
    /// Present only in administrative views
    pub customer: Option<CustomerSummary>,
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn d(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    fn sample(start: NaiveDate, end: NaiveDate) -> Reservation {
        Reservation::new("cust-1", "car-1", DateRange::new(start, end).unwrap(), 5000).unwrap()
    }

    #[test]
    fn new_reservation_is_active_and_priced() {
        let r = sample(d("2025-06-01"), d("2025-06-03"));
        assert_eq!(r.status, ReservationStatus::Active);
        assert_eq!(r.total_cost_cents, 15_000);
        assert_eq!(r.total_cost(), Decimal::new(15_000, 2));
        assert_eq!(r.total_cost().to_string(), "150.00");
        assert_eq!(r.created_at, r.updated_at);
    }

    #[test]
    fn total_cost_overflow_is_a_validation_error() {
        let period = DateRange::new(d("2030-01-01"), d("2030-01-03")).unwrap();
        let err = Reservation::new("cust-1", "car-1", period, 4_000_000_000_000_000_000).unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
    }

    #[test]
    fn status_parses_case_insensitively() {
        assert_eq!("approved".parse::<ReservationStatus>().unwrap(), ReservationStatus::Approved);
        assert_eq!(" CANCELLED ".parse::<ReservationStatus>().unwrap(), ReservationStatus::Cancelled);
        for status in ReservationStatus::ALL {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
    }

    #[test]
    fn unknown_status_is_a_validation_error() {
        assert!(matches!(
            "ARCHIVED".parse::<ReservationStatus>(),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn only_active_and_approved_block() {
        let blocking: Vec<_> = ReservationStatus::ALL
            .into_iter()
            .filter(|s| s.is_blocking())
            .collect();
        assert_eq!(blocking, vec![ReservationStatus::Active, ReservationStatus::Approved]);
    }

    #[test]
    fn terminal_statuses_allow_nothing() {
        for status in [
            ReservationStatus::Rejected,
            ReservationStatus::Completed,
            ReservationStatus::Cancelled,
        ] {
            assert!(status.is_terminal());
            for next in ReservationStatus::ALL {
                assert!(!status.can_transition_to(next));
            }
        }
    }

    #[test]
    fn lifecycle_follows_transition_table() {
        let mut r = sample(d("2025-06-01"), d("2025-06-03"));
        r.transition_to(ReservationStatus::Approved).unwrap();
        r.transition_to(ReservationStatus::Completed).unwrap();
        let err = r.transition_to(ReservationStatus::Active).unwrap_err();
        assert!(matches!(err, DomainError::InvalidState(_)));
        assert_eq!(r.status, ReservationStatus::Completed);
    }

    #[test]
    fn same_status_write_is_rejected() {
        let mut r = sample(d("2025-06-01"), d("2025-06-03"));
        assert!(matches!(
            r.transition_to(ReservationStatus::Active),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn cancel_before_start_then_again() {
        let today = Utc::now().date_naive();
        let mut r = sample(today + Duration::days(3), today + Duration::days(5));
        r.cancel(Utc::now()).unwrap();
        assert_eq!(r.status, ReservationStatus::Cancelled);
        assert!(matches!(r.cancel(Utc::now()), Err(DomainError::InvalidState(_))));
    }

    #[test]
    fn cancel_on_start_day_is_rejected() {
        let today = Utc::now().date_naive();
        let mut r = sample(today, today + Duration::days(2));
        assert!(matches!(r.cancel(Utc::now()), Err(DomainError::InvalidState(_))));
        assert_eq!(r.status, ReservationStatus::Active);
    }

    #[test]
    fn completed_reservation_cannot_be_cancelled() {
        let today = Utc::now().date_naive();
        let mut r = sample(today + Duration::days(3), today + Duration::days(5));
        r.transition_to(ReservationStatus::Completed).unwrap();
        assert!(matches!(r.cancel(Utc::now()), Err(DomainError::InvalidState(_))));
    }
}
