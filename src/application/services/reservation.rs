//! Reservation engine
//!
//! Owns every write to a reservation. Availability checks and the writes
//! they guard run under a per-car lock, and the repository repeats the
//! check inside its transaction, so two concurrent requests for the same
//! car can never both end up blocking overlapping dates.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use dashmap::DashMap;
use tokio::sync::Mutex;
use tracing::{info, warn};

use crate::domain::reservation::parse_date;
use crate::domain::{
    BoundaryPolicy, CarSummary, CustomerSummary, DateRange, DomainError, DomainResult,
    RepositoryProvider, Reservation, ReservationDetails, ReservationStatus,
};

/// Booking request as received from a customer
#[derive(Debug, Clone, Default)]
pub struct NewReservation {
    pub car_id: String,
    pub start_date: String,
    pub end_date: String,
}

pub struct ReservationService {
    repos: Arc<dyn RepositoryProvider>,
    policy: BoundaryPolicy,
    car_locks: DashMap<String, Arc<Mutex<()>>>,
}

impl ReservationService {
    pub fn new(repos: Arc<dyn RepositoryProvider>, policy: BoundaryPolicy) -> Self {
        Self {
            repos,
            policy,
            car_locks: DashMap::new(),
        }
    }

    pub fn policy(&self) -> BoundaryPolicy {
        self.policy
    }

    fn car_lock(&self, car_id: &str) -> Arc<Mutex<()>> {
        self.car_locks
            .entry(car_id.to_string())
            .or_insert_with(|| Arc::new(Mutex::new(())))
            .clone()
    }

    // ── Customer operations ─────────────────────────────────────

    /// Book a car for `customer_id`. The new reservation starts `ACTIVE`.
    pub async fn create_reservation(
        &self,
        customer_id: &str,
        request: NewReservation,
    ) -> DomainResult<ReservationDetails> {
        let car_id = request.car_id.trim();
        if car_id.is_empty() {
            return Err(DomainError::Validation("car_id is required".to_string()));
        }
        let start = parse_date("start_date", &request.start_date)?;
        let end = parse_date("end_date", &request.end_date)?;
        let period = DateRange::new(start, end)?;

        let car = self
            .repos
            .cars()
            .find_by_id(car_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", car_id))?;

        let reservation = Reservation::new(customer_id, &car.id, period, car.price_per_day_cents)?;

        let lock = self.car_lock(&car.id);
        let _guard = lock.lock().await;
        if let Err(e) = self
            .repos
            .reservations()
            .insert_if_available(&reservation, self.policy)
            .await
        {
            if matches!(e, DomainError::Conflict(_)) {
                warn!(
                    "Booking refused for car {} ({} to {}): dates taken",
                    car.id, start, end
                );
            }
            return Err(e);
        }

        info!(
            "Reservation {} created: car {} for customer {} ({} to {}, {})",
            reservation.id,
            car.id,
            customer_id,
            start,
            end,
            reservation.total_cost()
        );

        Ok(ReservationDetails {
            reservation,
            car: car.summary(),
            customer: None,
        })
    }

    /// The customer's own reservations, newest first.
    pub async fn list_reservations_for_customer(
        &self,
        customer_id: &str,
    ) -> DomainResult<Vec<ReservationDetails>> {
        let reservations = self.repos.reservations().find_by_customer(customer_id).await?;
        self.with_summaries(reservations, false).await
    }

    /// One reservation, visible only to the customer who made it.
    pub async fn get_reservation_detail(
        &self,
        customer_id: &str,
        reservation_id: &str,
    ) -> DomainResult<ReservationDetails> {
        let reservation = self.owned(customer_id, reservation_id).await?;
        self.details(reservation, false).await
    }

    /// Customer cancellation; only allowed before the start date.
    pub async fn cancel_reservation(
        &self,
        customer_id: &str,
        reservation_id: &str,
    ) -> DomainResult<ReservationDetails> {
        let snapshot = self.owned(customer_id, reservation_id).await?;

        let lock = self.car_lock(&snapshot.car_id);
        let _guard = lock.lock().await;

        // Re-read under the lock so a concurrent status change is not lost.
        let mut reservation = self.owned(customer_id, reservation_id).await?;
        reservation.cancel(Utc::now())?;
        self.repos
            .reservations()
            .update_status(&reservation, None)
            .await?;

        info!("Reservation {} cancelled by customer {}", reservation.id, customer_id);
        self.details(reservation, false).await
    }

    async fn owned(&self, customer_id: &str, reservation_id: &str) -> DomainResult<Reservation> {
        let reservation = self.load(reservation_id).await?;
        if !reservation.is_owned_by(customer_id) {
            return Err(DomainError::Forbidden(
                "Reservation belongs to another customer".to_string(),
            ));
        }
        Ok(reservation)
    }

    // ── Administrative operations ───────────────────────────────

    /// Every reservation with car and customer summaries, newest first.
    pub async fn admin_list_all(&self) -> DomainResult<Vec<ReservationDetails>> {
        let reservations = self.repos.reservations().find_all().await?;
        self.with_summaries(reservations, true).await
    }

    pub async fn admin_get(&self, reservation_id: &str) -> DomainResult<ReservationDetails> {
        let reservation = self.load(reservation_id).await?;
        self.details(reservation, true).await
    }

    /// Move a reservation to `status`. Moving into a blocking status
    /// re-checks availability for the reservation's dates.
    pub async fn admin_change_status(
        &self,
        reservation_id: &str,
        status: &str,
    ) -> DomainResult<ReservationDetails> {
        let next: ReservationStatus = status.parse()?;
        let snapshot = self.load(reservation_id).await?;

        let lock = self.car_lock(&snapshot.car_id);
        let _guard = lock.lock().await;

        let mut reservation = self.load(reservation_id).await?;
        let previous = reservation.status;
        reservation.transition_to(next)?;

        let conflict_policy = next.is_blocking().then_some(self.policy);
        self.repos
            .reservations()
            .update_status(&reservation, conflict_policy)
            .await?;

        info!(
            "Reservation {} status changed: {} -> {}",
            reservation.id, previous, next
        );
        self.details(reservation, true).await
    }

    // ── Views ───────────────────────────────────────────────────

    async fn load(&self, reservation_id: &str) -> DomainResult<Reservation> {
        self.repos
            .reservations()
            .find_by_id(reservation_id)
            .await?
            .ok_or_else(|| DomainError::not_found("Reservation", reservation_id))
    }

    async fn details(
        &self,
        reservation: Reservation,
        with_customer: bool,
    ) -> DomainResult<ReservationDetails> {
        let mut views = self.with_summaries(vec![reservation], with_customer).await?;
        views
            .pop()
            .ok_or_else(|| DomainError::Storage("Reservation view could not be built".to_string()))
    }

    /// Attaches car (and optionally customer) summaries, loading each
    /// referenced car and customer once.
    async fn with_summaries(
        &self,
        reservations: Vec<Reservation>,
        with_customer: bool,
    ) -> DomainResult<Vec<ReservationDetails>> {
        let mut cars: HashMap<String, CarSummary> = HashMap::new();
        let mut customers: HashMap<String, CustomerSummary> = HashMap::new();
        let mut views = Vec::with_capacity(reservations.len());

        for reservation in reservations {
            if !cars.contains_key(&reservation.car_id) {
                let car = self
                    .repos
                    .cars()
                    .find_by_id(&reservation.car_id)
                    .await?
                    .ok_or_else(|| DomainError::not_found("Car", &reservation.car_id))?;
                cars.insert(car.id.clone(), car.summary());
            }

            let customer = if with_customer {
                if !customers.contains_key(&reservation.customer_id) {
                    let user = self
                        .repos
                        .users()
                        .find_by_id(&reservation.customer_id)
                        .await?
                        .ok_or_else(|| DomainError::not_found("User", &reservation.customer_id))?;
                    customers.insert(user.id.clone(), user.summary());
                }
                customers.get(&reservation.customer_id).cloned()
            } else {
                None
            };

            let car = cars
                .get(&reservation.car_id)
                .cloned()
                .ok_or_else(|| DomainError::not_found("Car", &reservation.car_id))?;

            views.push(ReservationDetails {
                reservation,
                car,
                customer,
            });
        }

        Ok(views)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, NaiveDate};
    use rust_decimal::Decimal;

    use crate::domain::{Car, PrincipalKind, User};
    use crate::infrastructure::database::testing::{file_repos, memory_repos, seed_car, seed_user};

    struct Fixture {
        repos: Arc<dyn RepositoryProvider>,
        svc: Arc<ReservationService>,
        car: Car,
        ann: User,
        bob: User,
    }

    async fn fixture() -> Fixture {
        let repos = memory_repos().await;
        let car = seed_car(repos.as_ref(), 5000).await;
        let ann = seed_user(repos.as_ref(), "ann@example.com", PrincipalKind::Customer).await;
        let bob = seed_user(repos.as_ref(), "bob@example.com", PrincipalKind::Customer).await;
        let svc = Arc::new(ReservationService::new(repos.clone(), BoundaryPolicy::default()));
        Fixture {
            repos,
            svc,
            car,
            ann,
            bob,
        }
    }

    fn request(car: &Car, start: NaiveDate, end: NaiveDate) -> NewReservation {
        NewReservation {
            car_id: car.id.clone(),
            start_date: start.format("%Y-%m-%d").to_string(),
            end_date: end.format("%Y-%m-%d").to_string(),
        }
    }

    fn days_from_now(days: i64) -> NaiveDate {
        Utc::now().date_naive() + Duration::days(days)
    }

    #[tokio::test]
    async fn three_day_booking_costs_three_daily_rates() {
        let f = fixture().await;
        let booking = NewReservation {
            car_id: f.car.id.clone(),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-03".into(),
        };
        let details = f.svc.create_reservation(&f.ann.id, booking).await.unwrap();

        assert_eq!(details.reservation.status, ReservationStatus::Active);
        assert_eq!(details.reservation.total_cost(), Decimal::new(15_000, 2));
        assert_eq!(details.car.id, f.car.id);
        assert!(details.customer.is_none());
    }

    #[tokio::test]
    async fn end_on_or_before_start_is_rejected_without_writing() {
        let f = fixture().await;
        let booking = NewReservation {
            car_id: f.car.id.clone(),
            start_date: "2025-06-03".into(),
            end_date: "2025-06-03".into(),
        };
        assert!(matches!(
            f.svc.create_reservation(&f.ann.id, booking).await,
            Err(DomainError::Validation(_))
        ));
        assert!(f.svc.list_reservations_for_customer(&f.ann.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn missing_fields_and_unknown_car() {
        let f = fixture().await;
        assert!(matches!(
            f.svc.create_reservation(&f.ann.id, NewReservation::default()).await,
            Err(DomainError::Validation(_))
        ));
        let booking = NewReservation {
            car_id: "no-such-car".into(),
            start_date: "2025-06-01".into(),
            end_date: "2025-06-03".into(),
        };
        assert!(matches!(
            f.svc.create_reservation(&f.ann.id, booking).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn overlapping_booking_conflicts_but_touching_one_succeeds() {
        let f = fixture().await;
        let july = |d| NaiveDate::from_ymd_opt(2030, 7, d).unwrap();
        f.svc
            .create_reservation(&f.ann.id, request(&f.car, july(10), july(15)))
            .await
            .unwrap();

        let err = f
            .svc
            .create_reservation(&f.bob.id, request(&f.car, july(12), july(20)))
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::Conflict("Car is not available for selected dates".to_string())
        );

        f.svc
            .create_reservation(&f.bob.id, request(&f.car, july(15), july(20)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancelled_booking_frees_the_dates() {
        let f = fixture().await;
        let first = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(10), days_from_now(12)))
            .await
            .unwrap();
        f.svc
            .cancel_reservation(&f.ann.id, &first.reservation.id)
            .await
            .unwrap();

        f.svc
            .create_reservation(&f.bob.id, request(&f.car, days_from_now(10), days_from_now(12)))
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn cancel_before_start_then_second_cancel_fails() {
        let f = fixture().await;
        let booking = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(5), days_from_now(7)))
            .await
            .unwrap();

        let cancelled = f
            .svc
            .cancel_reservation(&f.ann.id, &booking.reservation.id)
            .await
            .unwrap();
        assert_eq!(cancelled.reservation.status, ReservationStatus::Cancelled);

        let err = f
            .svc
            .cancel_reservation(&f.ann.id, &booking.reservation.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState("Booking is already cancelled".to_string())
        );
    }

    #[tokio::test]
    async fn cancel_after_start_is_rejected() {
        let f = fixture().await;
        let booking = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(-2), days_from_now(2)))
            .await
            .unwrap();

        let err = f
            .svc
            .cancel_reservation(&f.ann.id, &booking.reservation.id)
            .await
            .unwrap_err();
        assert_eq!(
            err,
            DomainError::InvalidState("Cannot cancel booking after start date".to_string())
        );
        let stored = f.svc.admin_get(&booking.reservation.id).await.unwrap();
        assert_eq!(stored.reservation.status, ReservationStatus::Active);
    }

    #[tokio::test]
    async fn other_customers_cannot_see_or_cancel() {
        let f = fixture().await;
        let booking = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(5), days_from_now(7)))
            .await
            .unwrap();
        let id = &booking.reservation.id;

        assert!(matches!(
            f.svc.get_reservation_detail(&f.bob.id, id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            f.svc.cancel_reservation(&f.bob.id, id).await,
            Err(DomainError::Forbidden(_))
        ));
        assert!(matches!(
            f.svc.get_reservation_detail(&f.bob.id, "missing").await,
            Err(DomainError::NotFound { .. })
        ));
        assert!(f.svc.list_reservations_for_customer(&f.bob.id).await.unwrap().is_empty());
        assert_eq!(
            f.svc.get_reservation_detail(&f.ann.id, id).await.unwrap().reservation.id,
            *id
        );
    }

    #[tokio::test]
    async fn unknown_status_leaves_reservation_unchanged() {
        let f = fixture().await;
        let booking = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(5), days_from_now(7)))
            .await
            .unwrap();

        assert!(matches!(
            f.svc.admin_change_status(&booking.reservation.id, "ARCHIVED").await,
            Err(DomainError::Validation(_))
        ));
        let stored = f.svc.admin_get(&booking.reservation.id).await.unwrap();
        assert_eq!(stored.reservation.status, ReservationStatus::Active);
    }

    #[tokio::test]
    async fn admin_lifecycle_follows_transition_table() {
        let f = fixture().await;
        let booking = f
            .svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(5), days_from_now(7)))
            .await
            .unwrap();
        let id = &booking.reservation.id;

        let approved = f.svc.admin_change_status(id, "approved").await.unwrap();
        assert_eq!(approved.reservation.status, ReservationStatus::Approved);
        assert_eq!(
            approved.customer.as_ref().map(|c| c.email.as_str()),
            Some("ann@example.com")
        );

        f.svc.admin_change_status(id, "COMPLETED").await.unwrap();
        assert!(matches!(
            f.svc.admin_change_status(id, "ACTIVE").await,
            Err(DomainError::InvalidState(_))
        ));
        assert!(matches!(
            f.svc.admin_change_status("missing", "ACTIVE").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn approving_into_taken_dates_conflicts() {
        let f = fixture().await;
        let july = |d| NaiveDate::from_ymd_opt(2030, 7, d).unwrap();

        // A pending reservation does not hold its dates, so seed one directly.
        let mut pending = Reservation::new(
            &f.bob.id,
            &f.car.id,
            DateRange::new(july(11), july(13)).unwrap(),
            f.car.price_per_day_cents,
        )
        .unwrap();
        pending.status = ReservationStatus::Pending;
        f.repos
            .reservations()
            .insert_if_available(&pending, BoundaryPolicy::default())
            .await
            .unwrap();

        f.svc
            .create_reservation(&f.ann.id, request(&f.car, july(10), july(15)))
            .await
            .unwrap();

        assert!(matches!(
            f.svc.admin_change_status(&pending.id, "APPROVED").await,
            Err(DomainError::Conflict(_))
        ));
        let stored = f.svc.admin_get(&pending.id).await.unwrap();
        assert_eq!(stored.reservation.status, ReservationStatus::Pending);

        f.svc.admin_change_status(&pending.id, "REJECTED").await.unwrap();
    }

    #[tokio::test]
    async fn admin_list_includes_every_customer() {
        let f = fixture().await;
        f.svc
            .create_reservation(&f.ann.id, request(&f.car, days_from_now(5), days_from_now(7)))
            .await
            .unwrap();
        f.svc
            .create_reservation(&f.bob.id, request(&f.car, days_from_now(8), days_from_now(9)))
            .await
            .unwrap();

        let all = f.svc.admin_list_all().await.unwrap();
        assert_eq!(all.len(), 2);
        assert!(all.iter().all(|d| d.customer.is_some()));
    }

    #[tokio::test]
    async fn concurrent_requests_for_same_dates_book_once() {
        let f = fixture().await;
        let (start, end) = (days_from_now(20), days_from_now(22));

        let (a, b) = tokio::join!(
            f.svc.create_reservation(&f.ann.id, request(&f.car, start, end)),
            f.svc.create_reservation(&f.bob.id, request(&f.car, start, end)),
        );

        let outcomes = [a, b];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict(_)))));
    }

    #[tokio::test]
    async fn engines_sharing_a_database_file_book_once() {
        let path = std::env::temp_dir().join(format!("car-rental-{}.db", uuid::Uuid::new_v4()));
        let first = file_repos(&path).await;
        let second = file_repos(&path).await;
        let car = seed_car(first.as_ref(), 5000).await;
        let ann = seed_user(first.as_ref(), "ann@example.com", PrincipalKind::Customer).await;
        let bob = seed_user(first.as_ref(), "bob@example.com", PrincipalKind::Customer).await;

        let a = ReservationService::new(first, BoundaryPolicy::default());
        let b = ReservationService::new(second, BoundaryPolicy::default());
        let (start, end) = (days_from_now(30), days_from_now(33));

        let (ra, rb) = tokio::join!(
            a.create_reservation(&ann.id, request(&car, start, end)),
            b.create_reservation(&bob.id, request(&car, start, end)),
        );

        let outcomes = [ra, rb];
        assert_eq!(outcomes.iter().filter(|r| r.is_ok()).count(), 1);
        assert!(outcomes
            .iter()
            .any(|r| matches!(r, Err(DomainError::Conflict(_)))));
        assert_eq!(a.admin_list_all().await.unwrap().len(), 1);

        for suffix in ["", "-wal", "-shm"] {
            let _ = std::fs::remove_file(format!("{}{}", path.display(), suffix));
        }
    }

    #[tokio::test]
    async fn booking_total_that_overflows_is_rejected() {
        let f = fixture().await;
        let pricey = seed_car(f.repos.as_ref(), i64::MAX / 2).await;

        let err = f
            .svc
            .create_reservation(
                &f.ann.id,
                request(&pricey, days_from_now(10), days_from_now(12)),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, DomainError::Validation(_)));
        assert!(f.svc.admin_list_all().await.unwrap().is_empty());
    }
}
