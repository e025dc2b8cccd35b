//! SeaORM implementation of ReservationRepository

use async_trait::async_trait;
use log::{debug, warn};
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};

use crate::domain::reservation::{
    find_conflict, BoundaryPolicy, DateRange, Reservation, ReservationRepository,
    ReservationStatus,
};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::{car, reservation};

pub struct SeaOrmReservationRepository {
    db: DatabaseConnection,
}

impl SeaOrmReservationRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn status_to_domain(s: reservation::ReservationStatus) -> ReservationStatus {
    match s {
        reservation::ReservationStatus::Pending => ReservationStatus::Pending,
        reservation::ReservationStatus::Active => ReservationStatus::Active,
        reservation::ReservationStatus::Approved => ReservationStatus::Approved,
        reservation::ReservationStatus::Rejected => ReservationStatus::Rejected,
        reservation::ReservationStatus::Completed => ReservationStatus::Completed,
        reservation::ReservationStatus::Cancelled => ReservationStatus::Cancelled,
    }
}

fn status_to_entity(s: ReservationStatus) -> reservation::ReservationStatus {
    match s {
        ReservationStatus::Pending => reservation::ReservationStatus::Pending,
        ReservationStatus::Active => reservation::ReservationStatus::Active,
        ReservationStatus::Approved => reservation::ReservationStatus::Approved,
        ReservationStatus::Rejected => reservation::ReservationStatus::Rejected,
        ReservationStatus::Completed => reservation::ReservationStatus::Completed,
        ReservationStatus::Cancelled => reservation::ReservationStatus::Cancelled,
    }
}

fn model_to_domain(m: reservation::Model) -> Reservation {
    Reservation {
        id: m.id,
        customer_id: m.customer_id,
        car_id: m.car_id,
        start_date: m.start_date,
        end_date: m.end_date,
        total_cost_cents: m.total_cost_cents,
        status: status_to_domain(m.status),
        created_at: m.created_at,
        updated_at: m.updated_at,
    }
}

fn conflict_error(conflicting: &Reservation) -> DomainError {
    debug!(
        "Reservation {} already holds car {} for {}..{}",
        conflicting.id, conflicting.car_id, conflicting.start_date, conflicting.end_date
    );
    DomainError::Conflict("Car is not available for selected dates".to_string())
}

/// Failure inside a write transaction. `Db` failures (busy, serialization)
/// are re-checked against committed data before being reported.
enum WriteError {
    Domain(DomainError),
    Db(DbErr),
}

impl From<DbErr> for WriteError {
    fn from(e: DbErr) -> Self {
        WriteError::Db(e)
    }
}

impl From<DomainError> for WriteError {
    fn from(e: DomainError) -> Self {
        WriteError::Domain(e)
    }
}

/// Takes the car's row lock as the transaction's first statement. On SQLite
/// this makes the transaction the database writer before it reads, on
/// Postgres it locks the car row, so writers for one car queue up across
/// processes. Returns `false` when the car does not exist.
async fn lock_car<C: ConnectionTrait>(conn: &C, car_id: &str) -> Result<bool, DbErr> {
    let touched = car::Entity::update_many()
        .col_expr(car::Column::UpdatedAt, Expr::col(car::Column::UpdatedAt).into())
        .filter(car::Column::Id.eq(car_id))
        .exec(conn)
        .await?;
    Ok(touched.rows_affected > 0)
}

/// Blocking reservations of `car_id` that could overlap `period` under
/// either boundary policy. The exact rule is applied by `find_conflict`.
async fn blocking_candidates<C: ConnectionTrait>(
    conn: &C,
    car_id: &str,
    period: &DateRange,
) -> Result<Vec<Reservation>, DbErr> {
    let blocking = ReservationStatus::BLOCKING.map(status_to_entity);
    let models = reservation::Entity::find()
        .filter(reservation::Column::CarId.eq(car_id))
        .filter(reservation::Column::Status.is_in(blocking))
        .filter(reservation::Column::StartDate.lte(period.end()))
        .filter(reservation::Column::EndDate.gte(period.start()))
        .all(conn)
        .await?;
    Ok(models.into_iter().map(model_to_domain).collect())
}

impl SeaOrmReservationRepository {
    async fn insert_in_txn(
        &self,
        r: &Reservation,
        policy: BoundaryPolicy,
    ) -> Result<(), WriteError> {
        let txn = self.db.begin().await?;

        if !lock_car(&txn, &r.car_id).await? {
            txn.rollback().await?;
            return Err(DomainError::not_found("Car", r.car_id.clone()).into());
        }

        let existing = blocking_candidates(&txn, &r.car_id, &r.period()).await?;
        if let Some(conflicting) = find_conflict(r, &existing, policy) {
            let err = conflict_error(conflicting);
            txn.rollback().await?;
            return Err(err.into());
        }

        let model = reservation::ActiveModel {
            id: Set(r.id.clone()),
            customer_id: Set(r.customer_id.clone()),
            car_id: Set(r.car_id.clone()),
            start_date: Set(r.start_date),
            end_date: Set(r.end_date),
            total_cost_cents: Set(r.total_cost_cents),
            status: Set(status_to_entity(r.status)),
            created_at: Set(r.created_at),
            updated_at: Set(r.updated_at),
        };
        model.insert(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    async fn update_status_in_txn(
        &self,
        r: &Reservation,
        conflict_policy: Option<BoundaryPolicy>,
    ) -> Result<(), WriteError> {
        let txn = self.db.begin().await?;

        let policy = conflict_policy.filter(|_| r.status.is_blocking());
        if policy.is_some() {
            lock_car(&txn, &r.car_id).await?;
        }

        let Some(existing) = reservation::Entity::find_by_id(r.id.clone())
            .one(&txn)
            .await?
        else {
            txn.rollback().await?;
            return Err(DomainError::not_found("Reservation", r.id.clone()).into());
        };

        if let Some(policy) = policy {
            let others = blocking_candidates(&txn, &r.car_id, &r.period()).await?;
            if let Some(conflicting) = find_conflict(r, &others, policy) {
                let err = conflict_error(conflicting);
                txn.rollback().await?;
                return Err(err.into());
            }
        }

        let mut active: reservation::ActiveModel = existing.into();
        active.status = Set(status_to_entity(r.status));
        active.updated_at = Set(r.updated_at);
        active.update(&txn).await?;

        txn.commit().await?;
        Ok(())
    }

    /// Maps a failed write to `Conflict` when a committed reservation now
    /// blocks `r`, otherwise to the storage error.
    async fn resolve(
        &self,
        r: &Reservation,
        policy: Option<BoundaryPolicy>,
        err: WriteError,
    ) -> DomainError {
        let err = match err {
            WriteError::Domain(e) => return e,
            WriteError::Db(e) => e,
        };
        warn!("Write for reservation {} failed: {}", r.id, err);
        if let Some(policy) = policy {
            if let Ok(existing) = blocking_candidates(&self.db, &r.car_id, &r.period()).await {
                if let Some(conflicting) = find_conflict(r, &existing, policy) {
                    return conflict_error(conflicting);
                }
            }
        }
        err.into()
    }
}

// ── ReservationRepository impl ──────────────────────────────────

#[async_trait]
impl ReservationRepository for SeaOrmReservationRepository {
    async fn insert_if_available(
        &self,
        r: &Reservation,
        policy: BoundaryPolicy,
    ) -> DomainResult<()> {
        debug!("Inserting reservation {} for car {}", r.id, r.car_id);
        match self.insert_in_txn(r, policy).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.resolve(r, Some(policy), e).await),
        }
    }

    async fn update_status(
        &self,
        r: &Reservation,
        conflict_policy: Option<BoundaryPolicy>,
    ) -> DomainResult<()> {
        debug!("Updating reservation {} to {}", r.id, r.status);
        let policy = conflict_policy.filter(|_| r.status.is_blocking());
        match self.update_status_in_txn(r, conflict_policy).await {
            Ok(()) => Ok(()),
            Err(e) => Err(self.resolve(r, policy, e).await),
        }
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Reservation>> {
        let model = reservation::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?;
        Ok(model.map(model_to_domain))
    }

    async fn find_by_customer(&self, customer_id: &str) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .filter(reservation::Column::CustomerId.eq(customer_id))
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn find_all(&self) -> DomainResult<Vec<Reservation>> {
        let models = reservation::Entity::find()
            .order_by_desc(reservation::Column::CreatedAt)
            .order_by_desc(reservation::Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(model_to_domain).collect())
    }

    async fn count_for_car(&self, car_id: &str) -> DomainResult<u64> {
        let count = reservation::Entity::find()
            .filter(reservation::Column::CarId.eq(car_id))
            .count(&self.db)
            .await?;
        Ok(count)
    }
}

// ── Tests ──────────────────────────────────────────────────────
