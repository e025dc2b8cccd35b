//! Fleet catalog management

use std::sync::Arc;

use chrono::Utc;
use rust_decimal::Decimal;
use tracing::info;

use crate::domain::{to_cents, Car, CarFilter, DomainError, DomainResult, RepositoryProvider};

/// Input for adding a car to the catalog
#[derive(Debug, Clone)]
pub struct NewCar {
    pub make: String,
    pub model: String,
    pub year: i32,
    pub car_type: Option<String>,
    pub price_per_day: Decimal,
    pub description: Option<String>,
    pub images: Vec<String>,
}

/// Partial update; `None` keeps the stored value
#[derive(Debug, Clone, Default)]
pub struct CarChanges {
    pub make: Option<String>,
    pub model: Option<String>,
    pub year: Option<i32>,
    pub car_type: Option<String>,
    pub price_per_day: Option<Decimal>,
    pub description: Option<String>,
    pub images: Option<Vec<String>>,
}

pub struct FleetService {
    repos: Arc<dyn RepositoryProvider>,
}

impl FleetService {
    pub fn new(repos: Arc<dyn RepositoryProvider>) -> Self {
        Self { repos }
    }

    pub async fn create_car(&self, input: NewCar) -> DomainResult<Car> {
        let now = Utc::now();
        let car = Car {
            id: uuid::Uuid::new_v4().to_string(),
            make: required("make", &input.make)?,
            model: required("model", &input.model)?,
            year: input.year,
            car_type: optional(input.car_type),
            price_per_day_cents: to_cents(input.price_per_day)?,
            description: optional(input.description),
            images: input.images,
            created_at: now,
            updated_at: now,
        };

        self.repos.cars().save(&car).await?;
        info!("Car added: {} {} {} ({})", car.year, car.make, car.model, car.id);
        Ok(car)
    }

    pub async fn update_car(&self, id: &str, changes: CarChanges) -> DomainResult<Car> {
        let mut car = self.get_car(id).await?;

        if let Some(make) = changes.make {
            car.make = required("make", &make)?;
        }
        if let Some(model) = changes.model {
            car.model = required("model", &model)?;
        }
        if let Some(year) = changes.year {
            car.year = year;
        }
        if changes.car_type.is_some() {
            car.car_type = optional(changes.car_type);
        }
        if let Some(price) = changes.price_per_day {
            car.price_per_day_cents = to_cents(price)?;
        }
        if changes.description.is_some() {
            car.description = optional(changes.description);
        }
        if let Some(images) = changes.images {
            car.images = images;
        }
        car.updated_at = Utc::now();

        self.repos.cars().update(&car).await?;
        info!("Car updated: {}", car.id);
        Ok(car)
    }

    /// Cars with reservation history stay in the catalog so that past
    /// bookings keep resolving their car.
    pub async fn delete_car(&self, id: &str) -> DomainResult<()> {
        self.get_car(id).await?;
        if self.repos.reservations().count_for_car(id).await? > 0 {
            return Err(DomainError::Conflict(
                "Car has reservations and cannot be deleted".to_string(),
            ));
        }
        self.repos.cars().delete(id).await?;
        info!("Car deleted: {}", id);
        Ok(())
    }

    pub async fn list_cars(&self, filter: &CarFilter) -> DomainResult<Vec<Car>> {
        if let (Some(min), Some(max)) = (filter.min_price_cents, filter.max_price_cents) {
            if min > max {
                return Err(DomainError::Validation(
                    "min_price cannot exceed max_price".to_string(),
                ));
            }
        }
        self.repos.cars().find_all(filter).await
    }

    pub async fn get_car(&self, id: &str) -> DomainResult<Car> {
        self.repos
            .cars()
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Car", id))
    }
}

fn required(field: &str, value: &str) -> DomainResult<String> {
    let value = value.trim();
    if value.is_empty() {
        return Err(DomainError::Validation(format!("{} is required", field)));
    }
    Ok(value.to_string())
}

fn optional(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::domain::{BoundaryPolicy, DateRange, PrincipalKind, Reservation};
    use crate::infrastructure::database::testing::{memory_repos, seed_user};

    fn suv(price: Decimal) -> NewCar {
        NewCar {
            make: "Honda".into(),
            model: "CR-V".into(),
            year: 2023,
            car_type: Some("SUV".into()),
            price_per_day: price,
            description: None,
            images: vec!["https://img.example/crv.jpg".into()],
        }
    }

    #[tokio::test]
    async fn create_and_filter_by_price_and_type() {
        let repos = memory_repos().await;
        let fleet = FleetService::new(repos);
        fleet.create_car(suv(Decimal::new(6000, 2))).await.unwrap();
        let cheap = fleet
            .create_car(NewCar {
                car_type: Some("Sedan".into()),
                ..suv(Decimal::new(3500, 2))
            })
            .await
            .unwrap();

        let all = fleet.list_cars(&CarFilter::default()).await.unwrap();
        assert_eq!(all.len(), 2);

        let filter = CarFilter {
            max_price_cents: Some(4000),
            ..CarFilter::default()
        };
        let found = fleet.list_cars(&filter).await.unwrap();
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].id, cheap.id);

        let filter = CarFilter {
            car_type: Some("suv".into()),
            ..CarFilter::default()
        };
        assert_eq!(fleet.list_cars(&filter).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn non_positive_price_is_rejected() {
        let fleet = FleetService::new(memory_repos().await);
        assert!(matches!(
            fleet.create_car(suv(Decimal::ZERO)).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn update_keeps_omitted_fields() {
        let fleet = FleetService::new(memory_repos().await);
        let car = fleet.create_car(suv(Decimal::new(6000, 2))).await.unwrap();

        let updated = fleet
            .update_car(
                &car.id,
                CarChanges {
                    price_per_day: Some(Decimal::new(7250, 2)),
                    ..CarChanges::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.price_per_day_cents, 7250);
        assert_eq!(updated.make, "Honda");
        assert_eq!(fleet.get_car(&car.id).await.unwrap().price_per_day_cents, 7250);
    }

    #[tokio::test]
    async fn create_rejects_prices_outside_the_billable_range() {
        let fleet = FleetService::new(memory_repos().await);
        for price in [Decimal::new(4, 3), Decimal::new(40_000_000_000_000_000, 0)] {
            assert!(matches!(
                fleet.create_car(suv(price)).await,
                Err(DomainError::Validation(_))
            ));
        }
        assert!(fleet.list_cars(&CarFilter::default()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn delete_refuses_cars_with_reservations() {
        let repos = memory_repos().await;
        let fleet = FleetService::new(repos.clone());
        let car = fleet.create_car(suv(Decimal::new(6000, 2))).await.unwrap();
        let spare = fleet.create_car(suv(Decimal::new(6000, 2))).await.unwrap();
        let customer = seed_user(repos.as_ref(), "c@example.com", PrincipalKind::Customer).await;

        let period = DateRange::new(
            NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2030, 1, 3).unwrap(),
        )
        .unwrap();
        let booking = Reservation::new(&customer.id, &car.id, period, car.price_per_day_cents).unwrap();
        repos
            .reservations()
            .insert_if_available(&booking, BoundaryPolicy::default())
            .await
            .unwrap();

        assert!(matches!(
            fleet.delete_car(&car.id).await,
            Err(DomainError::Conflict(_))
        ));
        fleet.delete_car(&spare.id).await.unwrap();
        assert!(matches!(
            fleet.get_car(&spare.id).await,
            Err(DomainError::NotFound { .. })
        ));
    }
}
