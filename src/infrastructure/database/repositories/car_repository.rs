//! SeaORM implementation of CarRepository

use async_trait::async_trait;
use log::debug;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};

use crate::domain::car::{Car, CarFilter, CarRepository};
use crate::domain::{DomainError, DomainResult};
use crate::infrastructure::database::entities::car;
use crate::support::errors::InfraError;

pub struct SeaOrmCarRepository {
    db: DatabaseConnection,
}

impl SeaOrmCarRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

// ── Conversion helpers ──────────────────────────────────────────

fn model_to_domain(m: car::Model) -> DomainResult<Car> {
    let images: Vec<String> = serde_json::from_str(&m.images).map_err(InfraError::from)?;
    Ok(Car {
        id: m.id,
        make: m.make,
        model: m.model,
        year: m.year,
        car_type: m.car_type,
        price_per_day_cents: m.price_per_day_cents,
        description: m.description,
        images,
        created_at: m.created_at,
        updated_at: m.updated_at,
    })
}

fn domain_to_active(c: &Car) -> DomainResult<car::ActiveModel> {
    let images = serde_json::to_string(&c.images).map_err(InfraError::from)?;
    Ok(car::ActiveModel {
        id: Set(c.id.clone()),
        make: Set(c.make.clone()),
        model: Set(c.model.clone()),
        year: Set(c.year),
        car_type: Set(c.car_type.clone()),
        price_per_day_cents: Set(c.price_per_day_cents),
        description: Set(c.description.clone()),
        images: Set(images),
        created_at: Set(c.created_at),
        updated_at: Set(c.updated_at),
    })
}

// ── CarRepository impl ──────────────────────────────────────────

#[async_trait]
impl CarRepository for SeaOrmCarRepository {
    async fn save(&self, c: &Car) -> DomainResult<()> {
        debug!("Saving car: {}", c.id);
        domain_to_active(c)?.insert(&self.db).await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> DomainResult<Option<Car>> {
        car::Entity::find_by_id(id.to_string())
            .one(&self.db)
            .await?
            .map(model_to_domain)
            .transpose()
    }

    async fn find_all(&self, filter: &CarFilter) -> DomainResult<Vec<Car>> {
        let mut query = car::Entity::find();
        if let Some(min) = filter.min_price_cents {
            query = query.filter(car::Column::PricePerDayCents.gte(min));
        }
        if let Some(max) = filter.max_price_cents {
            query = query.filter(car::Column::PricePerDayCents.lte(max));
        }

        let models = query
            .order_by_desc(car::Column::CreatedAt)
            .order_by_desc(car::Column::Id)
            .all(&self.db)
            .await?;

        let mut cars = Vec::with_capacity(models.len());
        for model in models {
            let car = model_to_domain(model)?;
            if filter.matches(&car) {
                cars.push(car);
            }
        }
        Ok(cars)
    }

    async fn update(&self, c: &Car) -> DomainResult<()> {
        debug!("Updating car: {}", c.id);

        let existing = car::Entity::find_by_id(c.id.clone()).one(&self.db).await?;
        if existing.is_none() {
            return Err(DomainError::not_found("Car", c.id.clone()));
        }

        domain_to_active(c)?.update(&self.db).await?;
        Ok(())
    }

    async fn delete(&self, id: &str) -> DomainResult<()> {
        let result = car::Entity::delete_by_id(id.to_string())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(DomainError::not_found("Car", id));
        }
        Ok(())
    }
}
