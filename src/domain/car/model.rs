//! Car domain entity (fleet catalog)

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

use crate::domain::{DomainError, DomainResult};

/// A car in the rental fleet
#[derive(Debug, Clone, PartialEq)]
pub struct Car {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    /// Body type, e.g. "SUV" or "Sedan"
    pub car_type: Option<String>,
    /// Daily price in cents
    pub price_per_day_cents: i64,
    pub description: Option<String>,
    /// Image URLs
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Car {
    pub fn price_per_day(&self) -> Decimal {
        Decimal::new(self.price_per_day_cents, 2)
    }

    pub fn summary(&self) -> CarSummary {
        CarSummary {
            id: self.id.clone(),
            make: self.make.clone(),
            model: self.model.clone(),
            year: self.year,
            car_type: self.car_type.clone(),
            price_per_day_cents: self.price_per_day_cents,
            images: self.images.clone(),
        }
    }
}

/// The part of a car embedded in reservation views
#[derive(Debug, Clone, PartialEq)]
pub struct CarSummary {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    pub car_type: Option<String>,
    pub price_per_day_cents: i64,
    pub images: Vec<String>,
}

impl CarSummary {
    pub fn price_per_day(&self) -> Decimal {
        Decimal::new(self.price_per_day_cents, 2)
    }
}

/// Highest accepted daily price: 1,000,000.00
pub const MAX_PRICE_PER_DAY_CENTS: i64 = 100_000_000;

/// Converts a daily price to cents, rounding half away from zero at the
/// second decimal. The rounded amount must be at least one cent and at
/// most [`MAX_PRICE_PER_DAY_CENTS`].
pub fn to_cents(amount: Decimal) -> DomainResult<i64> {
    let cents = (amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
        * Decimal::ONE_HUNDRED)
        .to_i64()
        .filter(|c| *c <= MAX_PRICE_PER_DAY_CENTS)
        .ok_or_else(|| DomainError::Validation(format!("price_per_day out of range: {}", amount)))?;
    if cents <= 0 {
        return Err(DomainError::Validation(
            "price_per_day must be greater than zero".to_string(),
        ));
    }
    Ok(cents)
}

/// Catalog listing filter; price bounds are inclusive.
#[derive(Debug, Clone, Default)]
pub struct CarFilter {
    pub min_price_cents: Option<i64>,
    pub max_price_cents: Option<i64>,
    pub car_type: Option<String>,
}

impl CarFilter {
    pub fn matches(&self, car: &Car) -> bool {
        if let Some(min) = self.min_price_cents {
            if car.price_per_day_cents < min {
                return false;
            }
        }
        if let Some(max) = self.max_price_cents {
            if car.price_per_day_cents > max {
                return false;
            }
        }
        match (&self.car_type, &car.car_type) {
            (Some(wanted), Some(actual)) => wanted.trim().eq_ignore_ascii_case(actual.trim()),
            (Some(wanted), None) => wanted.trim().is_empty(),
            (None, _) => true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn car(price_cents: i64, car_type: Option<&str>) -> Car {
        Car {
            id: "car-1".into(),
            make: "Toyota".into(),
            model: "Corolla".into(),
            year: 2022,
            car_type: car_type.map(String::from),
            price_per_day_cents: price_cents,
            description: None,
            images: vec!["https://img.example/1.jpg".into()],
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn to_cents_rounds_and_rejects_non_positive() {
        assert_eq!(to_cents(Decimal::new(50, 0)).unwrap(), 5000);
        assert_eq!(to_cents(Decimal::new(49999, 3)).unwrap(), 5000);
        assert!(matches!(to_cents(Decimal::ZERO), Err(DomainError::Validation(_))));
        assert!(matches!(to_cents(Decimal::new(-1, 0)), Err(DomainError::Validation(_))));
    }

    #[test]
    fn to_cents_rejects_prices_that_round_to_nothing() {
        assert!(matches!(to_cents(Decimal::new(4, 3)), Err(DomainError::Validation(_))));
        assert_eq!(to_cents(Decimal::new(5, 3)).unwrap(), 1);
    }

    #[test]
    fn to_cents_caps_the_daily_price() {
        assert_eq!(
            to_cents(Decimal::new(MAX_PRICE_PER_DAY_CENTS, 2)).unwrap(),
            MAX_PRICE_PER_DAY_CENTS
        );
        assert!(matches!(
            to_cents(Decimal::new(MAX_PRICE_PER_DAY_CENTS + 1, 2)),
            Err(DomainError::Validation(_))
        ));
        assert!(matches!(
            to_cents(Decimal::new(40_000_000_000_000_000, 0)),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn filter_price_bounds_are_inclusive() {
        let filter = CarFilter {
            min_price_cents: Some(5000),
            max_price_cents: Some(8000),
            car_type: None,
        };
        assert!(filter.matches(&car(5000, None)));
        assert!(filter.matches(&car(8000, None)));
        assert!(!filter.matches(&car(4999, None)));
        assert!(!filter.matches(&car(8001, None)));
    }

    #[test]
    fn filter_type_is_case_insensitive() {
        let filter = CarFilter {
            car_type: Some("suv".into()),
            ..Default::default()
        };
        assert!(filter.matches(&car(5000, Some("SUV"))));
        assert!(!filter.matches(&car(5000, Some("Sedan"))));
        assert!(!filter.matches(&car(5000, None)));
    }

    #[test]
    fn summary_keeps_price_and_images() {
        let c = car(4250, Some("Sedan"));
        let s = c.summary();
        assert_eq!(s.price_per_day().to_string(), "42.50");
        assert_eq!(s.images, c.images);
    }
}
