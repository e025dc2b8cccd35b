//! Fleet catalog DTOs

use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use crate::application::{CarChanges, NewCar};
use crate::domain::{Car, CarFilter, CarSummary, DomainError, DomainResult};

#[derive(Debug, Serialize, ToSchema)]
pub struct CarDto {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[schema(value_type = f64, example = 49.99)]
    pub price_per_day: Decimal,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub images: Vec<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Car> for CarDto {
    fn from(c: Car) -> Self {
        Self {
            price_per_day: c.price_per_day(),
            id: c.id,
            make: c.make,
            model: c.model,
            year: c.year,
            car_type: c.car_type,
            description: c.description,
            images: c.images,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Car as embedded in booking views
#[derive(Debug, Serialize, ToSchema)]
pub struct CarSummaryDto {
    pub id: String,
    pub make: String,
    pub model: String,
    pub year: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub car_type: Option<String>,
    #[schema(value_type = f64)]
    pub price_per_day: Decimal,
    pub images: Vec<String>,
}

impl From<CarSummary> for CarSummaryDto {
    fn from(c: CarSummary) -> Self {
        Self {
            price_per_day: c.price_per_day(),
            id: c.id,
            make: c.make,
            model: c.model,
            year: c.year,
            car_type: c.car_type,
            images: c.images,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateCarRequest {
    #[validate(length(min = 1, max = 50, message = "make is required"))]
    pub make: String,
    #[validate(length(min = 1, max = 50, message = "model is required"))]
    pub model: String,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: i32,
    pub car_type: Option<String>,
    #[schema(value_type = f64, example = 49.99)]
    pub price_per_day: Decimal,
    pub description: Option<String>,
    #[serde(default)]
    #[validate(custom(function = "validate_image_urls"))]
    pub images: Vec<String>,
}

impl From<CreateCarRequest> for NewCar {
    fn from(r: CreateCarRequest) -> Self {
        Self {
            make: r.make,
            model: r.model,
            year: r.year,
            car_type: r.car_type,
            price_per_day: r.price_per_day,
            description: r.description,
            images: r.images,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateCarRequest {
    #[validate(length(min = 1, max = 50, message = "make cannot be empty"))]
    pub make: Option<String>,
    #[validate(length(min = 1, max = 50, message = "model cannot be empty"))]
    pub model: Option<String>,
    #[validate(range(min = 1900, max = 2100, message = "year is out of range"))]
    pub year: Option<i32>,
    pub car_type: Option<String>,
    #[schema(value_type = Option<f64>)]
    pub price_per_day: Option<Decimal>,
    pub description: Option<String>,
    #[validate(custom(function = "validate_image_urls"))]
    pub images: Option<Vec<String>>,
}

impl From<UpdateCarRequest> for CarChanges {
    fn from(r: UpdateCarRequest) -> Self {
        Self {
            make: r.make,
            model: r.model,
            year: r.year,
            car_type: r.car_type,
            price_per_day: r.price_per_day,
            description: r.description,
            images: r.images,
        }
    }
}

fn validate_image_urls(images: &[String]) -> Result<(), validator::ValidationError> {
    let all_urls = images
        .iter()
        .all(|url| url.starts_with("http://") || url.starts_with("https://"));
    if all_urls {
        Ok(())
    } else {
        let mut err = validator::ValidationError::new("url");
        err.message = Some("images must be http(s) URLs".into());
        Err(err)
    }
}

/// Catalog filters. Prices are decimal amounts, bounds inclusive.
#[derive(Debug, Default, Deserialize, IntoParams)]
pub struct ListCarsParams {
    /// Lowest daily price, e.g. `30` or `29.99`
    pub min_price: Option<String>,
    /// Highest daily price
    pub max_price: Option<String>,
    /// Body type, matched case-insensitively
    pub car_type: Option<String>,
}

impl ListCarsParams {
    pub fn to_filter(&self) -> DomainResult<CarFilter> {
        Ok(CarFilter {
            min_price_cents: price_bound("min_price", self.min_price.as_deref())?,
            max_price_cents: price_bound("max_price", self.max_price.as_deref())?,
            car_type: self
                .car_type
                .as_deref()
                .map(str::trim)
                .filter(|t| !t.is_empty())
                .map(String::from),
        })
    }
}

fn price_bound(field: &str, raw: Option<&str>) -> DomainResult<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let invalid = || DomainError::Validation(format!("{} must be a non-negative amount", field));
    let amount = Decimal::from_str(raw).map_err(|_| invalid())?;
    if amount.is_sign_negative() {
        return Err(invalid());
    }
    (amount * Decimal::ONE_HUNDRED)
        .round()
        .to_i64()
        .map(Some)
        .ok_or_else(invalid)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn price_bounds_become_cents() {
        let params = ListCarsParams {
            min_price: Some("30".into()),
            max_price: Some("49.99".into()),
            car_type: Some("  ".into()),
        };
        let filter = params.to_filter().unwrap();
        assert_eq!(filter.min_price_cents, Some(3000));
        assert_eq!(filter.max_price_cents, Some(4999));
        assert_eq!(filter.car_type, None);
    }

    #[test]
    fn bad_price_bounds_are_validation_errors() {
        for raw in ["-1", "cheap"] {
            let params = ListCarsParams {
                min_price: Some(raw.into()),
                ..ListCarsParams::default()
            };
            assert!(matches!(params.to_filter(), Err(DomainError::Validation(_))));
        }
    }

    #[test]
    fn image_urls_must_be_http() {
        assert!(validate_image_urls(&["https://img.example/a.jpg".to_string()]).is_ok());
        assert!(validate_image_urls(&["ftp://img.example/a.jpg".to_string()]).is_err());
    }
}
