//! Reservation DTOs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use crate::application::NewReservation;
use crate::domain::{CustomerSummary, ReservationDetails};
use crate::interfaces::http::modules::cars::CarSummaryDto;

/// Booking request. Dates are `YYYY-MM-DD` (an RFC 3339 timestamp is cut to
/// its date). Missing fields are reported by the booking engine.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateReservationRequest {
    #[serde(default, alias = "carId")]
    pub car_id: String,
    #[serde(default, alias = "startDate")]
    #[schema(example = "2025-06-01")]
    pub start_date: String,
    #[serde(default, alias = "endDate")]
    #[schema(example = "2025-06-03")]
    pub end_date: String,
}

impl From<CreateReservationRequest> for NewReservation {
    fn from(r: CreateReservationRequest) -> Self {
        Self {
            car_id: r.car_id,
            start_date: r.start_date,
            end_date: r.end_date,
        }
    }
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateStatusRequest {
    /// PENDING, ACTIVE, APPROVED, REJECTED, COMPLETED or CANCELLED
    #[serde(default)]
    #[schema(example = "APPROVED")]
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerDto {
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

impl From<CustomerSummary> for CustomerDto {
    fn from(c: CustomerSummary) -> Self {
        Self {
            id: c.id,
            name: c.name,
            email: c.email,
            phone: c.phone,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ReservationDto {
    pub id: String,
    pub customer_id: String,
    pub car_id: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[schema(value_type = f64, example = 150.0)]
    pub total_cost: Decimal,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub car: CarSummaryDto,
    /// Only in administrative views
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer: Option<CustomerDto>,
}

impl From<ReservationDetails> for ReservationDto {
    fn from(d: ReservationDetails) -> Self {
        let r = d.reservation;
        Self {
            total_cost: r.total_cost(),
            status: r.status.as_str().to_string(),
            id: r.id,
            customer_id: r.customer_id,
            car_id: r.car_id,
            start_date: r.start_date,
            end_date: r.end_date,
            created_at: r.created_at,
            updated_at: r.updated_at,
            car: d.car.into(),
            customer: d.customer.map(CustomerDto::from),
        }
    }
}
