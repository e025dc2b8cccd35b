//! Reservation handlers
//!
//! `/api/v1/user/bookings/*` act for the authenticated customer,
//! `/api/v1/bookings/*` are the administrative views.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Extension, Json,
};

use super::dto::{CreateReservationRequest, ReservationDto, UpdateStatusRequest};
use crate::domain::{Principal, ReservationDetails};
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::AppState;

fn dtos(details: Vec<ReservationDetails>) -> Vec<ReservationDto> {
    details.into_iter().map(ReservationDto::from).collect()
}

#[utoipa::path(
    post,
    path = "/api/v1/user/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Car booked", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Missing or invalid dates"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car is not available for selected dates")
    )
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<CreateReservationRequest>,
) -> Result<(StatusCode, Json<ApiResponse<ReservationDto>>), ApiError> {
    let details = state
        .reservations
        .create_reservation(&principal.user_id, request.into())
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(details.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/bookings",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Own bookings, newest first", body = ApiResponse<Vec<ReservationDto>>)
    )
)]
pub async fn list_my_reservations(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<Vec<ReservationDto>> {
    let details = state
        .reservations
        .list_reservations_for_customer(&principal.user_id)
        .await?;
    ok(dtos(details))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/bookings/{id}",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Booking belongs to another customer"),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_my_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let details = state
        .reservations
        .get_reservation_detail(&principal.user_id, &id)
        .await?;
    ok(details.into())
}

#[utoipa::path(
    patch,
    path = "/api/v1/user/bookings/{id}/cancel",
    tag = "Bookings",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Booking cancelled", body = ApiResponse<ReservationDto>),
        (status = 403, description = "Booking belongs to another customer"),
        (status = 422, description = "Already started or already cancelled")
    )
)]
pub async fn cancel_my_reservation(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    let details = state
        .reservations
        .cancel_reservation(&principal.user_id, &id)
        .await?;
    ok(details.into())
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings",
    tag = "Booking Administration",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All bookings, newest first", body = ApiResponse<Vec<ReservationDto>>),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn list_all_reservations(State(state): State<AppState>) -> ApiResult<Vec<ReservationDto>> {
    ok(dtos(state.reservations.admin_list_all().await?))
}

#[utoipa::path(
    get,
    path = "/api/v1/bookings/{id}",
    tag = "Booking Administration",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    responses(
        (status = 200, description = "Booking details", body = ApiResponse<ReservationDto>),
        (status = 404, description = "Booking not found")
    )
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<ReservationDto> {
    ok(state.reservations.admin_get(&id).await?.into())
}

#[utoipa::path(
    patch,
    path = "/api/v1/bookings/{id}/status",
    tag = "Booking Administration",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Reservation ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<ReservationDto>),
        (status = 400, description = "Invalid status"),
        (status = 409, description = "Dates taken by another booking"),
        (status = 422, description = "Transition not allowed")
    )
)]
pub async fn update_reservation_status(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateStatusRequest>,
) -> ApiResult<ReservationDto> {
    let details = state
        .reservations
        .admin_change_status(&id, &request.status)
        .await?;
    ok(details.into())
}
