//! Fleet catalog handlers

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{CarDto, CreateCarRequest, ListCarsParams, UpdateCarRequest};
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    get,
    path = "/api/v1/cars",
    tag = "Cars",
    params(ListCarsParams),
    responses(
        (status = 200, description = "Cars, newest first", body = ApiResponse<Vec<CarDto>>),
        (status = 400, description = "Invalid filter")
    )
)]
pub async fn list_cars(
    State(state): State<AppState>,
    Query(params): Query<ListCarsParams>,
) -> ApiResult<Vec<CarDto>> {
    let filter = params.to_filter()?;
    let cars = state.fleet.list_cars(&filter).await?;
    ok(cars.into_iter().map(CarDto::from).collect())
}

#[utoipa::path(
    get,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car details", body = ApiResponse<CarDto>),
        (status = 404, description = "Car not found")
    )
)]
pub async fn get_car(State(state): State<AppState>, Path(id): Path<String>) -> ApiResult<CarDto> {
    ok(state.fleet.get_car(&id).await?.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/cars",
    tag = "Cars",
    security(("bearer_auth" = [])),
    request_body = CreateCarRequest,
    responses(
        (status = 201, description = "Car added", body = ApiResponse<CarDto>),
        (status = 400, description = "Invalid price"),
        (status = 403, description = "Administrators only")
    )
)]
pub async fn create_car(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<CreateCarRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CarDto>>), ApiError> {
    let car = state.fleet.create_car(request.into()).await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(car.into()))))
}

#[utoipa::path(
    put,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    request_body = UpdateCarRequest,
    responses(
        (status = 200, description = "Car updated", body = ApiResponse<CarDto>),
        (status = 404, description = "Car not found")
    )
)]
pub async fn update_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
    ValidatedJson(request): ValidatedJson<UpdateCarRequest>,
) -> ApiResult<CarDto> {
    ok(state.fleet.update_car(&id, request.into()).await?.into())
}

#[utoipa::path(
    delete,
    path = "/api/v1/cars/{id}",
    tag = "Cars",
    security(("bearer_auth" = [])),
    params(("id" = String, Path, description = "Car ID")),
    responses(
        (status = 200, description = "Car deleted"),
        (status = 404, description = "Car not found"),
        (status = 409, description = "Car has reservations")
    )
)]
pub async fn delete_car(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<String> {
    state.fleet.delete_car(&id).await?;
    ok(id)
}
