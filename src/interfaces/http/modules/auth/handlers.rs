//! Authentication and profile handlers

use axum::{extract::State, http::StatusCode, Extension, Json};

use super::dto::{
    AdminRegisterRequest, AuthResponse, LoginRequest, RegisterRequest, UpdateProfileRequest,
    UserInfo,
};
use crate::application::NewCustomer;
use crate::domain::{Principal, PrincipalKind};
use crate::interfaces::http::common::{ok, ApiError, ApiResponse, ApiResult, ValidatedJson};
use crate::interfaces::http::router::AppState;

#[utoipa::path(
    post,
    path = "/api/v1/auth/register",
    tag = "Authentication",
    request_body = RegisterRequest,
    responses(
        (status = 201, description = "Customer registered", body = ApiResponse<AuthResponse>),
        (status = 409, description = "Email already registered"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<RegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<AuthResponse>>), ApiError> {
    let session = state
        .identity
        .register_customer(NewCustomer {
            email: request.email,
            password: request.password,
            name: request.name,
            phone: request.phone,
        })
        .await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(session.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/auth/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let session = state
        .identity
        .login(PrincipalKind::Customer, &request.email, &request.password)
        .await?;
    ok(session.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/login",
    tag = "Authentication",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Successful login", body = ApiResponse<AuthResponse>),
        (status = 401, description = "Invalid credentials")
    )
)]
pub async fn admin_login(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let session = state
        .identity
        .login(PrincipalKind::Admin, &request.email, &request.password)
        .await?;
    ok(session.into())
}

#[utoipa::path(
    post,
    path = "/api/v1/admin/register",
    tag = "Authentication",
    security(("bearer_auth" = [])),
    request_body = AdminRegisterRequest,
    responses(
        (status = 201, description = "Administrator created", body = ApiResponse<UserInfo>),
        (status = 403, description = "Administrators only"),
        (status = 409, description = "Email already registered")
    )
)]
pub async fn admin_register(
    State(state): State<AppState>,
    ValidatedJson(request): ValidatedJson<AdminRegisterRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let user = state
        .identity
        .register_admin(&request.email, &request.password, &request.name)
        .await?;
    Ok((StatusCode::CREATED, Json(ApiResponse::success(user.into()))))
}

#[utoipa::path(
    get,
    path = "/api/v1/user/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Current customer", body = ApiResponse<UserInfo>),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn get_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> ApiResult<UserInfo> {
    let user = state.identity.profile(&principal.user_id).await?;
    ok(user.into())
}

#[utoipa::path(
    put,
    path = "/api/v1/user/profile",
    tag = "Profile",
    security(("bearer_auth" = [])),
    request_body = UpdateProfileRequest,
    responses(
        (status = 200, description = "Profile updated", body = ApiResponse<UserInfo>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn update_profile(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    ValidatedJson(request): ValidatedJson<UpdateProfileRequest>,
) -> ApiResult<UserInfo> {
    let user = state
        .identity
        .update_profile(&principal.user_id, request.name, request.phone)
        .await?;
    ok(user.into())
}
