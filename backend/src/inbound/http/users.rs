//! Users API handlers.
//!
//! ```text
//! POST /api/v1/login {"name":"admin","password":"password"}
//! GET /api/v1/self
//! PUT /api/v1/self {"id":1,"name":"admin","enabled":true}
//! POST /api/v1/self/password {"oldPassword":"...","newPassword":"..."}
//! GET|POST /api/v1/users
//! GET|PUT|DELETE /api/v1/users/{id}
//! ```

use actix_web::http::header::AUTHORIZATION;
use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};
use zeroize::Zeroizing;

use crate::domain::ports::{CreateUserRequest, PasswordChange, SelfUpdate, UserUpdate};
use crate::domain::{Error, LoginCredentials, LoginValidationError, Page, User, UserId, UserName};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{ErrorSchema, UserPageSchema, UserSchema};
use crate::inbound::http::session::{AuthenticatedUser, RequireSession};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    PageQuery, login_validation_error, user_id_from_path, user_validation_error,
};

/// Login request body for `POST /api/v1/login`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct LoginRequest {
    pub name: String,
    pub password: String,
}

impl TryFrom<LoginRequest> for LoginCredentials {
    type Error = LoginValidationError;

    fn try_from(value: LoginRequest) -> Result<Self, Self::Error> {
        let password = Zeroizing::new(value.password);
        Self::try_from_parts(&value.name, &password)
    }
}

/// Body of `PUT /api/v1/self`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct SelfUpdateRequest {
    pub id: i64,
    pub name: String,
    pub enabled: bool,
}

/// Body of `POST /api/v1/self/password`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PasswordChangeRequest {
    pub old_password: String,
    pub new_password: String,
}

fn default_enabled() -> bool {
    true
}

/// Body of `POST /api/v1/users`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct CreateUserBody {
    pub name: String,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
    pub password: String,
}

/// Body of `PUT /api/v1/users/{id}`.
#[derive(Deserialize, Serialize, utoipa::ToSchema)]
pub struct UserUpdateRequest {
    pub name: String,
    pub enabled: bool,
}

fn user_name(raw: &str) -> Result<UserName, Error> {
    UserName::new(raw).map_err(user_validation_error)
}

/// Exchange credentials for a bearer token.
///
/// The token is returned in the `Authorization` response header.
#[utoipa::path(
    post,
    path = "/api/v1/login",
    request_body = LoginRequest,
    responses(
        (status = 200, description = "Login success", headers(("Authorization" = String, description = "Bearer token"))),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Invalid credentials", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "login",
    security([])
)]
#[post("/login")]
pub async fn login(
    state: web::Data<HttpState>,
    payload: web::Json<LoginRequest>,
) -> ApiResult<HttpResponse> {
    let credentials =
        LoginCredentials::try_from(payload.into_inner()).map_err(login_validation_error)?;
    let token = state.login.login(&credentials).await?;
    Ok(HttpResponse::Ok()
        .insert_header((AUTHORIZATION, format!("Bearer {token}")))
        .finish())
}

/// Profile of the authenticated user.
#[utoipa::path(
    get,
    path = "/api/v1/self",
    responses(
        (status = 200, description = "Current user", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "currentUser"
)]
#[get("/self", wrap = "RequireSession")]
pub async fn current_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
) -> ApiResult<web::Json<User>> {
    let user = state.users.current_user(caller.id()).await?;
    Ok(web::Json(user))
}

/// Rename the authenticated user.
#[utoipa::path(
    put,
    path = "/api/v1/self",
    request_body = SelfUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateSelf"
)]
#[put("/self", wrap = "RequireSession")]
pub async fn update_self(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<SelfUpdateRequest>,
) -> ApiResult<web::Json<User>> {
    let SelfUpdateRequest { id, name, enabled } = payload.into_inner();
    let update = SelfUpdate {
        id: UserId::new(id).map_err(user_validation_error)?,
        name: user_name(&name)?,
        enabled,
    };
    let user = state.users_command.update_self(caller.id(), update).await?;
    Ok(web::Json(user))
}

/// Change the authenticated user's password.
#[utoipa::path(
    post,
    path = "/api/v1/self/password",
    request_body = PasswordChangeRequest,
    responses(
        (status = 204, description = "Password changed"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "changePassword"
)]
#[post("/self/password", wrap = "RequireSession")]
pub async fn change_password(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    payload: web::Json<PasswordChangeRequest>,
) -> ApiResult<HttpResponse> {
    let PasswordChangeRequest {
        old_password,
        new_password,
    } = payload.into_inner();
    let change = PasswordChange {
        old_password: Zeroizing::new(old_password),
        new_password: Zeroizing::new(new_password),
    };
    state
        .users_command
        .change_password(caller.id(), change)
        .await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Create an account.
#[utoipa::path(
    post,
    path = "/api/v1/users",
    request_body = CreateUserBody,
    responses(
        (status = 201, description = "Created user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "createUser"
)]
#[post("/users", wrap = "RequireSession")]
pub async fn create_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    payload: web::Json<CreateUserBody>,
) -> ApiResult<HttpResponse> {
    let CreateUserBody {
        name,
        enabled,
        password,
    } = payload.into_inner();
    let request = CreateUserRequest {
        name: user_name(&name)?,
        enabled,
        password: Zeroizing::new(password),
    };
    let user = state.users_command.create_user(request).await?;
    Ok(HttpResponse::Created().json(user))
}

/// List users.
#[utoipa::path(
    get,
    path = "/api/v1/users",
    params(PageQuery),
    responses(
        (status = 200, description = "Page of users", body = UserPageSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "listUsers"
)]
#[get("/users", wrap = "RequireSession")]
pub async fn list_users(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    query: web::Query<PageQuery>,
) -> ApiResult<web::Json<Page<User>>> {
    let page = state.users.list_users(query.to_request()).await?;
    Ok(web::Json(page))
}

/// Fetch one user.
#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 200, description = "User", body = UserSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "getUser"
)]
#[get("/users/{id}", wrap = "RequireSession")]
pub async fn get_user(
    state: web::Data<HttpState>,
    _caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<web::Json<User>> {
    let id = user_id_from_path(path.into_inner())?;
    let user = state.users.get_user(id).await?;
    Ok(web::Json(user))
}

/// Rename, enable or disable another user.
#[utoipa::path(
    put,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    request_body = UserUpdateRequest,
    responses(
        (status = 200, description = "Updated user", body = UserSchema),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "updateUser"
)]
#[put("/users/{id}", wrap = "RequireSession")]
pub async fn update_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
    payload: web::Json<UserUpdateRequest>,
) -> ApiResult<web::Json<User>> {
    let id = user_id_from_path(path.into_inner())?;
    let UserUpdateRequest { name, enabled } = payload.into_inner();
    let update = UserUpdate {
        name: user_name(&name)?,
        enabled,
    };
    let user = state
        .users_command
        .update_user(caller.id(), id, update)
        .await?;
    Ok(web::Json(user))
}

/// Delete another user.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    params(("id" = i64, Path, description = "User identifier")),
    responses(
        (status = 204, description = "Deleted"),
        (status = 400, description = "Invalid request", body = ErrorSchema),
        (status = 401, description = "Unauthorised", body = ErrorSchema),
        (status = 404, description = "Not found", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["users"],
    operation_id = "deleteUser"
)]
#[delete("/users/{id}", wrap = "RequireSession")]
pub async fn delete_user(
    state: web::Data<HttpState>,
    caller: AuthenticatedUser,
    path: web::Path<i64>,
) -> ApiResult<HttpResponse> {
    let id = user_id_from_path(path.into_inner())?;
    state.users_command.delete_user(caller.id(), id).await?;
    Ok(HttpResponse::NoContent().finish())
}
