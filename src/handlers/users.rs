// src/handlers/users.rs
// Gestão de contas: todas as rotas exigem superadmin

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{i18n::Locale, rbac::RequireSuperadmin},
    models::{
        auth::User,
        response::ActionResponse,
        user::{CreateUserPayload, UpdateUserPayload},
    },
};

#[utoipa::path(
    get,
    path = "/api/users",
    tag = "Users",
    responses(
        (status = 200, description = "Lista de usuários", body = Vec<User>),
        (status = 403, description = "Somente superadmin")
    ),
    security(("api_jwt" = []))
)]
pub async fn list_users(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireSuperadmin,
) -> Result<Json<Vec<User>>, ApiError> {
    let users = app_state
        .user_service
        .list_users()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(users))
}

#[utoipa::path(
    get,
    path = "/api/users/{id}",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário", body = User),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireSuperadmin,
    Path(id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = app_state
        .user_service
        .get_user(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(user))
}

#[utoipa::path(
    post,
    path = "/api/users",
    tag = "Users",
    request_body = CreateUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = ActionResponse<User>),
        (status = 409, description = "Usuário ou e-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireSuperadmin,
    Json(payload): Json<CreateUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .user_service
        .create_user(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Usuario creado exitosamente.", "User created successfully.");
    Ok((StatusCode::CREATED, Json(ActionResponse::new(message, user))))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/update",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    request_body = UpdateUserPayload,
    responses(
        (status = 200, description = "Usuário alterado", body = ActionResponse<User>),
        (status = 404, description = "Não encontrado"),
        (status = 409, description = "Usuário ou e-mail já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_user(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireSuperadmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateUserPayload>,
) -> Result<Json<ActionResponse<User>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let user = app_state
        .user_service
        .update_user(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Usuario actualizado exitosamente.", "User updated successfully.");
    Ok(Json(ActionResponse::new(message, user)))
}

#[utoipa::path(
    post,
    path = "/api/users/{id}/delete",
    tag = "Users",
    params(("id" = Uuid, Path, description = "ID do usuário")),
    responses(
        (status = 200, description = "Usuário excluído", body = ActionResponse<String>),
        (status = 400, description = "Tentativa de excluir a própria conta"),
        (status = 404, description = "Não encontrado")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_user(
    State(app_state): State<AppState>,
    locale: Locale,
    guard: RequireSuperadmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    app_state
        .user_service
        .delete_user(&guard.user().0, id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(
        locale.text("Usuario eliminado exitosamente.", "User deleted successfully."),
    )))
}
