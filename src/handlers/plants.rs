// src/handlers/plants.rs

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
    middleware::{i18n::Locale, rbac::RequireAdmin},
    models::{
        plant::{Plant, PlantPayload, PlantSummary},
        response::ActionResponse,
    },
};

#[utoipa::path(
    get,
    path = "/api/plants",
    tag = "Plants",
    responses((status = 200, description = "Plantas com a contagem de salas", body = Vec<PlantSummary>)),
    security(("api_jwt" = []))
)]
pub async fn list_plants(
    State(app_state): State<AppState>,
    locale: Locale,
) -> Result<Json<Vec<PlantSummary>>, ApiError> {
    let plants = app_state
        .plant_service
        .list_plants()
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(plants))
}

#[utoipa::path(
    get,
    path = "/api/plants/{id}",
    tag = "Plants",
    params(("id" = Uuid, Path, description = "ID da planta")),
    responses(
        (status = 200, description = "Planta", body = Plant),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Plant>, ApiError> {
    let plant = app_state
        .plant_service
        .get_plant(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(plant))
}

#[utoipa::path(
    post,
    path = "/api/plants",
    tag = "Plants",
    request_body = PlantPayload,
    responses(
        (status = 201, description = "Planta criada", body = ActionResponse<Plant>),
        (status = 409, description = "Nome já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    admin: RequireAdmin,
    Json(payload): Json<PlantPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let plant = app_state
        .plant_service
        .create_plant(&payload, admin.user().0.id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Planta creada exitosamente.", "Plant created successfully.");
    Ok((StatusCode::CREATED, Json(ActionResponse::new(message, plant))))
}

#[utoipa::path(
    post,
    path = "/api/plants/{id}/update",
    tag = "Plants",
    params(("id" = Uuid, Path, description = "ID da planta")),
    request_body = PlantPayload,
    responses(
        (status = 200, description = "Planta alterada", body = ActionResponse<Plant>),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<PlantPayload>,
) -> Result<Json<ActionResponse<Plant>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let plant = app_state
        .plant_service
        .update_plant(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Planta actualizada exitosamente.", "Plant updated successfully.");
    Ok(Json(ActionResponse::new(message, plant)))
}

#[utoipa::path(
    post,
    path = "/api/plants/{id}/delete",
    tag = "Plants",
    params(("id" = Uuid, Path, description = "ID da planta")),
    responses(
        (status = 200, description = "Planta excluída", body = ActionResponse<String>),
        (status = 409, description = "A planta ainda tem salas")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_plant(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    app_state
        .plant_service
        .delete_plant(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(
        locale.text("Planta eliminada exitosamente.", "Plant deleted successfully."),
    )))
}
