// src/handlers/rooms.rs

use axum::{
    extract::{Path, Query, State},
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
        response::ActionResponse,
        room::{Room, RoomDetail, RoomFilter, RoomPayload},
    },
};

// ?plantId= alimenta o select dependente planta -> sala
#[utoipa::path(
    get,
    path = "/api/rooms",
    tag = "Rooms",
    params(RoomFilter),
    responses((status = 200, description = "Salas com o nome da planta", body = Vec<RoomDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_rooms(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(filter): Query<RoomFilter>,
) -> Result<Json<Vec<RoomDetail>>, ApiError> {
    let rooms = app_state
        .room_service
        .list_rooms(filter.plant_id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(rooms))
}

#[utoipa::path(
    get,
    path = "/api/rooms/{id}",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID da sala")),
    responses(
        (status = 200, description = "Sala", body = Room),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_room(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<Room>, ApiError> {
    let room = app_state
        .room_service
        .get_room(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(room))
}

#[utoipa::path(
    post,
    path = "/api/rooms",
    tag = "Rooms",
    request_body = RoomPayload,
    responses(
        (status = 201, description = "Sala criada", body = ActionResponse<Room>),
        (status = 404, description = "Planta inexistente"),
        (status = 409, description = "Nome já em uso")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_room(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
    Json(payload): Json<RoomPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let room = app_state
        .room_service
        .create_room(&payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Sala creada exitosamente.", "Room created successfully.");
    Ok((StatusCode::CREATED, Json(ActionResponse::new(message, room))))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{id}/update",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID da sala")),
    request_body = RoomPayload,
    responses(
        (status = 200, description = "Sala alterada", body = ActionResponse<Room>),
        (status = 404, description = "Sala ou planta inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_room(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<ActionResponse<Room>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let room = app_state
        .room_service
        .update_room(id, &payload)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text("Sala actualizada exitosamente.", "Room updated successfully.");
    Ok(Json(ActionResponse::new(message, room)))
}

#[utoipa::path(
    post,
    path = "/api/rooms/{id}/delete",
    tag = "Rooms",
    params(("id" = Uuid, Path, description = "ID da sala")),
    responses(
        (status = 200, description = "Sala excluída", body = ActionResponse<String>),
        (status = 409, description = "A sala ainda tem reuniões")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_room(
    State(app_state): State<AppState>,
    locale: Locale,
    _guard: RequireAdmin,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    app_state
        .room_service
        .delete_room(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(
        locale.text("Sala eliminada exitosamente.", "Room deleted successfully."),
    )))
}
