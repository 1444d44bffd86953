// src/handlers/meetings.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use chrono::{Local, NaiveDate};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        meeting::{Availability, AvailabilityQuery, Meeting, MeetingDetail, MeetingFilter, MeetingPayload},
        response::ActionResponse,
    },
};

// "Hoje" segundo o relógio do servidor
fn today() -> NaiveDate {
    Local::now().date_naive()
}

#[utoipa::path(
    get,
    path = "/api/meetings",
    tag = "Meetings",
    params(MeetingFilter),
    responses((status = 200, description = "Reuniões do dia, por horário", body = Vec<MeetingDetail>)),
    security(("api_jwt" = []))
)]
pub async fn list_meetings(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Query(filter): Query<MeetingFilter>,
) -> Result<Json<Vec<MeetingDetail>>, ApiError> {
    let meetings = app_state
        .booking_service
        .list_meetings(&filter, &user, today())
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(meetings))
}

#[utoipa::path(
    get,
    path = "/api/meetings/time-slots",
    tag = "Meetings",
    responses((status = 200, description = "Os 20 horários fixos, em ordem", body = Vec<String>)),
    security(("api_jwt" = []))
)]
pub async fn list_time_slots(State(app_state): State<AppState>) -> Json<Vec<String>> {
    Json(
        app_state
            .booking_service
            .time_slots()
            .into_iter()
            .map(String::from)
            .collect(),
    )
}

#[utoipa::path(
    get,
    path = "/api/meetings/availability",
    tag = "Meetings",
    params(AvailabilityQuery),
    responses(
        (status = 200, description = "Horários livres e ocupados da sala", body = Availability),
        (status = 404, description = "Sala inexistente")
    ),
    security(("api_jwt" = []))
)]
pub async fn availability(
    State(app_state): State<AppState>,
    locale: Locale,
    Query(query): Query<AvailabilityQuery>,
) -> Result<Json<Availability>, ApiError> {
    let availability = app_state
        .booking_service
        .availability(query.room_id, query.date.unwrap_or_else(today))
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(availability))
}

#[utoipa::path(
    get,
    path = "/api/meetings/{id}",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "ID da reunião")),
    responses(
        (status = 200, description = "Reunião", body = MeetingDetail),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn get_meeting(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(id): Path<Uuid>,
) -> Result<Json<MeetingDetail>, ApiError> {
    let meeting = app_state
        .booking_service
        .get_meeting(id)
        .await
        .map_err(|e| e.to_api_error(&locale))?;
    Ok(Json(meeting))
}

#[utoipa::path(
    post,
    path = "/api/meetings",
    tag = "Meetings",
    request_body = MeetingPayload,
    responses(
        (status = 201, description = "Reunião reservada", body = ActionResponse<Meeting>),
        (status = 400, description = "Dados inválidos ou data no passado"),
        (status = 409, description = "Horário já ocupado nessa sala")
    ),
    security(("api_jwt" = []))
)]
pub async fn create_meeting(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Json(payload): Json<MeetingPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (meeting, warning) = app_state
        .booking_service
        .create_meeting(&payload, &user, today())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text(
        "Reunión reservada exitosamente.",
        "Meeting booked successfully.",
    );
    let body = ActionResponse::new(message, meeting).with_warning(warning);
    Ok((StatusCode::CREATED, Json(body)))
}

#[utoipa::path(
    post,
    path = "/api/meetings/{id}/update",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "ID da reunião")),
    request_body = MeetingPayload,
    responses(
        (status = 200, description = "Reunião alterada", body = ActionResponse<Meeting>),
        (status = 403, description = "Só o criador ou um superadmin"),
        (status = 409, description = "Horário já ocupado nessa sala")
    ),
    security(("api_jwt" = []))
)]
pub async fn update_meeting(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<MeetingPayload>,
) -> Result<Json<ActionResponse<Meeting>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (meeting, warning) = app_state
        .booking_service
        .update_meeting(id, &payload, &user, today())
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text(
        "Reunión actualizada exitosamente.",
        "Meeting updated successfully.",
    );
    Ok(Json(ActionResponse::new(message, meeting).with_warning(warning)))
}

#[utoipa::path(
    post,
    path = "/api/meetings/{id}/delete",
    tag = "Meetings",
    params(("id" = Uuid, Path, description = "ID da reunião")),
    responses(
        (status = 200, description = "Reunião cancelada", body = ActionResponse<String>),
        (status = 403, description = "Só o criador ou um superadmin"),
        (status = 404, description = "Não encontrada")
    ),
    security(("api_jwt" = []))
)]
pub async fn delete_meeting(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
    Path(id): Path<Uuid>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    let warning = app_state
        .booking_service
        .delete_meeting(id, &user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text(
        "Reunión eliminada exitosamente.",
        "Meeting deleted successfully.",
    );
    Ok(Json(ActionResponse::message(message).with_warning(warning)))
}
