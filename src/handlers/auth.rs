// src/handlers/auth.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use validator::Validate;

use crate::{
    common::error::{ApiError, AppError},
    config::AppState,
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::{
        auth::{
            AuthResponse, ForgotPasswordPayload, LoginUserPayload, RegisterUserPayload,
            ResetPasswordPayload, User,
        },
        response::ActionResponse,
    },
};

// Handler de registro
#[utoipa::path(
    post,
    path = "/api/auth/register",
    tag = "Auth",
    request_body = RegisterUserPayload,
    responses(
        (status = 201, description = "Usuário criado", body = AuthResponse),
        (status = 400, description = "Dados inválidos"),
        (status = 409, description = "Usuário ou e-mail já em uso")
    )
)]
pub async fn register(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<RegisterUserPayload>,
) -> Result<impl IntoResponse, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (token, user) = app_state
        .auth_service
        .register_user(&payload.username, &payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok((StatusCode::CREATED, Json(AuthResponse { token, user })))
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Auth",
    request_body = LoginUserPayload,
    responses(
        (status = 200, description = "Login efetuado", body = AuthResponse),
        (status = 401, description = "Credenciais inválidas")
    )
)]
pub async fn login(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    let (token, user) = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(AuthResponse { token, user }))
}

#[utoipa::path(
    post,
    path = "/api/auth/logout",
    tag = "Auth",
    responses(
        (status = 200, description = "Sessões encerradas", body = ActionResponse<String>)
    ),
    security(("api_jwt" = []))
)]
pub async fn logout(
    State(app_state): State<AppState>,
    locale: Locale,
    AuthenticatedUser(user): AuthenticatedUser,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    app_state
        .auth_service
        .logout(&user)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(
        locale.text("Sesión cerrada.", "Logged out."),
    )))
}

// A mesma resposta exista ou não o e-mail (e mesmo se o envio falhar)
#[utoipa::path(
    post,
    path = "/api/auth/forgot-password",
    tag = "Auth",
    request_body = ForgotPasswordPayload,
    responses(
        (status = 200, description = "Pedido registrado", body = ActionResponse<String>)
    )
)]
pub async fn forgot_password(
    State(app_state): State<AppState>,
    locale: Locale,
    Json(payload): Json<ForgotPasswordPayload>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .forgot_password(&payload.email)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    let message = locale.text(
        "Si el correo está registrado, recibirás un enlace para restablecer tu contraseña.",
        "If the email is registered, you will receive a link to reset your password.",
    );
    Ok(Json(ActionResponse::message(message)))
}

#[utoipa::path(
    get,
    path = "/api/auth/reset-password/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Token recebido por e-mail")),
    responses(
        (status = 200, description = "Token válido", body = ActionResponse<String>),
        (status = 400, description = "Token inválido ou expirado")
    )
)]
pub async fn check_reset_token(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(token): Path<String>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    app_state
        .auth_service
        .check_reset_token(&token)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(
        locale.text("Enlace válido.", "Valid link."),
    )))
}

#[utoipa::path(
    post,
    path = "/api/auth/reset-password/{token}",
    tag = "Auth",
    params(("token" = String, Path, description = "Token recebido por e-mail")),
    request_body = ResetPasswordPayload,
    responses(
        (status = 200, description = "Senha alterada", body = ActionResponse<String>),
        (status = 400, description = "Token inválido/expirado ou senhas diferentes")
    )
)]
pub async fn reset_password(
    State(app_state): State<AppState>,
    locale: Locale,
    Path(token): Path<String>,
    Json(payload): Json<ResetPasswordPayload>,
) -> Result<Json<ActionResponse<()>>, ApiError> {
    payload
        .validate()
        .map_err(|e| AppError::ValidationError(e).to_api_error(&locale))?;

    app_state
        .auth_service
        .reset_password(&token, &payload.password)
        .await
        .map_err(|e| e.to_api_error(&locale))?;

    Ok(Json(ActionResponse::message(locale.text(
        "Tu contraseña ha sido actualizada. Ya puedes iniciar sesión.",
        "Your password has been updated. You can now log in.",
    ))))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/users/me",
    tag = "Users",
    responses((status = 200, description = "Usuário autenticado", body = User)),
    security(("api_jwt" = []))
)]
pub async fn get_me(AuthenticatedUser(user): AuthenticatedUser) -> Json<User> {
    Json(user)
}

#[utoipa::path(
    get,
    path = "/api/health",
    tag = "Health",
    responses((status = 200, description = "Serviço no ar e modo de envio de e-mail"))
)]
pub async fn health(State(app_state): State<AppState>) -> Json<serde_json::Value> {
    // "log" = SMTP_HOST ausente, os e-mails só vão para o log
    let mail = if app_state.mail_service.is_enabled() { "smtp" } else { "log" };
    Json(serde_json::json!({ "status": "ok", "mail": mail }))
}
