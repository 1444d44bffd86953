// src/common/error.rs

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Nosso tipo de erro de domínio, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data no passado")]
    PastDate,

    #[error("Horário inválido: {0}")]
    InvalidTimeSlot(String),

    #[error("Horário já reservado")]
    SlotConflict,

    #[error("Nome de usuário já existe")]
    UsernameAlreadyExists,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Planta já existe")]
    PlantNameAlreadyExists,

    #[error("Sala já existe")]
    RoomNameAlreadyExists,

    // Fallback para outras chaves únicas
    #[error("Violação de chave única: {0}")]
    UniqueConstraintViolation(String),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token de redefinição inválido ou expirado")]
    InvalidResetToken,

    #[error("Permissão negada")]
    Forbidden,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("Planta não encontrada")]
    PlantNotFound,

    #[error("Sala não encontrada")]
    RoomNotFound,

    #[error("Reunião não encontrada")]
    MeetingNotFound,

    #[error("Sala possui reuniões")]
    RoomHasMeetings,

    #[error("Planta possui salas")]
    PlantHasRooms,

    #[error("Não é possível excluir o próprio usuário")]
    CannotDeleteSelf,

    #[error("Erro de banco de dados: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // `anyhow::Error` é ótimo para capturar o contexto do erro.
    #[error("Erro interno do servidor: {0}")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

// O erro "pronto para HTTP": status + mensagem já traduzida.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

impl AppError {
    /// Converte o erro de domínio numa resposta HTTP no idioma do cliente.
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let en = locale.is_english();
        let pick = |es: &str, en_msg: &str| locale.text(es, en_msg);

        let (status, message) = match self {
            AppError::ValidationError(errors) => {
                let mut details = HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| match &e.message {
                            Some(m) => m.to_string(),
                            None => e.code.to_string(),
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                return ApiError {
                    status: StatusCode::BAD_REQUEST,
                    error: pick("Uno o más campos son inválidos.", "One or more fields are invalid."),
                    details: Some(json!(details)),
                };
            }
            AppError::PastDate => (
                StatusCode::BAD_REQUEST,
                pick(
                    "No se pueden agendar reuniones en fechas pasadas. Por favor selecciona la fecha de hoy o una fecha futura.",
                    "Meetings cannot be booked on past dates. Please pick today or a future date.",
                ),
            ),
            AppError::InvalidTimeSlot(label) => (
                StatusCode::BAD_REQUEST,
                if en {
                    format!("'{label}' is not a valid time slot.")
                } else {
                    format!("'{label}' no es un horario válido.")
                },
            ),
            AppError::SlotConflict => (
                StatusCode::CONFLICT,
                pick(
                    "Ya existe una reunión reservada en ese horario para esta sala.",
                    "A meeting is already booked for this room at that time slot.",
                ),
            ),
            AppError::UsernameAlreadyExists => (
                StatusCode::CONFLICT,
                pick("Este nombre de usuario ya está en uso.", "This username is already taken."),
            ),
            AppError::EmailAlreadyExists => (
                StatusCode::CONFLICT,
                pick("Este correo electrónico ya está registrado.", "This email is already registered."),
            ),
            AppError::PlantNameAlreadyExists => (
                StatusCode::CONFLICT,
                pick("Ya existe una planta con ese nombre.", "A plant with that name already exists."),
            ),
            AppError::RoomNameAlreadyExists => (
                StatusCode::CONFLICT,
                pick("Ya existe una sala con ese nombre.", "A room with that name already exists."),
            ),
            AppError::UniqueConstraintViolation(_) => (
                StatusCode::CONFLICT,
                pick("El registro ya existe (posible duplicado).", "The record already exists (possible duplicate)."),
            ),
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                pick("Correo o contraseña incorrectos.", "Invalid email or password."),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                pick(
                    "Por favor inicia sesión para acceder a esta página.",
                    "Please log in to access this page.",
                ),
            ),
            AppError::InvalidResetToken => (
                StatusCode::BAD_REQUEST,
                pick(
                    "El enlace de restablecimiento es inválido o ha expirado.",
                    "The reset link is invalid or has expired.",
                ),
            ),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                pick(
                    "No tienes permisos para acceder a esta página.",
                    "You do not have permission to access this page.",
                ),
            ),
            AppError::UserNotFound => (
                StatusCode::NOT_FOUND,
                pick("Usuario no encontrado.", "User not found."),
            ),
            AppError::PlantNotFound => (
                StatusCode::NOT_FOUND,
                pick("Planta no encontrada.", "Plant not found."),
            ),
            AppError::RoomNotFound => (
                StatusCode::NOT_FOUND,
                pick("Sala no encontrada.", "Room not found."),
            ),
            AppError::MeetingNotFound => (
                StatusCode::NOT_FOUND,
                pick("Reunión no encontrada.", "Meeting not found."),
            ),
            AppError::RoomHasMeetings => (
                StatusCode::CONFLICT,
                pick(
                    "No se puede eliminar la sala porque tiene reuniones asociadas.",
                    "The room cannot be deleted because it has meetings.",
                ),
            ),
            AppError::PlantHasRooms => (
                StatusCode::CONFLICT,
                pick(
                    "No se puede eliminar la planta porque tiene salas asociadas.",
                    "The plant cannot be deleted because it has rooms.",
                ),
            ),
            AppError::CannotDeleteSelf => (
                StatusCode::BAD_REQUEST,
                pick("No puedes eliminar tu propio usuario.", "You cannot delete your own user."),
            ),

            // Todos os outros erros (DatabaseError, InternalServerError, ...) viram 500.
            // O `tracing` loga a mensagem detalhada; o cliente só vê a genérica.
            e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    pick("Ocurrió un error inesperado.", "An unexpected error occurred."),
                )
            }
        };

        ApiError { status, error: message, details: None }
    }
}

// Sem um `Locale` à mão (ex.: middleware), respondemos no idioma padrão.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.to_api_error(&Locale::default()).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[derive(Validate)]
    struct Probe {
        #[validate(length(min = 3, message = "muito curto"))]
        name: String,
    }

    #[test]
    fn slot_conflict_is_409_in_spanish_by_default() {
        let api = AppError::SlotConflict.to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert!(api.error.starts_with("Ya existe una reunión"));
    }

    #[test]
    fn english_locale_translates_message() {
        let api = AppError::RoomNotFound.to_api_error(&Locale("en".into()));
        assert_eq!(api.status, StatusCode::NOT_FOUND);
        assert_eq!(api.error, "Room not found.");
    }

    #[test]
    fn validation_errors_carry_field_details() {
        let errors = Probe { name: "ab".into() }.validate().unwrap_err();
        let api = AppError::from(errors).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "muito curto");
    }

    #[test]
    fn internal_errors_hide_details() {
        let api = AppError::InternalServerError(anyhow::anyhow!("segredo")).to_api_error(&Locale::default());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("segredo"));
    }

    #[test]
    fn guard_errors_map_to_conflict_and_forbidden() {
        let locale = Locale::default();
        assert_eq!(AppError::RoomHasMeetings.to_api_error(&locale).status, StatusCode::CONFLICT);
        assert_eq!(AppError::PlantHasRooms.to_api_error(&locale).status, StatusCode::CONFLICT);
        assert_eq!(AppError::Forbidden.to_api_error(&locale).status, StatusCode::FORBIDDEN);
    }
}
