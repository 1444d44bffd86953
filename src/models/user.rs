// src/models/user.rs
// Payloads da gestão de usuários (exclusiva do superadmin)

use serde::Deserialize;
use utoipa::ToSchema;
use validator::Validate;

use crate::models::{auth::Role, validation::validate_username};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserPayload {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Correo inválido."), length(max = 120))]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,

    pub role: Role,
}

// Na edição a senha é opcional: ausente = mantém a atual
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateUserPayload {
    #[validate(custom(function = "validate_username"))]
    pub username: String,

    #[validate(email(message = "Correo inválido."), length(max = 120))]
    pub email: String,

    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: Option<String>,

    pub role: Role,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_is_parsed_from_lowercase() {
        let payload: CreateUserPayload = serde_json::from_str(
            r#"{"username":"luis","email":"luis@example.com","password":"secreto","role":"admin"}"#,
        )
        .unwrap();
        assert_eq!(payload.role, Role::Admin);
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn update_without_password_is_valid() {
        let payload: UpdateUserPayload = serde_json::from_str(
            r#"{"username":"luis","email":"luis@example.com","role":"user"}"#,
        )
        .unwrap();
        assert!(payload.password.is_none());
        assert!(payload.validate().is_ok());
    }

    #[test]
    fn short_password_is_rejected_on_update() {
        let payload = UpdateUserPayload {
            username: "luis".into(),
            email: "luis@example.com".into(),
            password: Some("123".into()),
            role: Role::User,
        };
        assert!(payload.validate().is_err());
    }

    #[test]
    fn padded_short_username_is_rejected() {
        let payload = CreateUserPayload {
            username: "  ab  ".into(),
            email: "ab@example.com".into(),
            password: "secreto".into(),
            role: Role::User,
        };
        assert!(payload.validate().unwrap_err().field_errors().contains_key("username"));
    }
}
