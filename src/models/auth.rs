// src/models/auth.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validation::validate_username;

// Mapeia o CREATE TYPE user_role do banco.
// A hierarquia é plana: cada papel é só um valor do enum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Admin,
    Superadmin,
}

impl Role {
    pub fn is_superadmin(self) -> bool {
        matches!(self, Role::Superadmin)
    }

    /// Admin e Superadmin gerenciam salas e plantas.
    pub fn is_admin(self) -> bool {
        matches!(self, Role::Admin | Role::Superadmin)
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: Role,

    #[serde(skip_serializing)]
    pub reset_token: Option<String>,
    #[serde(skip_serializing)]
    pub reset_token_expiry: Option<DateTime<Utc>>,

    // Incrementado no logout e na troca de senha: invalida os JWTs antigos
    #[serde(skip_serializing)]
    pub session_version: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl User {
    /// O token só autoriza a troca de senha se existir, for igual e não tiver expirado.
    pub fn reset_token_is_valid(&self, token: &str, now: DateTime<Utc>) -> bool {
        match (&self.reset_token, self.reset_token_expiry) {
            (Some(stored), Some(expiry)) => stored == token && now <= expiry,
            _ => false,
        }
    }
}

// Dados para auto-registro (sempre cria um usuário comum)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct RegisterUserPayload {
    #[validate(custom(function = "validate_username"))]
    #[schema(example = "maria")]
    pub username: String,
    #[validate(email(message = "Correo inválido."), length(max = 120))]
    #[schema(example = "maria@example.com")]
    pub email: String,
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
}

// Dados para login (por e-mail, não por nome de usuário)
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginUserPayload {
    #[validate(email(message = "Correo inválido."), length(max = 120))]
    pub email: String,
    #[validate(length(min = 1, message = "La contraseña es requerida."))]
    pub password: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct ForgotPasswordPayload {
    #[validate(email(message = "Correo inválido."))]
    pub email: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordPayload {
    #[validate(length(min = 6, message = "La contraseña debe tener al menos 6 caracteres."))]
    pub password: String,
    #[validate(must_match(other = "password", message = "Las contraseñas deben coincidir."))]
    pub confirm_password: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
pub struct AuthResponse {
    pub token: String,
    pub user: User,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,  // Subject (ID do usuário)
    pub exp: usize, // Expiration time (quando o token expira)
    pub iat: usize, // Issued At (quando o token foi criado)
    pub ver: i32,   // Versão da sessão do usuário no momento da emissão
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn user_with_token(token: Option<&str>, expiry: Option<DateTime<Utc>>) -> User {
        let now = Utc::now();
        User {
            id: Uuid::new_v4(),
            username: "ana".into(),
            email: "ana@example.com".into(),
            password_hash: "x".into(),
            role: Role::User,
            reset_token: token.map(str::to_string),
            reset_token_expiry: expiry,
            session_version: 0,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn role_hierarchy() {
        assert!(Role::Superadmin.is_admin());
        assert!(Role::Admin.is_admin());
        assert!(!Role::User.is_admin());
        assert!(!Role::Admin.is_superadmin());
    }

    #[test]
    fn issued_token_is_valid_before_expiry() {
        let now = Utc::now();
        let user = user_with_token(Some("abc"), Some(now + Duration::hours(1)));
        assert!(user.reset_token_is_valid("abc", now));
        assert!(!user.reset_token_is_valid("abd", now));
    }

    #[test]
    fn expired_token_is_rejected() {
        let now = Utc::now();
        let user = user_with_token(Some("abc"), Some(now - Duration::seconds(1)));
        assert!(!user.reset_token_is_valid("abc", now));
    }

    #[test]
    fn consumed_token_is_rejected() {
        let user = user_with_token(None, None);
        assert!(!user.reset_token_is_valid("abc", Utc::now()));
    }

    #[test]
    fn secrets_are_not_serialized() {
        let user = user_with_token(Some("abc"), Some(Utc::now()));
        let json = serde_json::to_value(&user).unwrap();
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("resetToken").is_none());
        assert_eq!(json["role"], "user");
    }
}
