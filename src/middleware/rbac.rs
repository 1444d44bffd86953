// src/middleware/rbac.rs

use axum::{extract::FromRequestParts, http::request::Parts};
use std::marker::PhantomData;

use crate::{
    common::error::{ApiError, AppError},
    middleware::{auth::AuthenticatedUser, i18n::Locale},
    models::auth::Role,
};

/// 1. O Trait que define um nível de acesso
pub trait RoleRequirement: Send + Sync + 'static {
    fn allows(role: Role) -> bool;
}

/// 2. O Extractor (Guardião). Carrega o usuário já autorizado.
pub struct RequireRole<T>(pub AuthenticatedUser, pub PhantomData<T>);

impl<T> RequireRole<T> {
    pub fn user(&self) -> &AuthenticatedUser {
        &self.0
    }
}

// 3. Implementação do FromRequestParts
impl<T, S> FromRequestParts<S> for RequireRole<T>
where
    T: RoleRequirement,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // A. Extrai o usuário (401 se a rota não passou pelo auth_guard)
        let user = AuthenticatedUser::from_request_parts(parts, state).await?;

        // B. Confere o papel
        if !T::allows(user.0.role) {
            let Ok(locale) = Locale::from_request_parts(parts, state).await;
            tracing::warn!(user_id = %user.0.id, role = ?user.0.role, "acesso negado");
            return Err(AppError::Forbidden.to_api_error(&locale));
        }

        Ok(RequireRole(user, PhantomData))
    }
}

// ---
// NÍVEIS DE ACESSO (TIPOS)
// ---

pub struct AdminRole;
impl RoleRequirement for AdminRole {
    fn allows(role: Role) -> bool { role.is_admin() }
}

pub struct SuperadminRole;
impl RoleRequirement for SuperadminRole {
    fn allows(role: Role) -> bool { role.is_superadmin() }
}

pub type RequireAdmin = RequireRole<AdminRole>;
pub type RequireSuperadmin = RequireRole<SuperadminRole>;

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, StatusCode};
    use chrono::Utc;
    use uuid::Uuid;

    fn parts_with(role: Option<Role>) -> Parts {
        let (mut parts, _) = Request::builder()
            .header("Accept-Language", "en")
            .body(())
            .unwrap()
            .into_parts();
        if let Some(role) = role {
            let now = Utc::now();
            parts.extensions.insert(AuthenticatedUser(crate::models::auth::User {
                id: Uuid::new_v4(),
                username: "u".into(),
                email: "u@example.com".into(),
                password_hash: String::new(),
                role,
                reset_token: None,
                reset_token_expiry: None,
                session_version: 0,
                created_at: now,
                updated_at: now,
            }));
        }
        parts
    }

    #[test]
    fn role_levels() {
        assert!(AdminRole::allows(Role::Admin));
        assert!(AdminRole::allows(Role::Superadmin));
        assert!(!AdminRole::allows(Role::User));
        assert!(SuperadminRole::allows(Role::Superadmin));
        assert!(!SuperadminRole::allows(Role::Admin));
    }

    #[tokio::test]
    async fn user_role_is_forbidden_for_admin_routes() {
        let mut parts = parts_with(Some(Role::User));
        let result = RequireAdmin::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.err().map(|e| e.status), Some(StatusCode::FORBIDDEN));
    }

    #[tokio::test]
    async fn missing_user_is_unauthorized() {
        let mut parts = parts_with(None);
        let result = RequireSuperadmin::from_request_parts(&mut parts, &()).await;
        assert_eq!(result.err().map(|e| e.status), Some(StatusCode::UNAUTHORIZED));
    }

    #[tokio::test]
    async fn superadmin_passes() {
        let mut parts = parts_with(Some(Role::Superadmin));
        assert!(RequireSuperadmin::from_request_parts(&mut parts, &()).await.is_ok());
    }
}
