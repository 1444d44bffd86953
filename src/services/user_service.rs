// src/services/user_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::UserRepository,
    models::{
        auth::User,
        user::{CreateUserPayload, UpdateUserPayload},
    },
    services::auth::hash_password,
};

// Gestão de contas (somente superadmin; a checagem de papel fica no extrator)
#[derive(Clone)]
pub struct UserService {
    repo: UserRepository,
    pool: PgPool,
}

impl UserService {
    pub fn new(repo: UserRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_users(&self) -> Result<Vec<User>, AppError> {
        self.repo.list_all().await
    }

    pub async fn get_user(&self, id: Uuid) -> Result<User, AppError> {
        self.repo.find_by_id(id).await?.ok_or(AppError::UserNotFound)
    }

    pub async fn create_user(&self, payload: &CreateUserPayload) -> Result<User, AppError> {
        let hashed_password = hash_password(&payload.password).await?;

        let user = self
            .repo
            .create_user(
                &self.pool,
                payload.username.trim(),
                payload.email.trim(),
                &hashed_password,
                payload.role,
            )
            .await?;

        tracing::info!(user_id = %user.id, role = ?user.role, "usuário criado");
        Ok(user)
    }

    pub async fn update_user(&self, id: Uuid, payload: &UpdateUserPayload) -> Result<User, AppError> {
        let hashed_password = match &payload.password {
            Some(password) => Some(hash_password(password).await?),
            None => None,
        };

        // Unicidade de username/e-mail (excluindo o próprio) fica com as constraints
        self.repo
            .update_user(
                &self.pool,
                id,
                payload.username.trim(),
                payload.email.trim(),
                hashed_password.as_deref(),
                payload.role,
            )
            .await?
            .ok_or(AppError::UserNotFound)
    }

    pub async fn delete_user(&self, current_user: &User, id: Uuid) -> Result<(), AppError> {
        if current_user.id == id {
            return Err(AppError::CannotDeleteSelf);
        }

        let deleted = self.repo.delete_user(&self.pool, id).await?;
        if !deleted {
            return Err(AppError::UserNotFound);
        }

        tracing::info!(user_id = %id, by = %current_user.id, "usuário excluído");
        Ok(())
    }
}


#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::{config::test_support::state_with_pool, models::auth::Role};

    fn update(password: Option<&str>) -> UpdateUserPayload {
        UpdateUserPayload {
            username: "luis".into(),
            email: "luis@example.com".into(),
            password: password.map(str::to_string),
            role: Role::User,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn password_change_by_superadmin_ends_sessions(pool: PgPool) {
        let state = state_with_pool(pool);
        let (jwt, user) = state
            .auth_service
            .register_user("luis", "luis@example.com", "segredo1")
            .await
            .unwrap();

        // Sem senha nova a sessão continua
        state.user_service.update_user(user.id, &update(None)).await.unwrap();
        assert!(state.auth_service.validate_token(&jwt).await.is_ok());

        state.user_service.update_user(user.id, &update(Some("novasenha"))).await.unwrap();
        assert!(matches!(
            state.auth_service.validate_token(&jwt).await,
            Err(AppError::InvalidToken)
        ));
        assert!(state.auth_service.login_user("luis@example.com", "novasenha").await.is_ok());
    }
}
