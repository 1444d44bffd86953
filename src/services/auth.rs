// src/services/auth.rs

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine as _};
use bcrypt::{hash, verify};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use rand::Rng;
use sqlx::PgPool;

use crate::{
    common::error::AppError,
    config::SuperadminSeed,
    db::UserRepository,
    models::auth::{Claims, Role, User},
    services::mail_service::{self, MailService},
};

// Validade do link de redefinição de senha
pub const RESET_TOKEN_TTL_HOURS: i64 = 1;
const JWT_TTL_DAYS: i64 = 7;

/// Gera um token URL-safe a partir de 32 bytes aleatórios.
pub fn generate_reset_token() -> String {
    let mut bytes = [0u8; 32];
    rand::thread_rng().fill(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

// Hashing num thread separado: o bcrypt é caro e bloquearia o runtime
pub async fn hash_password(password: &str) -> Result<String, AppError> {
    let password_clone = password.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&password_clone, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}

pub async fn verify_password(password: &str, password_hash: &str) -> Result<bool, AppError> {
    let password_clone = password.to_owned();
    let password_hash_clone = password_hash.to_owned();
    let is_valid = tokio::task::spawn_blocking(move || verify(&password_clone, &password_hash_clone))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;
    Ok(is_valid)
}

#[derive(Clone)]
pub struct AuthService {
    user_repo: UserRepository,
    mail_service: MailService,
    jwt_secret: String,
    public_base_url: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        user_repo: UserRepository,
        mail_service: MailService,
        jwt_secret: String,
        public_base_url: String,
        pool: PgPool,
    ) -> Self {
        Self { user_repo, mail_service, jwt_secret, public_base_url, pool }
    }

    // Auto-registro: sempre cria um usuário comum
    pub async fn register_user(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<(String, User), AppError> {
        let hashed_password = hash_password(password).await?;

        let new_user = self
            .user_repo
            .create_user(&self.pool, username.trim(), email.trim(), &hashed_password, Role::User)
            .await?;

        tracing::info!(user_id = %new_user.id, "novo usuário registrado");
        let token = self.create_token(&new_user)?;
        Ok((token, new_user))
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<(String, User), AppError> {
        // E-mail inexistente e senha errada dão o mesmo erro
        let user = self
            .user_repo
            .find_by_email(email.trim())
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash).await? {
            return Err(AppError::InvalidCredentials);
        }

        let token = self.create_token(&user)?;
        Ok((token, user))
    }

    pub async fn logout(&self, user: &User) -> Result<(), AppError> {
        self.user_repo.bump_session_version(user.id).await
    }

    pub async fn validate_token(&self, token: &str) -> Result<User, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .user_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::InvalidToken)?;

        // Token emitido antes de um logout / troca de senha
        if user.session_version != token_data.claims.ver {
            return Err(AppError::InvalidToken);
        }

        Ok(user)
    }

    fn create_token(&self, user: &User) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + Duration::days(JWT_TTL_DAYS);

        let claims = Claims {
            sub: user.id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
            ver: user.session_version,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }

    // ---
    // Redefinição de senha: none -> issued -> (consumed | expired)
    // ---

    /// Emite o token e envia o link. Nunca revela se o e-mail existe:
    /// e-mail desconhecido e falha no envio só aparecem no log.
    pub async fn forgot_password(&self, email: &str) -> Result<(), AppError> {
        let Some(user) = self.user_repo.find_by_email(email.trim()).await? else {
            tracing::info!("pedido de redefinição para e-mail desconhecido");
            return Ok(());
        };

        let token = generate_reset_token();
        let expiry = Utc::now() + Duration::hours(RESET_TOKEN_TTL_HOURS);
        self.user_repo.set_reset_token(user.id, &token, expiry).await?;

        let reset_url = format!("{}/reset-password/{}", self.public_base_url, token);
        let email = mail_service::password_reset(&user, &reset_url);
        if let Err(e) = self.mail_service.send(&email).await {
            tracing::warn!(user_id = %user.id, "Erro ao enviar e-mail de redefinição: {}", e);
        }

        Ok(())
    }

    /// Confere se o token ainda é utilizável (para a tela de nova senha).
    pub async fn check_reset_token(&self, token: &str) -> Result<User, AppError> {
        let user = self
            .user_repo
            .find_by_reset_token(token)
            .await?
            .ok_or(AppError::InvalidResetToken)?;

        if !user.reset_token_is_valid(token, Utc::now()) {
            return Err(AppError::InvalidResetToken);
        }
        Ok(user)
    }

    pub async fn reset_password(&self, token: &str, new_password: &str) -> Result<(), AppError> {
        let user = self.check_reset_token(token).await?;
        let hashed_password = hash_password(new_password).await?;

        let mut tx = self.pool.begin().await?;
        let consumed = self
            .user_repo
            .consume_reset_token(&mut *tx, user.id, token, &hashed_password)
            .await?;
        if !consumed {
            // Outro pedido consumiu o token (ou ele expirou) entre a checagem e o UPDATE
            return Err(AppError::InvalidResetToken);
        }
        tx.commit().await?;

        tracing::info!(user_id = %user.id, "senha redefinida por token");
        Ok(())
    }

    // ---
    // Bootstrap do superadmin
    // ---
    pub async fn ensure_superadmin(&self, seed: &SuperadminSeed) -> Result<(), AppError> {
        if self
            .user_repo
            .find_by_username_or_email(&seed.username, &seed.email)
            .await?
            .is_some()
        {
            return Ok(());
        }

        let hashed_password = hash_password(&seed.password).await?;
        match self
            .user_repo
            .create_user(&self.pool, &seed.username, &seed.email, &hashed_password, Role::Superadmin)
            .await
        {
            Ok(user) => {
                tracing::info!("👑 Super Admin criado: usuário='{}'", user.username);
                Ok(())
            }
            // Outra instância criou ao mesmo tempo
            Err(AppError::UsernameAlreadyExists | AppError::EmailAlreadyExists) => {
                tracing::warn!("Super Admin não criado: já existe um registro com esse usuário ou e-mail");
                Ok(())
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reset_tokens_are_url_safe_and_unique() {
        let a = generate_reset_token();
        let b = generate_reset_token();
        assert_ne!(a, b);
        // 32 bytes -> 43 caracteres base64 sem padding
        assert_eq!(a.len(), 43);
        assert!(a.chars().all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_'));
    }

    #[tokio::test]
    async fn password_hash_roundtrip() {
        let hashed = hash_password("segredo1").await.unwrap();
        assert!(verify_password("segredo1", &hashed).await.unwrap());
        assert!(!verify_password("outra", &hashed).await.unwrap());
    }

    #[tokio::test]
    async fn token_with_wrong_secret_is_rejected() {
        let state = crate::config::test_support::lazy_state();
        let exp = (Utc::now() + Duration::hours(1)).timestamp() as usize;
        let claims = Claims { sub: uuid::Uuid::new_v4(), exp, iat: 0, ver: 0 };
        let forged = encode(&Header::default(), &claims, &EncodingKey::from_secret(b"outro")).unwrap();
        // Falha na assinatura antes de tocar no banco
        let result = state.auth_service.validate_token(&forged).await;
        assert!(matches!(result, Err(AppError::InvalidToken)));
    }
}

#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::config::test_support::state_with_pool;

    async fn issued_token(pool: &PgPool, user_id: uuid::Uuid) -> String {
        sqlx::query_scalar("SELECT reset_token FROM users WHERE id = $1")
            .bind(user_id)
            .fetch_one(pool)
            .await
            .unwrap()
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn reset_token_is_single_use(pool: PgPool) {
        let state = state_with_pool(pool.clone());
        let auth = &state.auth_service;
        let (old_jwt, user) = auth.register_user("maria", "maria@example.com", "segredo1").await.unwrap();

        auth.forgot_password("maria@example.com").await.unwrap();
        let token = issued_token(&pool, user.id).await;
        assert!(auth.check_reset_token(&token).await.is_ok());

        auth.reset_password(&token, "novasenha").await.unwrap();
        assert!(matches!(
            auth.reset_password(&token, "outrasenha").await,
            Err(AppError::InvalidResetToken)
        ));

        // Sessões antigas caem; a senha nova funciona
        assert!(matches!(auth.validate_token(&old_jwt).await, Err(AppError::InvalidToken)));
        assert!(auth.login_user("maria@example.com", "novasenha").await.is_ok());
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn expired_reset_token_is_rejected(pool: PgPool) {
        let state = state_with_pool(pool.clone());
        let auth = &state.auth_service;
        let (_, user) = auth.register_user("lucia", "lucia@example.com", "segredo1").await.unwrap();

        let token = generate_reset_token();
        UserRepository::new(pool.clone())
            .set_reset_token(user.id, &token, Utc::now() - Duration::minutes(1))
            .await
            .unwrap();

        assert!(matches!(auth.check_reset_token(&token).await, Err(AppError::InvalidResetToken)));
        assert!(matches!(
            auth.reset_password(&token, "novasenha").await,
            Err(AppError::InvalidResetToken)
        ));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn logout_invalidates_issued_tokens(pool: PgPool) {
        let state = state_with_pool(pool);
        let auth = &state.auth_service;
        let (jwt, user) = auth.register_user("ana", "ana@example.com", "segredo1").await.unwrap();

        assert_eq!(auth.validate_token(&jwt).await.unwrap().id, user.id);
        auth.logout(&user).await.unwrap();
        assert!(matches!(auth.validate_token(&jwt).await, Err(AppError::InvalidToken)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn email_uniqueness_ignores_case(pool: PgPool) {
        let state = state_with_pool(pool);
        let auth = &state.auth_service;
        auth.register_user("maria", "Maria@example.com", "segredo1").await.unwrap();

        let duplicate = auth.register_user("maria2", "maria@example.com", "outrasenha").await;
        assert!(matches!(duplicate, Err(AppError::EmailAlreadyExists)));

        let (_, user) = auth.login_user("MARIA@example.com", "segredo1").await.unwrap();
        assert_eq!(user.username, "maria");
    }
}
