// src/config.rs

use std::{env, sync::Arc, time::Duration};

use anyhow::Context;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{MeetingRepository, PlantRepository, RoomRepository, UserRepository},
    services::{
        auth::AuthService, booking_service::BookingService, mail_service::MailService,
        plant_service::PlantService, room_service::RoomService, user_service::UserService,
    },
};

// Servidor SMTP; sem SMTP_HOST os e-mails só são logados
#[derive(Debug, Clone)]
pub struct SmtpConfig {
    pub host: String,
    pub port: u16,
    pub username: Option<String>,
    pub password: Option<String>,
    pub starttls: bool,
}

// Conta criada na primeira subida se ainda não existir
#[derive(Debug, Clone)]
pub struct SuperadminSeed {
    pub username: String,
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub jwt_secret: String,
    pub bind_addr: String,
    pub db_max_connections: u32,
    pub db_acquire_timeout: Duration,
    pub public_base_url: String,
    pub mail_from: String,
    pub smtp: Option<SmtpConfig>,
    pub superadmin: SuperadminSeed,
}

fn var_or(name: &str, default: &str) -> String {
    env::var(name).unwrap_or_else(|_| default.to_string())
}

fn parse_var<T>(name: &str, default: T) -> anyhow::Result<T>
where
    T: std::str::FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match env::var(name) {
        Ok(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{name} inválida: '{raw}'")),
        Err(_) => Ok(default),
    }
}

impl Config {
    /// Lê a configuração das variáveis de ambiente (o `.env` já deve ter sido carregado).
    pub fn from_env() -> anyhow::Result<Self> {
        let database_url = env::var("DATABASE_URL").context("DATABASE_URL deve ser definida")?;
        let jwt_secret = env::var("JWT_SECRET").context("JWT_SECRET deve ser definido")?;

        let smtp = match env::var("SMTP_HOST") {
            Ok(host) if !host.trim().is_empty() => Some(SmtpConfig {
                host,
                port: parse_var("SMTP_PORT", 587)?,
                username: env::var("SMTP_USERNAME").ok(),
                password: env::var("SMTP_PASSWORD").ok(),
                starttls: parse_var("SMTP_STARTTLS", true)?,
            }),
            _ => None,
        };

        Ok(Self {
            database_url,
            jwt_secret,
            bind_addr: var_or("BIND_ADDR", "0.0.0.0:3000"),
            db_max_connections: parse_var("DB_MAX_CONNECTIONS", 5)?,
            db_acquire_timeout: Duration::from_secs(parse_var("DB_ACQUIRE_TIMEOUT_SECS", 3)?),
            public_base_url: var_or("PUBLIC_BASE_URL", "http://localhost:3000")
                .trim_end_matches('/')
                .to_string(),
            mail_from: var_or("MAIL_FROM", "Salas de Reuniones <no-reply@localhost>"),
            smtp,
            superadmin: SuperadminSeed {
                username: var_or("SUPERADMIN_USERNAME", "superadmin"),
                email: var_or("SUPERADMIN_EMAIL", "superadmin@localhost"),
                password: var_or("SUPERADMIN_PASSWORD", "admin123"),
            },
        })
    }
}

// O estado compartilhado que será acessível em toda a aplicação.
// É o "contexto" explícito de cada requisição, junto com o AuthenticatedUser.
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub config: Arc<Config>,
    pub auth_service: AuthService,
    pub user_service: UserService,
    pub plant_service: PlantService,
    pub room_service: RoomService,
    pub booking_service: BookingService,
    pub mail_service: MailService,
}

impl AppState {
    pub async fn new(config: Config) -> anyhow::Result<Self> {
        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .acquire_timeout(config.db_acquire_timeout)
            .connect(&config.database_url)
            .await
            .context("Falha ao conectar ao banco de dados")?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        Self::from_pool(db_pool, config)
    }

    // --- Monta o gráfico de dependências ---
    pub fn from_pool(db_pool: PgPool, config: Config) -> anyhow::Result<Self> {
        let mail_service = MailService::new(&config)?;

        let user_repo = UserRepository::new(db_pool.clone());
        let plant_repo = PlantRepository::new(db_pool.clone());
        let room_repo = RoomRepository::new(db_pool.clone());
        let meeting_repo = MeetingRepository::new(db_pool.clone());

        let auth_service = AuthService::new(
            user_repo.clone(),
            mail_service.clone(),
            config.jwt_secret.clone(),
            config.public_base_url.clone(),
            db_pool.clone(),
        );
        let user_service = UserService::new(user_repo, db_pool.clone());
        let plant_service = PlantService::new(plant_repo.clone(), db_pool.clone());
        let room_service = RoomService::new(room_repo.clone(), plant_repo, db_pool.clone());
        let booking_service = BookingService::new(
            meeting_repo,
            room_repo,
            mail_service.clone(),
            db_pool.clone(),
        );

        Ok(Self {
            db_pool,
            config: Arc::new(config),
            auth_service,
            user_service,
            plant_service,
            room_service,
            booking_service,
            mail_service,
        })
    }
}
