//src/main.rs

use anyhow::Context;
use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::{AppState, Config};
use crate::docs::ApiDoc;
use crate::middleware::auth::auth_guard;

/// Monta todas as rotas. As escritas são POST (`/{id}/update`, `/{id}/delete`).
pub fn build_router(app_state: AppState) -> Router {
    // Rotas de autenticação (públicas)
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/login", post(handlers::auth::login))
        .route("/forgot-password", post(handlers::auth::forgot_password))
        .route(
            "/reset-password/{token}",
            get(handlers::auth::check_reset_token).post(handlers::auth::reset_password),
        )
        .merge(
            Router::new()
                .route("/logout", post(handlers::auth::logout))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Usuários: /me para todos, o resto exige superadmin (checado no handler)
    let user_routes = Router::new()
        .route("/me", get(handlers::auth::get_me))
        .route(
            "/",
            get(handlers::users::list_users).post(handlers::users::create_user),
        )
        .route("/{id}", get(handlers::users::get_user))
        .route("/{id}/update", post(handlers::users::update_user))
        .route("/{id}/delete", post(handlers::users::delete_user))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let plant_routes = Router::new()
        .route(
            "/",
            get(handlers::plants::list_plants).post(handlers::plants::create_plant),
        )
        .route("/{id}", get(handlers::plants::get_plant))
        .route("/{id}/update", post(handlers::plants::update_plant))
        .route("/{id}/delete", post(handlers::plants::delete_plant))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let room_routes = Router::new()
        .route(
            "/",
            get(handlers::rooms::list_rooms).post(handlers::rooms::create_room),
        )
        .route("/{id}", get(handlers::rooms::get_room))
        .route("/{id}/update", post(handlers::rooms::update_room))
        .route("/{id}/delete", post(handlers::rooms::delete_room))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    let meeting_routes = Router::new()
        .route(
            "/",
            get(handlers::meetings::list_meetings).post(handlers::meetings::create_meeting),
        )
        .route("/time-slots", get(handlers::meetings::list_time_slots))
        .route("/availability", get(handlers::meetings::availability))
        .route("/{id}", get(handlers::meetings::get_meeting))
        .route("/{id}/update", post(handlers::meetings::update_meeting))
        .route("/{id}/delete", post(handlers::meetings::delete_meeting))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Combina tudo no router principal
    Router::new()
        .route("/api/health", get(handlers::auth::health))
        .nest("/api/auth", auth_routes)
        .nest("/api/users", user_routes)
        .nest("/api/plants", plant_routes)
        .nest("/api/rooms", room_routes)
        .nest("/api/meetings", meeting_routes)
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .with_state(app_state)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // RUST_LOG manda; sem ele, nível info
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .compact()
        .init();

    // Configuração inválida aborta a subida
    let config = Config::from_env()?;
    let app_state = AppState::new(config).await?;

    // Faz o app rodar as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .context("Falha ao rodar as migrações do banco de dados")?;

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    app_state
        .auth_service
        .ensure_superadmin(&app_state.config.superadmin)
        .await
        .context("Falha ao criar o Super Admin")?;

    let bind_addr = app_state.config.bind_addr.clone();
    let app = build_router(app_state);

    let listener = TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("Falha ao iniciar o listener TCP em {bind_addr}"))?;
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr()?);
    tracing::info!("📚 Documentação em /swagger-ui");

    axum::serve(listener, app).await.context("Erro no servidor Axum")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{
        body::Body,
        http::{header, Request, StatusCode},
    };
    use tower::ServiceExt;

    use crate::config::test_support::lazy_state;

    async fn status_of(request: Request<Body>) -> StatusCode {
        let app = build_router(lazy_state());
        app.oneshot(request).await.unwrap().status()
    }

    #[tokio::test]
    async fn health_is_public() {
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    #[tokio::test]
    async fn health_reports_the_mail_mode() {
        let app = build_router(lazy_state());
        let request = Request::get("/api/health").body(Body::empty()).unwrap();
        let response = app.oneshot(request).await.unwrap();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        // Configuração de teste não tem SMTP
        assert_eq!(body, serde_json::json!({ "status": "ok", "mail": "log" }));
    }

    #[tokio::test]
    async fn meetings_require_a_token() {
        let request = Request::get("/api/meetings").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn malformed_token_is_rejected() {
        let request = Request::post("/api/meetings/00000000-0000-0000-0000-000000000000/delete")
            .header(header::AUTHORIZATION, "Bearer nao-e-um-jwt")
            .body(Body::empty())
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn invalid_registration_is_a_bad_request() {
        let request = Request::post("/api/auth/register")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(r#"{"username":"a","email":"nope","password":"1"}"#))
            .unwrap();
        assert_eq!(status_of(request).await, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn openapi_document_is_served() {
        let request = Request::get("/api-docs/openapi.json").body(Body::empty()).unwrap();
        assert_eq!(status_of(request).await, StatusCode::OK);
    }

    async fn forgot_password_response(app: Router, email: &str) -> (StatusCode, serde_json::Value) {
        let request = Request::post("/api/auth/forgot-password")
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(serde_json::json!({ "email": email }).to_string()))
            .unwrap();
        let response = app.oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn forgot_password_does_not_reveal_accounts_when_smtp_fails(pool: sqlx::PgPool) {
        use crate::config::test_support::{failing_smtp_config, state_with_config};

        let state = state_with_config(pool.clone(), failing_smtp_config());
        let (_, maria) = state
            .auth_service
            .register_user("maria", "maria@example.com", "segredo1")
            .await
            .unwrap();
        let app = build_router(state);

        let known = forgot_password_response(app.clone(), "maria@example.com").await;
        let unknown = forgot_password_response(app, "ninguem@example.com").await;

        assert_eq!(known.0, StatusCode::OK);
        assert_eq!(known, unknown);
        assert!(known.1.get("warning").is_none());

        // O token foi emitido mesmo com o envio falhando
        let token: Option<String> = sqlx::query_scalar("SELECT reset_token FROM users WHERE id = $1")
            .bind(maria.id)
            .fetch_one(&pool)
            .await
            .unwrap();
        assert!(token.is_some());
    }
}
