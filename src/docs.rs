// src/docs.rs

use utoipa::OpenApi;
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        handlers::auth::health,

        // --- Auth ---
        handlers::auth::register,
        handlers::auth::login,
        handlers::auth::logout,
        handlers::auth::forgot_password,
        handlers::auth::check_reset_token,
        handlers::auth::reset_password,

        // --- Users ---
        handlers::auth::get_me,
        handlers::users::list_users,
        handlers::users::get_user,
        handlers::users::create_user,
        handlers::users::update_user,
        handlers::users::delete_user,

        // --- Plants ---
        handlers::plants::list_plants,
        handlers::plants::get_plant,
        handlers::plants::create_plant,
        handlers::plants::update_plant,
        handlers::plants::delete_plant,

        // --- Rooms ---
        handlers::rooms::list_rooms,
        handlers::rooms::get_room,
        handlers::rooms::create_room,
        handlers::rooms::update_room,
        handlers::rooms::delete_room,

        // --- Meetings ---
        handlers::meetings::list_meetings,
        handlers::meetings::list_time_slots,
        handlers::meetings::availability,
        handlers::meetings::get_meeting,
        handlers::meetings::create_meeting,
        handlers::meetings::update_meeting,
        handlers::meetings::delete_meeting,
    ),
    components(
        schemas(
            // --- Auth ---
            models::auth::Role,
            models::auth::User,
            models::auth::RegisterUserPayload,
            models::auth::LoginUserPayload,
            models::auth::ForgotPasswordPayload,
            models::auth::ResetPasswordPayload,
            models::auth::AuthResponse,

            // --- Users ---
            models::user::CreateUserPayload,
            models::user::UpdateUserPayload,

            // --- Plants / Rooms ---
            models::plant::Plant,
            models::plant::PlantSummary,
            models::plant::PlantPayload,
            models::room::Room,
            models::room::RoomDetail,
            models::room::RoomPayload,

            // --- Meetings ---
            models::meeting::Meeting,
            models::meeting::MeetingDetail,
            models::meeting::MeetingPayload,
            models::meeting::Availability,
        )
    ),
    tags(
        (name = "Health", description = "Verificação do serviço"),
        (name = "Auth", description = "Login, registro e redefinição de senha"),
        (name = "Users", description = "Perfil e gestão de contas (superadmin)"),
        (name = "Plants", description = "Plantas (locais que agrupam salas)"),
        (name = "Rooms", description = "Salas de reunião"),
        (name = "Meetings", description = "Reservas por sala, data e horário")
    ),
    modifiers(&SecurityAddon)
)]
pub struct ApiDoc;

struct SecurityAddon;

impl utoipa::Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "api_jwt",
            SecurityScheme::Http(
                Http::new(HttpAuthScheme::Bearer)
            ),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn openapi_lists_booking_routes_and_jwt_scheme() {
        let doc = ApiDoc::openapi();
        assert!(doc.paths.paths.contains_key("/api/meetings"));
        assert!(doc.paths.paths.contains_key("/api/meetings/{id}/update"));
        assert!(doc.paths.paths.contains_key("/api/auth/reset-password/{token}"));
        let components = doc.components.expect("components");
        assert!(components.security_schemes.contains_key("api_jwt"));
    }
}
