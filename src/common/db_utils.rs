// src/common/db_utils.rs

use crate::common::error::AppError;

// ---
// Helper: traduz violações de constraint do Postgres em erros de domínio
// ---
/// Olha o nome da constraint violada e devolve o `AppError` correspondente.
/// Qualquer outro erro vira `AppError::DatabaseError`.
pub(crate) fn map_db_error(e: sqlx::Error) -> AppError {
    let mapped = match &e {
        sqlx::Error::Database(db_err) if db_err.is_unique_violation() => {
            Some(match db_err.constraint() {
                Some("users_username_key") => AppError::UsernameAlreadyExists,
                Some("users_email_key") => AppError::EmailAlreadyExists,
                Some("plants_name_key") => AppError::PlantNameAlreadyExists,
                Some("rooms_name_key") => AppError::RoomNameAlreadyExists,
                // A garantia final contra reservas duplicadas concorrentes
                Some("meetings_room_date_slot_key") => AppError::SlotConflict,
                Some(other) => AppError::UniqueConstraintViolation(other.to_string()),
                None => AppError::UniqueConstraintViolation("unknown".into()),
            })
        }
        // FK violada ao remover: o guard da aplicação perdeu a corrida
        sqlx::Error::Database(db_err) if db_err.is_foreign_key_violation() => {
            match db_err.constraint() {
                Some("meetings_room_id_fkey") => Some(AppError::RoomHasMeetings),
                Some("rooms_plant_id_fkey") => Some(AppError::PlantHasRooms),
                _ => None,
            }
        }
        _ => None,
    };

    mapped.unwrap_or_else(|| e.into())
}
