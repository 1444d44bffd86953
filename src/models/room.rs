// src/models/room.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::validation::not_blank;

// ---
// Sala (o espaço reservável, sempre dentro de uma planta)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Room {
    pub id: Uuid,
    #[schema(example = "Sala A")]
    pub name: String,
    pub description: Option<String>,
    #[schema(example = 12)]
    pub capacity: i32,
    pub plant_id: Uuid,
    pub created_at: DateTime<Utc>,
}

// Sala com o nome da planta (listagem e selects dependentes)
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub room: Room,
    pub plant_name: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RoomPayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "El nombre de la sala es requerido (máx. 100 caracteres).")
    )]
    #[schema(example = "Sala A")]
    pub name: String,

    #[validate(length(max = 300, message = "Máximo 300 caracteres."))]
    pub description: Option<String>,

    #[validate(range(min = 1, max = 1000, message = "La capacidad debe ser entre 1 y 1000."))]
    #[schema(example = 12)]
    pub capacity: i32,

    pub plant_id: Uuid,
}

// ?plantId=... para popular o select de salas a partir da planta
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct RoomFilter {
    pub plant_id: Option<Uuid>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_name_is_rejected() {
        let payload = RoomPayload {
            name: "  ".into(),
            description: None,
            capacity: 10,
            plant_id: Uuid::new_v4(),
        };
        assert!(payload.validate().unwrap_err().field_errors().contains_key("name"));
    }

    #[test]
    fn capacity_must_be_between_1_and_1000() {
        let mut payload = RoomPayload {
            name: "Sala A".into(),
            description: None,
            capacity: 0,
            plant_id: Uuid::new_v4(),
        };
        assert!(payload.validate().is_err());
        payload.capacity = 1001;
        assert!(payload.validate().is_err());
        payload.capacity = 1000;
        assert!(payload.validate().is_ok());
    }
}
