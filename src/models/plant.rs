// src/models/plant.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::validation::not_blank;

// ---
// Planta (o local físico que agrupa salas)
// ---
#[derive(Debug, Clone, Serialize, Deserialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: Uuid,
    #[schema(example = "Planta Norte")]
    pub name: String,
    pub description: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Planta + quantidade de salas, para a tela de gestão
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummary {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub plant: Plant,
    pub room_count: i64,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PlantPayload {
    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "El nombre es requerido (máx. 100 caracteres).")
    )]
    #[schema(example = "Planta Norte")]
    pub name: String,

    #[validate(length(max = 300, message = "Máximo 300 caracteres."))]
    pub description: Option<String>,
}
