// src/services/plant_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::PlantRepository,
    models::plant::{Plant, PlantPayload, PlantSummary},
};

#[derive(Clone)]
pub struct PlantService {
    repo: PlantRepository,
    pool: PgPool,
}

impl PlantService {
    pub fn new(repo: PlantRepository, pool: PgPool) -> Self {
        Self { repo, pool }
    }

    pub async fn list_plants(&self) -> Result<Vec<PlantSummary>, AppError> {
        self.repo.list_with_room_count().await
    }

    pub async fn get_plant(&self, id: Uuid) -> Result<Plant, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::PlantNotFound)
    }

    pub async fn create_plant(&self, payload: &PlantPayload, created_by: Uuid) -> Result<Plant, AppError> {
        let plant = self
            .repo
            .create_plant(
                &self.pool,
                payload.name.trim(),
                payload.description.as_deref(),
                created_by,
            )
            .await?;

        tracing::info!(plant_id = %plant.id, "planta criada");
        Ok(plant)
    }

    pub async fn update_plant(&self, id: Uuid, payload: &PlantPayload) -> Result<Plant, AppError> {
        self.repo
            .update_plant(&self.pool, id, payload.name.trim(), payload.description.as_deref())
            .await?
            .ok_or(AppError::PlantNotFound)
    }

    /// Remove a planta; falha se ainda houver salas ligadas a ela.
    pub async fn delete_plant(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if self.repo.find_by_id(&mut *tx, id).await?.is_none() {
            return Err(AppError::PlantNotFound);
        }

        if self.repo.count_rooms(&mut *tx, id).await? > 0 {
            return Err(AppError::PlantHasRooms);
        }

        // A FK com ON DELETE RESTRICT cobre uma sala criada depois da contagem
        self.repo.delete_plant(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(plant_id = %id, "planta excluída");
        Ok(())
    }
}
