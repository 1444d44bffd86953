// src/services/room_service.rs

use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{PlantRepository, RoomRepository},
    models::room::{Room, RoomDetail, RoomPayload},
};

#[derive(Clone)]
pub struct RoomService {
    repo: RoomRepository,
    plant_repo: PlantRepository,
    pool: PgPool,
}

impl RoomService {
    pub fn new(repo: RoomRepository, plant_repo: PlantRepository, pool: PgPool) -> Self {
        Self { repo, plant_repo, pool }
    }

    pub async fn list_rooms(&self, plant_id: Option<Uuid>) -> Result<Vec<RoomDetail>, AppError> {
        self.repo.list(plant_id).await
    }

    pub async fn get_room(&self, id: Uuid) -> Result<Room, AppError> {
        self.repo
            .find_by_id(&self.pool, id)
            .await?
            .ok_or(AppError::RoomNotFound)
    }

    pub async fn create_room(&self, payload: &RoomPayload) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        // Toda sala pertence a exatamente uma planta existente
        if self.plant_repo.find_by_id(&mut *tx, payload.plant_id).await?.is_none() {
            return Err(AppError::PlantNotFound);
        }

        let room = self
            .repo
            .create_room(
                &mut *tx,
                payload.name.trim(),
                payload.description.as_deref(),
                payload.capacity,
                payload.plant_id,
            )
            .await?;

        tx.commit().await?;

        tracing::info!(room_id = %room.id, plant_id = %room.plant_id, "sala criada");
        Ok(room)
    }

    pub async fn update_room(&self, id: Uuid, payload: &RoomPayload) -> Result<Room, AppError> {
        let mut tx = self.pool.begin().await?;

        if self.plant_repo.find_by_id(&mut *tx, payload.plant_id).await?.is_none() {
            return Err(AppError::PlantNotFound);
        }

        let room = self
            .repo
            .update_room(
                &mut *tx,
                id,
                payload.name.trim(),
                payload.description.as_deref(),
                payload.capacity,
                payload.plant_id,
            )
            .await?
            .ok_or(AppError::RoomNotFound)?;

        tx.commit().await?;
        Ok(room)
    }

    /// Remove a sala; falha se ainda houver reuniões nela.
    pub async fn delete_room(&self, id: Uuid) -> Result<(), AppError> {
        let mut tx = self.pool.begin().await?;

        if self.repo.find_by_id(&mut *tx, id).await?.is_none() {
            return Err(AppError::RoomNotFound);
        }

        if self.repo.count_meetings(&mut *tx, id).await? > 0 {
            return Err(AppError::RoomHasMeetings);
        }

        self.repo.delete_room(&mut *tx, id).await?;
        tx.commit().await?;

        tracing::info!(room_id = %id, "sala excluída");
        Ok(())
    }
}
