// src/db/room_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::room::{Room, RoomDetail},
};

#[derive(Clone)]
pub struct RoomRepository {
    pool: PgPool,
}

impl RoomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Lista as salas (opcionalmente de uma planta só), já com o nome da planta
    pub async fn list(&self, plant_id: Option<Uuid>) -> Result<Vec<RoomDetail>, AppError> {
        let rooms = sqlx::query_as::<_, RoomDetail>(
            r#"
            SELECT r.id, r.name, r.description, r.capacity, r.plant_id, r.created_at,
                   p.name AS plant_name
            FROM rooms r
            JOIN plants p ON p.id = r.plant_id
            WHERE ($1::uuid IS NULL OR r.plant_id = $1)
            ORDER BY p.name, r.name
            "#,
        )
        .bind(plant_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rooms)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let room = sqlx::query_as::<_, Room>(
            "SELECT id, name, description, capacity, plant_id, created_at FROM rooms WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(room)
    }

    pub async fn create_room<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        capacity: i32,
        plant_id: Uuid,
    ) -> Result<Room, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Room>(
            r#"
            INSERT INTO rooms (name, description, capacity, plant_id)
            VALUES ($1, $2, $3, $4)
            RETURNING id, name, description, capacity, plant_id, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(capacity)
        .bind(plant_id)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_room<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
        capacity: i32,
        plant_id: Uuid,
    ) -> Result<Option<Room>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Room>(
            r#"
            UPDATE rooms
            SET name = $2, description = $3, capacity = $4, plant_id = $5
            WHERE id = $1
            RETURNING id, name, description, capacity, plant_id, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .bind(capacity)
        .bind(plant_id)
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn count_meetings<'e, E>(&self, executor: E, room_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM meetings WHERE room_id = $1")
            .bind(room_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn delete_room<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM rooms WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}
