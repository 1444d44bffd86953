// src/db/plant_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::plant::{Plant, PlantSummary},
};

#[derive(Clone)]
pub struct PlantRepository {
    pool: PgPool,
}

impl PlantRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn list_with_room_count(&self) -> Result<Vec<PlantSummary>, AppError> {
        let plants = sqlx::query_as::<_, PlantSummary>(
            r#"
            SELECT p.id, p.name, p.description, p.created_by, p.created_at,
                   COUNT(r.id) AS room_count
            FROM plants p
            LEFT JOIN rooms r ON r.plant_id = p.id
            GROUP BY p.id
            ORDER BY p.name
            "#,
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(plants)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Plant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let plant = sqlx::query_as::<_, Plant>(
            "SELECT id, name, description, created_by, created_at FROM plants WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(plant)
    }

    pub async fn create_plant<'e, E>(
        &self,
        executor: E,
        name: &str,
        description: Option<&str>,
        created_by: Uuid,
    ) -> Result<Plant, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Plant>(
            r#"
            INSERT INTO plants (name, description, created_by)
            VALUES ($1, $2, $3)
            RETURNING id, name, description, created_by, created_at
            "#,
        )
        .bind(name)
        .bind(description)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn update_plant<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        name: &str,
        description: Option<&str>,
    ) -> Result<Option<Plant>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Plant>(
            r#"
            UPDATE plants SET name = $2, description = $3
            WHERE id = $1
            RETURNING id, name, description, created_by, created_at
            "#,
        )
        .bind(id)
        .bind(name)
        .bind(description)
        .fetch_optional(executor)
        .await
        .map_err(map_db_error)
    }

    pub async fn count_rooms<'e, E>(&self, executor: E, plant_id: Uuid) -> Result<i64, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM rooms WHERE plant_id = $1")
            .bind(plant_id)
            .fetch_one(executor)
            .await?;
        Ok(count)
    }

    pub async fn delete_plant<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM plants WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await
            .map_err(map_db_error)?;
        Ok(result.rows_affected() > 0)
    }
}
