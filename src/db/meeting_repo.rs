// src/db/meeting_repo.rs

use chrono::NaiveDate;
use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::{db_utils::map_db_error, error::AppError},
    models::meeting::{Meeting, MeetingDetail, TimeSlot},
};

const MEETING_COLUMNS: &str = r#"
    m.id, m.room_id, m.date, m.time_slot, m.leader, m.leader_email,
    m.subject, m.remarks, m.created_by, m.created_at
"#;

// Na gravação de uma reunião, a FK de room_id só falha se a sala sumiu
// (ex.: excluída entre a checagem e o INSERT); fora daqui ela indica sala em uso.
fn map_write_error(e: sqlx::Error) -> AppError {
    if let sqlx::Error::Database(db_err) = &e {
        if db_err.is_foreign_key_violation() && db_err.constraint() == Some("meetings_room_id_fkey") {
            return AppError::RoomNotFound;
        }
    }
    map_db_error(e)
}

// Campos gravados em create/update
pub struct MeetingRecord<'a> {
    pub room_id: Uuid,
    pub date: NaiveDate,
    pub time_slot: TimeSlot,
    pub leader: &'a str,
    pub leader_email: &'a str,
    pub subject: &'a str,
    pub remarks: Option<&'a str>,
}

#[derive(Clone)]
pub struct MeetingRepository {
    pool: PgPool,
}

impl MeetingRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Procura uma reunião que já ocupe (sala, data, horário).
    /// Na edição, `exclude_id` tira a própria reunião da busca.
    pub async fn find_conflict<'e, E>(
        &self,
        executor: E,
        room_id: Uuid,
        date: NaiveDate,
        time_slot: TimeSlot,
        exclude_id: Option<Uuid>,
    ) -> Result<Option<Uuid>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let existing: Option<Uuid> = sqlx::query_scalar(
            r#"
            SELECT id FROM meetings
            WHERE room_id = $1 AND date = $2 AND time_slot = $3
              AND ($4::uuid IS NULL OR id <> $4)
            LIMIT 1
            "#,
        )
        .bind(room_id)
        .bind(date)
        .bind(time_slot.label())
        .bind(exclude_id)
        .fetch_optional(executor)
        .await?;
        Ok(existing)
    }

    pub async fn create_meeting<'e, E>(
        &self,
        executor: E,
        record: &MeetingRecord<'_>,
        created_by: Uuid,
    ) -> Result<Meeting, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Meeting>(
            r#"
            INSERT INTO meetings AS m
                (room_id, date, time_slot, leader, leader_email, subject, remarks, created_by)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING m.id, m.room_id, m.date, m.time_slot, m.leader, m.leader_email,
                      m.subject, m.remarks, m.created_by, m.created_at
            "#,
        )
        .bind(record.room_id)
        .bind(record.date)
        .bind(record.time_slot.label())
        .bind(record.leader)
        .bind(record.leader_email)
        .bind(record.subject)
        .bind(record.remarks)
        .bind(created_by)
        .fetch_one(executor)
        .await
        .map_err(map_write_error)
    }

    pub async fn update_meeting<'e, E>(
        &self,
        executor: E,
        id: Uuid,
        record: &MeetingRecord<'_>,
    ) -> Result<Option<Meeting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Meeting>(
            r#"
            UPDATE meetings AS m
            SET room_id = $2, date = $3, time_slot = $4, leader = $5,
                leader_email = $6, subject = $7, remarks = $8
            WHERE m.id = $1
            RETURNING m.id, m.room_id, m.date, m.time_slot, m.leader, m.leader_email,
                      m.subject, m.remarks, m.created_by, m.created_at
            "#,
        )
        .bind(id)
        .bind(record.room_id)
        .bind(record.date)
        .bind(record.time_slot.label())
        .bind(record.leader)
        .bind(record.leader_email)
        .bind(record.subject)
        .bind(record.remarks)
        .fetch_optional(executor)
        .await
        .map_err(map_write_error)
    }

    pub async fn delete_meeting<'e, E>(&self, executor: E, id: Uuid) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query("DELETE FROM meetings WHERE id = $1")
            .bind(id)
            .execute(executor)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    pub async fn find_by_id<'e, E>(&self, executor: E, id: Uuid) -> Result<Option<Meeting>, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let meeting = sqlx::query_as::<_, Meeting>(&format!(
            "SELECT {MEETING_COLUMNS} FROM meetings m WHERE m.id = $1"
        ))
        .bind(id)
        .fetch_optional(executor)
        .await?;
        Ok(meeting)
    }

    pub async fn find_detail(&self, id: Uuid) -> Result<Option<MeetingDetail>, AppError> {
        let meeting = sqlx::query_as::<_, MeetingDetail>(&format!(
            r#"
            SELECT {MEETING_COLUMNS},
                   r.name AS room_name, p.id AS plant_id, p.name AS plant_name,
                   u.username AS created_by_username
            FROM meetings m
            JOIN rooms r ON r.id = m.room_id
            JOIN plants p ON p.id = r.plant_id
            LEFT JOIN users u ON u.id = m.created_by
            WHERE m.id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(meeting)
    }

    /// Listagem de um dia com filtros opcionais de planta, sala e criador.
    /// A ordenação por horário é feita em Rust (a ordem alfabética dos rótulos
    /// colocaria "10:00-10:30" antes de "8:00-8:30").
    pub async fn list_for_day(
        &self,
        date: NaiveDate,
        plant_id: Option<Uuid>,
        room_id: Option<Uuid>,
        created_by: Option<Uuid>,
    ) -> Result<Vec<MeetingDetail>, AppError> {
        let mut meetings = sqlx::query_as::<_, MeetingDetail>(&format!(
            r#"
            SELECT {MEETING_COLUMNS},
                   r.name AS room_name, p.id AS plant_id, p.name AS plant_name,
                   u.username AS created_by_username
            FROM meetings m
            JOIN rooms r ON r.id = m.room_id
            JOIN plants p ON p.id = r.plant_id
            LEFT JOIN users u ON u.id = m.created_by
            WHERE m.date = $1
              AND ($2::uuid IS NULL OR p.id = $2)
              AND ($3::uuid IS NULL OR r.id = $3)
              AND ($4::uuid IS NULL OR m.created_by = $4)
            "#
        ))
        .bind(date)
        .bind(plant_id)
        .bind(room_id)
        .bind(created_by)
        .fetch_all(&self.pool)
        .await?;

        meetings.sort_by(|a, b| {
            (a.meeting.time_slot, &a.room_name).cmp(&(b.meeting.time_slot, &b.room_name))
        });
        Ok(meetings)
    }

    // Horários já ocupados de uma sala num dia
    pub async fn booked_slots(&self, room_id: Uuid, date: NaiveDate) -> Result<Vec<TimeSlot>, AppError> {
        let labels: Vec<String> = sqlx::query_scalar(
            "SELECT time_slot FROM meetings WHERE room_id = $1 AND date = $2",
        )
        .bind(room_id)
        .bind(date)
        .fetch_all(&self.pool)
        .await?;

        let mut slots: Vec<TimeSlot> = labels
            .into_iter()
            .filter_map(|label| TimeSlot::parse(&label))
            .collect();
        slots.sort();
        Ok(slots)
    }
}
