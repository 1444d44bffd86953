// src/services/booking_service.rs

use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{MeetingRecord, MeetingRepository, RoomRepository},
    models::{
        auth::User,
        meeting::{Availability, Meeting, MeetingDetail, MeetingFilter, MeetingPayload, TimeSlot},
    },
    services::mail_service::{self, MailService},
};

const MAIL_WARNING: &str = "La operación se realizó, pero no se pudo enviar el correo de notificación.";

/// Reservas no passado nunca são aceitas (criação ou edição).
pub fn ensure_not_past(date: NaiveDate, today: NaiveDate) -> Result<(), AppError> {
    if date < today {
        return Err(AppError::PastDate);
    }
    Ok(())
}

/// Só quem criou a reunião (ou um superadmin) pode editá-la ou excluí-la.
pub fn can_modify(meeting: &Meeting, user: &User) -> bool {
    user.role.is_superadmin() || meeting.created_by == Some(user.id)
}

fn record_from(payload: &MeetingPayload, time_slot: TimeSlot) -> MeetingRecord<'_> {
    MeetingRecord {
        room_id: payload.room_id,
        date: payload.date,
        time_slot,
        leader: payload.leader.trim(),
        leader_email: payload.leader_email.trim(),
        subject: payload.subject.trim(),
        remarks: payload
            .remarks
            .as_deref()
            .map(str::trim)
            .filter(|r| !r.is_empty()),
    }
}

#[derive(Clone)]
pub struct BookingService {
    meeting_repo: MeetingRepository,
    room_repo: RoomRepository,
    mail_service: MailService,
    pool: PgPool,
}

impl BookingService {
    pub fn new(
        meeting_repo: MeetingRepository,
        room_repo: RoomRepository,
        mail_service: MailService,
        pool: PgPool,
    ) -> Self {
        Self { meeting_repo, room_repo, mail_service, pool }
    }

    pub fn time_slots(&self) -> Vec<TimeSlot> {
        TimeSlot::all().collect()
    }

    pub async fn list_meetings(
        &self,
        filter: &MeetingFilter,
        user: &User,
        today: NaiveDate,
    ) -> Result<Vec<MeetingDetail>, AppError> {
        let created_by = filter.mine.then_some(user.id);
        self.meeting_repo
            .list_for_day(filter.date.unwrap_or(today), filter.plant_id, filter.room_id, created_by)
            .await
    }

    pub async fn get_meeting(&self, id: Uuid) -> Result<MeetingDetail, AppError> {
        self.meeting_repo
            .find_detail(id)
            .await?
            .ok_or(AppError::MeetingNotFound)
    }

    pub async fn availability(&self, room_id: Uuid, date: NaiveDate) -> Result<Availability, AppError> {
        if self.room_repo.find_by_id(&self.pool, room_id).await?.is_none() {
            return Err(AppError::RoomNotFound);
        }

        let booked_slots = self.meeting_repo.booked_slots(room_id, date).await?;
        let free_slots = TimeSlot::all()
            .filter(|slot| !booked_slots.contains(slot))
            .collect();

        Ok(Availability { room_id, date, free_slots, booked_slots })
    }

    /// Cria a reserva. Devolve a reunião e, se o e-mail falhar, o aviso.
    pub async fn create_meeting(
        &self,
        payload: &MeetingPayload,
        user: &User,
        today: NaiveDate,
    ) -> Result<(Meeting, Option<String>), AppError> {
        let time_slot = payload
            .slot()
            .map_err(|e| AppError::InvalidTimeSlot(e.0))?;
        ensure_not_past(payload.date, today)?;

        let mut tx = self.pool.begin().await?;

        let room = self
            .room_repo
            .find_by_id(&mut *tx, payload.room_id)
            .await?
            .ok_or(AppError::RoomNotFound)?;

        if self
            .meeting_repo
            .find_conflict(&mut *tx, payload.room_id, payload.date, time_slot, None)
            .await?
            .is_some()
        {
            return Err(AppError::SlotConflict);
        }

        // Se outra reserva entrar entre a checagem e o INSERT, a constraint
        // meetings_room_date_slot_key devolve o mesmo SlotConflict
        let record = record_from(payload, time_slot);
        let meeting = self.meeting_repo.create_meeting(&mut *tx, &record, user.id).await?;
        tx.commit().await?;

        tracing::info!(
            meeting_id = %meeting.id,
            room_id = %meeting.room_id,
            date = %meeting.date,
            slot = %meeting.time_slot,
            "reunião reservada"
        );

        let email = mail_service::booking_confirmation(&meeting, &room.name, &user.username);
        let warning = self.mail_service.send_best_effort(&email, MAIL_WARNING).await;

        Ok((meeting, warning))
    }

    pub async fn update_meeting(
        &self,
        id: Uuid,
        payload: &MeetingPayload,
        user: &User,
        today: NaiveDate,
    ) -> Result<(Meeting, Option<String>), AppError> {
        let time_slot = payload
            .slot()
            .map_err(|e| AppError::InvalidTimeSlot(e.0))?;

        let mut tx = self.pool.begin().await?;

        let existing = self
            .meeting_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::MeetingNotFound)?;

        if !can_modify(&existing, user) {
            return Err(AppError::Forbidden);
        }

        ensure_not_past(payload.date, today)?;

        let room = self
            .room_repo
            .find_by_id(&mut *tx, payload.room_id)
            .await?
            .ok_or(AppError::RoomNotFound)?;

        // A própria reunião não conta como conflito
        if self
            .meeting_repo
            .find_conflict(&mut *tx, payload.room_id, payload.date, time_slot, Some(id))
            .await?
            .is_some()
        {
            return Err(AppError::SlotConflict);
        }

        let record = record_from(payload, time_slot);
        let meeting = self
            .meeting_repo
            .update_meeting(&mut *tx, id, &record)
            .await?
            .ok_or(AppError::MeetingNotFound)?;
        tx.commit().await?;

        tracing::info!(meeting_id = %meeting.id, slot = %meeting.time_slot, "reunião alterada");

        let email = mail_service::booking_updated(&meeting, &room.name, &user.username);
        let warning = self.mail_service.send_best_effort(&email, MAIL_WARNING).await;

        Ok((meeting, warning))
    }

    pub async fn delete_meeting(&self, id: Uuid, user: &User) -> Result<Option<String>, AppError> {
        let mut tx = self.pool.begin().await?;

        let meeting = self
            .meeting_repo
            .find_by_id(&mut *tx, id)
            .await?
            .ok_or(AppError::MeetingNotFound)?;

        if !can_modify(&meeting, user) {
            return Err(AppError::Forbidden);
        }

        let room_name = self
            .room_repo
            .find_by_id(&mut *tx, meeting.room_id)
            .await?
            .map(|room| room.name)
            .unwrap_or_default();

        if !self.meeting_repo.delete_meeting(&mut *tx, id).await? {
            return Err(AppError::MeetingNotFound);
        }
        tx.commit().await?;

        tracing::info!(meeting_id = %id, by = %user.id, "reunião excluída");

        let email = mail_service::booking_cancelled(&meeting, &room_name, &user.username);
        Ok(self.mail_service.send_best_effort(&email, MAIL_WARNING).await)
    }
}


// Testes contra um Postgres real; rodar com `cargo test -- --ignored`
#[cfg(test)]
mod db_tests {
    use super::*;
    use crate::{
        config::test_support::{failing_smtp_config, state_with_config, state_with_pool},
        models::{auth::Role, plant::PlantPayload, room::RoomPayload},
        services::auth::hash_password,
    };
    use chrono::{Days, Local};

    struct Fixture {
        state: crate::config::AppState,
        user: User,
        room_id: Uuid,
        plant_id: Uuid,
        today: NaiveDate,
    }

    async fn fixture(pool: PgPool) -> Fixture {
        fixture_with(state_with_pool(pool)).await
    }

    async fn fixture_with(state: crate::config::AppState) -> Fixture {
        let hash = hash_password("segredo1").await.unwrap();
        let user = crate::db::UserRepository::new(state.db_pool.clone())
            .create_user(&state.db_pool, "juan", "juan@example.com", &hash, Role::User)
            .await
            .unwrap();

        let plant = state
            .plant_service
            .create_plant(&PlantPayload { name: "Planta Norte".into(), description: None }, user.id)
            .await
            .unwrap();
        let room = state
            .room_service
            .create_room(&RoomPayload {
                name: "A".into(),
                description: None,
                capacity: 10,
                plant_id: plant.id,
            })
            .await
            .unwrap();

        Fixture {
            state,
            user,
            room_id: room.id,
            plant_id: plant.id,
            today: Local::now().date_naive(),
        }
    }

    fn payload(room_id: Uuid, date: NaiveDate, slot: &str) -> MeetingPayload {
        MeetingPayload {
            date,
            room_id,
            time_slot: slot.into(),
            leader: "Carla".into(),
            leader_email: "carla@example.com".into(),
            subject: "Planeación".into(),
            remarks: None,
        }
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn double_booking_scenario(pool: PgPool) {
        let f = fixture(pool).await;
        let booking = &f.state.booking_service;
        let date = f.today.checked_add_days(Days::new(7)).unwrap();

        let (first, warning) = booking
            .create_meeting(&payload(f.room_id, date, "9:00-9:30"), &f.user, f.today)
            .await
            .unwrap();
        assert!(warning.is_none());

        let again = booking
            .create_meeting(&payload(f.room_id, date, "9:00-9:30"), &f.user, f.today)
            .await;
        assert!(matches!(again, Err(AppError::SlotConflict)));

        // Editar para o mesmo triplo que já ocupa é permitido
        booking
            .update_meeting(first.id, &payload(f.room_id, date, "9:00-9:30"), &f.user, f.today)
            .await
            .unwrap();

        let (moved, _) = booking
            .update_meeting(first.id, &payload(f.room_id, date, "9:30-10:00"), &f.user, f.today)
            .await
            .unwrap();
        assert_eq!(moved.time_slot.label(), "9:30-10:00");

        // O horário antigo voltou a ficar livre
        booking
            .create_meeting(&payload(f.room_id, date, "9:00-9:30"), &f.user, f.today)
            .await
            .unwrap();

        let availability = booking.availability(f.room_id, date).await.unwrap();
        assert_eq!(availability.booked_slots.len(), 2);
        assert_eq!(availability.free_slots.len(), 18);

        let listed = booking
            .list_meetings(
                &MeetingFilter { date: Some(date), plant_id: Some(f.plant_id), ..Default::default() },
                &f.user,
                f.today,
            )
            .await
            .unwrap();
        let slots: Vec<_> = listed.iter().map(|m| m.meeting.time_slot.label()).collect();
        assert_eq!(slots, vec!["9:00-9:30", "9:30-10:00"]);
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn guarded_deletes(pool: PgPool) {
        let f = fixture(pool).await;
        let date = f.today.checked_add_days(Days::new(1)).unwrap();
        let (meeting, _) = f
            .state
            .booking_service
            .create_meeting(&payload(f.room_id, date, "8:00-8:30"), &f.user, f.today)
            .await
            .unwrap();

        let room_delete = f.state.room_service.delete_room(f.room_id).await;
        assert!(matches!(room_delete, Err(AppError::RoomHasMeetings)));

        let plant_delete = f.state.plant_service.delete_plant(f.plant_id).await;
        assert!(matches!(plant_delete, Err(AppError::PlantHasRooms)));

        f.state.booking_service.delete_meeting(meeting.id, &f.user).await.unwrap();
        f.state.room_service.delete_room(f.room_id).await.unwrap();
        f.state.plant_service.delete_plant(f.plant_id).await.unwrap();
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn other_users_cannot_touch_a_meeting(pool: PgPool) {
        let f = fixture(pool).await;
        let date = f.today.checked_add_days(Days::new(2)).unwrap();
        let (meeting, _) = f
            .state
            .booking_service
            .create_meeting(&payload(f.room_id, date, "11:00-11:30"), &f.user, f.today)
            .await
            .unwrap();

        let hash = hash_password("segredo2").await.unwrap();
        let intruder = crate::db::UserRepository::new(f.state.db_pool.clone())
            .create_user(&f.state.db_pool, "pedro", "pedro@example.com", &hash, Role::Admin)
            .await
            .unwrap();

        let result = f.state.booking_service.delete_meeting(meeting.id, &intruder).await;
        assert!(matches!(result, Err(AppError::Forbidden)));
    }

    #[sqlx::test(migrations = "./migrations")]
    #[ignore = "requer Postgres (DATABASE_URL)"]
    async fn mail_failure_keeps_the_booking_and_returns_a_warning(pool: PgPool) {
        let f = fixture_with(state_with_config(pool, failing_smtp_config())).await;
        let date = f.today.checked_add_days(Days::new(3)).unwrap();

        let (meeting, warning) = f
            .state
            .booking_service
            .create_meeting(&payload(f.room_id, date, "14:00-14:30"), &f.user, f.today)
            .await
            .unwrap();
        assert_eq!(warning.as_deref(), Some(MAIL_WARNING));

        // A reserva já estava gravada antes do envio
        let stored = f.state.booking_service.get_meeting(meeting.id).await.unwrap();
        assert_eq!(stored.meeting.time_slot.label(), "14:00-14:30");

        let warning = f.state.booking_service.delete_meeting(meeting.id, &f.user).await.unwrap();
        assert!(warning.is_some());
        assert!(matches!(
            f.state.booking_service.get_meeting(meeting.id).await,
            Err(AppError::MeetingNotFound)
        ));
    }
}
