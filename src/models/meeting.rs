// src/models/meeting.rs

use std::fmt;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use thiserror::Error;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::validation::not_blank;

// ---
// 1. Horários fixos (20 blocos de 30 minutos entre 08:00 e 18:00)
// ---
pub const TIME_SLOTS: [&str; 20] = [
    "8:00-8:30", "8:30-9:00", "9:00-9:30", "9:30-10:00",
    "10:00-10:30", "10:30-11:00", "11:00-11:30", "11:30-12:00",
    "12:00-12:30", "12:30-13:00", "13:00-13:30", "13:30-14:00",
    "14:00-14:30", "14:30-15:00", "15:00-15:30", "15:30-16:00",
    "16:00-16:30", "16:30-17:00", "17:00-17:30", "17:30-18:00",
];

#[derive(Debug, Error)]
#[error("'{0}' não é um horário válido")]
pub struct InvalidTimeSlot(pub String);

/// Um dos 20 horários fixos. Internamente guarda a posição na lista,
/// então a ordenação segue a ordem cronológica (e não a alfabética).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TimeSlot(usize);

impl TimeSlot {
    pub fn parse(label: &str) -> Option<Self> {
        let label = label.trim();
        TIME_SLOTS.iter().position(|s| *s == label).map(TimeSlot)
    }

    pub fn label(self) -> &'static str {
        TIME_SLOTS[self.0]
    }

    pub fn all() -> impl Iterator<Item = TimeSlot> {
        (0..TIME_SLOTS.len()).map(TimeSlot)
    }
}

impl fmt::Display for TimeSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl TryFrom<String> for TimeSlot {
    type Error = InvalidTimeSlot;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        TimeSlot::parse(&value).ok_or(InvalidTimeSlot(value))
    }
}

impl From<TimeSlot> for String {
    fn from(slot: TimeSlot) -> Self {
        slot.label().to_string()
    }
}

// ---
// 2. Reunião (a reserva)
// ---
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Meeting {
    pub id: Uuid,
    pub room_id: Uuid,
    pub date: NaiveDate,

    #[sqlx(try_from = "String")]
    #[schema(value_type = String, example = "9:00-9:30")]
    pub time_slot: TimeSlot,

    pub leader: String,
    pub leader_email: String,
    pub subject: String,
    pub remarks: Option<String>,
    pub created_by: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

// Reunião com os nomes da sala/planta/criador, para a listagem
#[derive(Debug, Clone, Serialize, FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingDetail {
    #[sqlx(flatten)]
    #[serde(flatten)]
    pub meeting: Meeting,
    pub room_name: String,
    pub plant_id: Uuid,
    pub plant_name: String,
    pub created_by_username: Option<String>,
}

fn validate_time_slot(value: &str) -> Result<(), ValidationError> {
    if TimeSlot::parse(value).is_none() {
        let mut err = ValidationError::new("time_slot");
        err.message = Some("Horario inválido.".into());
        return Err(err);
    }
    Ok(())
}

// O "formulário" de reserva (criação e edição usam o mesmo)
#[derive(Debug, Clone, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MeetingPayload {
    #[schema(example = "2025-01-10")]
    pub date: NaiveDate,

    pub room_id: Uuid,

    #[validate(custom(function = "validate_time_slot"))]
    #[schema(example = "9:00-9:30")]
    pub time_slot: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 100, message = "El responsable es requerido (máx. 100 caracteres).")
    )]
    pub leader: String,

    #[validate(email(message = "Correo inválido."), length(max = 120))]
    pub leader_email: String,

    #[validate(
        custom(function = "not_blank"),
        length(max = 200, message = "El asunto es requerido (máx. 200 caracteres).")
    )]
    pub subject: String,

    #[validate(length(max = 300, message = "Máximo 300 caracteres."))]
    pub remarks: Option<String>,
}

impl MeetingPayload {
    pub fn slot(&self) -> Result<TimeSlot, InvalidTimeSlot> {
        TimeSlot::try_from(self.time_slot.clone())
    }
}

// Filtros da listagem: ?date=2025-01-10&plantId=...&roomId=...&mine=true
#[derive(Debug, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct MeetingFilter {
    pub date: Option<NaiveDate>,
    pub plant_id: Option<Uuid>,
    pub room_id: Option<Uuid>,
    #[serde(default)]
    pub mine: bool,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query)]
pub struct AvailabilityQuery {
    pub room_id: Uuid,
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Availability {
    pub room_id: Uuid,
    pub date: NaiveDate,
    #[schema(value_type = Vec<String>)]
    pub free_slots: Vec<TimeSlot>,
    #[schema(value_type = Vec<String>)]
    pub booked_slots: Vec<TimeSlot>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn there_are_twenty_slots_in_order() {
        let all: Vec<_> = TimeSlot::all().collect();
        assert_eq!(all.len(), 20);
        assert_eq!(all[0].label(), "8:00-8:30");
        assert_eq!(all[19].label(), "17:30-18:00");
        assert!(TimeSlot::parse("9:30-10:00") < TimeSlot::parse("10:00-10:30"));
    }

    #[test]
    fn parse_rejects_unknown_labels() {
        assert!(TimeSlot::parse("18:00-18:30").is_none());
        assert!(TimeSlot::parse("9:00").is_none());
        assert_eq!(TimeSlot::parse(" 9:00-9:30 ").map(TimeSlot::label), Some("9:00-9:30"));
    }

    #[test]
    fn slot_serializes_as_label() {
        let slot = TimeSlot::parse("12:00-12:30").unwrap();
        assert_eq!(serde_json::to_value(slot).unwrap(), "12:00-12:30");
        let back: TimeSlot = serde_json::from_str("\"12:00-12:30\"").unwrap();
        assert_eq!(back, slot);
        assert!(serde_json::from_str::<TimeSlot>("\"7:00-7:30\"").is_err());
    }

    #[test]
    fn payload_validation_flags_bad_fields() {
        let payload = MeetingPayload {
            date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            room_id: Uuid::new_v4(),
            time_slot: "25:00-25:30".into(),
            leader: "".into(),
            leader_email: "no-es-correo".into(),
            subject: "Revisión".into(),
            remarks: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("time_slot"));
        assert!(fields.contains_key("leader"));
        assert!(fields.contains_key("leader_email"));
        assert!(!fields.contains_key("subject"));
    }

    #[test]
    fn whitespace_only_leader_and_subject_are_rejected() {
        let payload = MeetingPayload {
            date: NaiveDate::from_ymd_opt(2030, 1, 10).unwrap(),
            room_id: Uuid::new_v4(),
            time_slot: "9:00-9:30".into(),
            leader: "   ".into(),
            leader_email: "ana@example.com".into(),
            subject: "\t ".into(),
            remarks: None,
        };
        let errors = payload.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("leader"));
        assert!(fields.contains_key("subject"));
        assert!(!fields.contains_key("time_slot"));
    }

    #[test]
    fn filter_defaults_to_everything() {
        let filter: MeetingFilter = serde_json::from_str("{}").unwrap();
        assert!(filter.date.is_none());
        assert!(!filter.mine);
    }
}
