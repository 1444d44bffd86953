// src/services/mail_service.rs

use lettre::{
    message::{header::ContentType, Mailbox},
    transport::smtp::authentication::Credentials,
    AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor,
};
use thiserror::Error;

use crate::{
    config::Config,
    models::{auth::User, meeting::Meeting},
};

const SIGNATURE: &str = "Sistema de Salas de Reuniones";

#[derive(Debug, Error)]
pub enum MailError {
    #[error("endereço de e-mail inválido: {0}")]
    Address(#[from] lettre::address::AddressError),

    #[error("falha ao montar a mensagem: {0}")]
    Build(#[from] lettre::error::Error),

    #[error("falha no envio SMTP: {0}")]
    Smtp(#[from] lettre::transport::smtp::Error),
}

// Uma mensagem pronta para envio (texto puro)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Email {
    pub to: String,
    pub subject: String,
    pub body: String,
}

/// Envio de notificações por SMTP.
///
/// Sem `SMTP_HOST` configurado o serviço fica "desligado": as mensagens são
/// apenas registradas no log. Falhas nunca desfazem a operação que originou
/// o e-mail; quem chama recebe um aviso para mostrar ao usuário.
#[derive(Clone)]
pub struct MailService {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl MailService {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let from: Mailbox = config
            .mail_from
            .parse()
            .map_err(|e| anyhow::anyhow!("MAIL_FROM inválido: {e}"))?;

        let transport = match &config.smtp {
            Some(smtp) => {
                let builder = if smtp.starttls {
                    AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(&smtp.host)?
                } else {
                    // Ex.: mailpit/mailhog em desenvolvimento
                    AsyncSmtpTransport::<Tokio1Executor>::builder_dangerous(&smtp.host)
                };
                let builder = builder.port(smtp.port);
                let builder = match (&smtp.username, &smtp.password) {
                    (Some(user), Some(pass)) => {
                        builder.credentials(Credentials::new(user.clone(), pass.clone()))
                    }
                    _ => builder,
                };
                tracing::info!("📧 SMTP configurado em {}:{}", smtp.host, smtp.port);
                Some(builder.build())
            }
            None => {
                tracing::warn!("SMTP_HOST não definido: e-mails serão apenas logados");
                None
            }
        };

        Ok(Self { transport, from })
    }

    pub fn is_enabled(&self) -> bool {
        self.transport.is_some()
    }

    pub async fn send(&self, email: &Email) -> Result<(), MailError> {
        let Some(transport) = &self.transport else {
            tracing::info!(to = %email.to, subject = %email.subject, "e-mail (SMTP desligado)");
            return Ok(());
        };

        let message = Message::builder()
            .from(self.from.clone())
            .to(email.to.parse::<Mailbox>()?)
            .subject(email.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(email.body.clone())?;

        transport.send(message).await?;
        tracing::info!(to = %email.to, subject = %email.subject, "e-mail enviado");
        Ok(())
    }

    /// Envia e transforma a falha num aviso não-fatal para a resposta.
    pub async fn send_best_effort(&self, email: &Email, warning: &str) -> Option<String> {
        match self.send(email).await {
            Ok(()) => None,
            Err(e) => {
                tracing::warn!(to = %email.to, "Erro ao enviar e-mail: {}", e);
                Some(warning.to_string())
            }
        }
    }
}

// ---
// Modelos das mensagens
// ---

pub fn booking_confirmation(meeting: &Meeting, room_name: &str, booked_by: &str) -> Email {
    Email {
        to: meeting.leader_email.clone(),
        subject: "Confirmación de Reservación".into(),
        body: format!(
            "Hola {leader},\n\n\
             Tu reservación de sala de reuniones ha sido confirmada exitosamente.\n\n\
             Detalles de la Reunión:\n\
             - Sala: {room}\n\
             - Fecha: {date}\n\
             - Horario: {slot}\n\
             - Asunto: {subject}\n\
             - Observaciones: {remarks}\n\n\
             Reservado por: {booked_by}\n\n\
             Saludos,\n{SIGNATURE}",
            leader = meeting.leader,
            room = room_name,
            date = meeting.date.format("%d/%m/%Y"),
            slot = meeting.time_slot,
            subject = meeting.subject,
            remarks = meeting.remarks.as_deref().unwrap_or("N/A"),
        ),
    }
}

pub fn booking_updated(meeting: &Meeting, room_name: &str, updated_by: &str) -> Email {
    Email {
        to: meeting.leader_email.clone(),
        subject: "Actualización de Reservación".into(),
        body: format!(
            "Hola {leader},\n\n\
             Tu reservación ha sido modificada. Nuevos detalles:\n\
             - Sala: {room}\n\
             - Fecha: {date}\n\
             - Horario: {slot}\n\
             - Asunto: {subject}\n\n\
             Modificado por: {updated_by}\n\n\
             Saludos,\n{SIGNATURE}",
            leader = meeting.leader,
            room = room_name,
            date = meeting.date.format("%d/%m/%Y"),
            slot = meeting.time_slot,
            subject = meeting.subject,
        ),
    }
}

pub fn booking_cancelled(meeting: &Meeting, room_name: &str, cancelled_by: &str) -> Email {
    Email {
        to: meeting.leader_email.clone(),
        subject: "Cancelación de Reservación".into(),
        body: format!(
            "Hola {leader},\n\n\
             La reunión \"{subject}\" en la sala {room} del {date} ({slot}) ha sido cancelada.\n\n\
             Cancelado por: {cancelled_by}\n\n\
             Saludos,\n{SIGNATURE}",
            leader = meeting.leader,
            subject = meeting.subject,
            room = room_name,
            date = meeting.date.format("%d/%m/%Y"),
            slot = meeting.time_slot,
        ),
    }
}

pub fn password_reset(user: &User, reset_url: &str) -> Email {
    Email {
        to: user.email.clone(),
        subject: "Restablecer Contraseña".into(),
        body: format!(
            "Hola {username},\n\n\
             Has solicitado restablecer tu contraseña en el {SIGNATURE}.\n\n\
             Por favor haz clic en el siguiente enlace para restablecer tu contraseña:\n\n\
             {reset_url}\n\n\
             El enlace expira en una hora. Si no solicitaste este cambio, puedes ignorar este mensaje.\n\n\
             {SIGNATURE}",
            username = user.username,
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{config::test_support::test_config, models::meeting::TimeSlot};
    use chrono::{NaiveDate, Utc};
    use uuid::Uuid;

    fn meeting() -> Meeting {
        Meeting {
            id: Uuid::new_v4(),
            room_id: Uuid::new_v4(),
            date: NaiveDate::from_ymd_opt(2025, 1, 10).unwrap(),
            time_slot: TimeSlot::parse("9:00-9:30").unwrap(),
            leader: "Carla".into(),
            leader_email: "carla@example.com".into(),
            subject: "Planeación".into(),
            remarks: None,
            created_by: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn confirmation_contains_booking_details() {
        let email = booking_confirmation(&meeting(), "Sala A", "juan");
        assert_eq!(email.to, "carla@example.com");
        assert!(email.body.contains("10/01/2025"));
        assert!(email.body.contains("9:00-9:30"));
        assert!(email.body.contains("Observaciones: N/A"));
        assert!(email.body.contains("Reservado por: juan"));
    }

    #[test]
    fn cancellation_mentions_room_and_slot() {
        let email = booking_cancelled(&meeting(), "Sala A", "admin");
        assert!(email.body.contains("Sala A"));
        assert!(email.body.contains("(9:00-9:30)"));
    }

    #[tokio::test]
    async fn disabled_mailer_only_logs() {
        let mailer = MailService::new(&test_config()).unwrap();
        assert!(!mailer.is_enabled());
        let email = booking_updated(&meeting(), "Sala A", "juan");
        assert!(mailer.send(&email).await.is_ok());
        assert!(mailer.send_best_effort(&email, "aviso").await.is_none());
    }

    #[test]
    fn invalid_sender_is_a_config_error() {
        let mut config = test_config();
        config.mail_from = "isto não é e-mail".into();
        assert!(MailService::new(&config).is_err());
    }
}
