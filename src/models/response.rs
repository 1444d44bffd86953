// src/models/response.rs

use serde::Serialize;
use utoipa::ToSchema;

// Resposta padrão das operações de escrita: mensagem de status para a tela,
// aviso opcional (ex.: falha no e-mail) e o registro afetado.
#[derive(Debug, Serialize, ToSchema)]
pub struct ActionResponse<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub warning: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ActionResponse<T> {
    pub fn new(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), warning: None, data: Some(data) }
    }

    pub fn with_warning(mut self, warning: Option<String>) -> Self {
        self.warning = warning;
        self
    }
}

impl ActionResponse<()> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), warning: None, data: None }
    }
}
