// src/common/error.rs

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

use crate::middleware::i18n::Locale;

// Os cálculos da linha do tempo nunca falham (degradam para zero / None).
// Estes erros são só da camada HTTP.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Data de referência inválida: {0}")]
    InvalidReferenceDate(String),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

/// Erro já pronto para virar resposta: status + mensagem no idioma do cliente.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

impl AppError {
    pub fn to_api_error(&self, locale: &Locale) -> ApiError {
        let pt = locale.is_pt();

        let (status, message) = match self {
            AppError::ValidationError(errors) => {
                let campos: Vec<String> = errors
                    .field_errors()
                    .keys()
                    .map(|campo| campo.to_string())
                    .collect();
                let prefixo = if pt { "Campos inválidos" } else { "Invalid fields" };
                (StatusCode::BAD_REQUEST, format!("{}: {}", prefixo, campos.join(", ")))
            }
            AppError::InvalidReferenceDate(valor) => {
                let msg = if pt {
                    format!("Data de referência inválida: '{}'", valor)
                } else {
                    format!("Invalid reference date: '{}'", valor)
                };
                (StatusCode::BAD_REQUEST, msg)
            }
            AppError::InternalServerError(e) => {
                tracing::error!("Erro Interno do Servidor: {:?}", e);
                let msg = if pt { "Ocorreu um erro inesperado." } else { "An unexpected error occurred." };
                (StatusCode::INTERNAL_SERVER_ERROR, msg.to_string())
            }
        };

        if status.is_client_error() {
            tracing::warn!(%status, "Requisição rejeitada: {}", message);
        }

        ApiError { status, message }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "error": self.message }));
        (self.status, body).into_response()
    }
}
