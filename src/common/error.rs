// src/common/error.rs

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::{json, Value};
use thiserror::Error;

use crate::{common::i18n::I18nStore, middleware::i18n::Locale};

// Erros internos da aplicação. Cada variante tem um código estável
// que é traduzido pelo I18nStore antes de sair na resposta.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Cliente não encontrado")]
    ClientNotFound,

    #[error("Projeto não encontrado")]
    ProjectNotFound,

    #[error("Fatura não encontrada")]
    InvoiceNotFound,

    #[error("Recurso não encontrado")]
    ResourceNotFound,

    #[error("Arquivo não encontrado: {0}")]
    FileNotFound(String),

    #[error("Arquivo já existe: {0}")]
    FileAlreadyExists(String),

    #[error("Tipo de arquivo não permitido: {0}")]
    FileTypeNotAllowed(String),

    #[error("Arquivo muito grande: {0} bytes")]
    FileTooLarge(usize),

    #[error("Upload inválido: {0}")]
    InvalidUpload(String),

    #[error("Caminho de storage inválido: {0}")]
    InvalidStoragePath(String),

    #[error("Tabela não suportada: {0}")]
    UnsupportedTable(String),

    #[error("Valor da fatura obrigatório")]
    InvoiceAmountRequired,

    #[error("Número de fatura já usado: {0}")]
    InvoiceNumberTaken(String),

    #[error("Fonte não encontrada: {0}")]
    FontNotFound(String),

    #[error("Erro ao gerar PDF: {0}")]
    PdfError(String),

    #[error("Erro de storage: {0}")]
    StorageError(#[from] std::io::Error),

    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),

    // Qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    /// Código estável usado como chave de tradução.
    pub fn code(&self) -> &'static str {
        match self {
            AppError::ValidationError(_) => "VALIDATION_ERROR",
            AppError::InvalidCredentials => "INVALID_CREDENTIALS",
            AppError::InvalidToken => "INVALID_TOKEN",
            AppError::ClientNotFound => "CLIENT_NOT_FOUND",
            AppError::ProjectNotFound => "PROJECT_NOT_FOUND",
            AppError::InvoiceNotFound => "INVOICE_NOT_FOUND",
            AppError::ResourceNotFound => "RESOURCE_NOT_FOUND",
            AppError::FileNotFound(_) => "FILE_NOT_FOUND",
            AppError::FileAlreadyExists(_) => "FILE_ALREADY_EXISTS",
            AppError::FileTypeNotAllowed(_) => "FILE_TYPE_NOT_ALLOWED",
            AppError::FileTooLarge(_) => "FILE_TOO_LARGE",
            AppError::InvalidUpload(_) => "INVALID_UPLOAD",
            AppError::InvalidStoragePath(_) => "INVALID_STORAGE_PATH",
            AppError::UnsupportedTable(_) => "UNSUPPORTED_TABLE",
            AppError::InvoiceAmountRequired => "INVOICE_AMOUNT_REQUIRED",
            AppError::InvoiceNumberTaken(_) => "INVOICE_NUMBER_TAKEN",
            _ => "INTERNAL_SERVER_ERROR",
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_)
            | AppError::FileTypeNotAllowed(_)
            | AppError::InvalidUpload(_)
            | AppError::InvalidStoragePath(_)
            | AppError::InvoiceAmountRequired => StatusCode::BAD_REQUEST,
            AppError::FileTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::InvalidCredentials | AppError::InvalidToken => StatusCode::UNAUTHORIZED,
            AppError::ClientNotFound
            | AppError::ProjectNotFound
            | AppError::InvoiceNotFound
            | AppError::ResourceNotFound
            | AppError::FileNotFound(_)
            | AppError::UnsupportedTable(_) => StatusCode::NOT_FOUND,
            AppError::FileAlreadyExists(_) | AppError::InvoiceNumberTaken(_) => StatusCode::CONFLICT,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Converte o erro interno na resposta HTTP, já traduzida.
    pub fn to_api_error(&self, locale: &Locale, store: &I18nStore) -> ApiError {
        let status = self.status();

        if status == StatusCode::INTERNAL_SERVER_ERROR {
            // O detalhe vai só pro log
            tracing::error!("Erro Interno do Servidor: {:?}", self);
        }

        let message = store.translate(&locale.0, self.code());

        let details = match self {
            AppError::ValidationError(errors) => {
                let mut fields = serde_json::Map::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<Value> = field_errors
                        .iter()
                        .map(|e| {
                            let text = e
                                .message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string());
                            Value::String(text)
                        })
                        .collect();
                    fields.insert(field.to_string(), Value::Array(messages));
                }
                Some(Value::Object(fields))
            }
            AppError::FileTypeNotAllowed(ext) => Some(json!({ "extension": ext })),
            AppError::FileTooLarge(size) => Some(json!({ "size": size })),
            AppError::InvalidUpload(reason) => Some(json!({ "reason": reason })),
            AppError::UnsupportedTable(table) => Some(json!({ "table": table })),
            AppError::InvoiceNumberTaken(number) => Some(json!({ "invoiceNumber": number })),
            _ => None,
        };

        ApiError { status, error: message, details }
    }
}

// O erro que de fato sai na resposta HTTP
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: String,
    pub details: Option<Value>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = match self.details {
            Some(details) => json!({ "error": self.error, "details": details }),
            None => json!({ "error": self.error }),
        };
        (self.status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn not_found_errors_map_to_404() {
        assert_eq!(AppError::ProjectNotFound.status(), StatusCode::NOT_FOUND);
        assert_eq!(AppError::UnsupportedTable("users".into()).status(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn conflicts_and_oversized_uploads() {
        let api = AppError::InvoiceNumberTaken("INV-2024-0001".into())
            .to_api_error(&Locale("pt".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::CONFLICT);
        assert_eq!(api.error, "Este número de fatura já está em uso.");
        assert_eq!(api.details.expect("details")["invoiceNumber"], "INV-2024-0001");

        assert_eq!(AppError::FileTooLarge(11 * 1024 * 1024).status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(AppError::FileTypeNotAllowed("exe".into()).status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn validation_details_list_every_field() {
        let mut errors = validator::ValidationErrors::new();
        let mut err = validator::ValidationError::new("required");
        err.message = Some("O nome é obrigatório.".into());
        errors.add("name", err);

        let api = AppError::ValidationError(errors)
            .to_api_error(&Locale("pt".into()), &I18nStore::new());

        assert_eq!(api.status, StatusCode::BAD_REQUEST);
        let details = api.details.expect("details");
        assert_eq!(details["name"][0], "O nome é obrigatório.");
    }

    #[test]
    fn internal_errors_hide_the_cause() {
        let api = AppError::PdfError("layout".into())
            .to_api_error(&Locale("en".into()), &I18nStore::new());
        assert_eq!(api.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!api.error.contains("layout"));
    }
}
