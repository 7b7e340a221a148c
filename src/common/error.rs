use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::storage::BlobError;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// Cobre toda a taxonomia: validação, chave duplicada, autorização,
// não-encontrado, mídia não suportada e falha de armazenamento.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    // Linha ausente OU invisível por tenant. As duas situações são
    // intencionalmente indistinguíveis para quem chama.
    #[error("Recurso não encontrado")]
    NotFound,

    // Autenticado, dentro do tenant, mas sem privilégio suficiente.
    #[error("Acesso negado")]
    Forbidden,

    #[error("Extensão de arquivo não suportada: {0}")]
    UnsupportedMedia(String),

    // Falha do backend de blobs. Não há retry nesta camada.
    #[error("Erro de armazenamento de arquivos")]
    Storage(#[from] BlobError),

    // Variante para erros de banco de dados (sqlx)
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna TODOS os campos violados de uma vez, não só o primeiro.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors.iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),

            // Mensagens curtas, sem detalhe. Nenhuma resposta revela se a
            // linha existe em outro tenant.
            AppError::NotFound => (StatusCode::NOT_FOUND, "Recurso não encontrado."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Acesso negado."),

            AppError::UnsupportedMedia(ref ext) => {
                tracing::warn!("Extensão de documento sem content-type conhecido: {}", ext);
                (StatusCode::UNSUPPORTED_MEDIA_TYPE, "Tipo de arquivo não suportado.")
            }

            AppError::Storage(ref e) => {
                tracing::error!("Falha no backend de armazenamento: {}", e);
                (StatusCode::BAD_GATEWAY, "Falha no armazenamento de arquivos.")
            }

            // Todos os outros erros viram 500. O `tracing` loga a mensagem
            // detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        // Resposta padrão para erros simples que só têm uma mensagem.
        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
