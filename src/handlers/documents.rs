// src/handlers/documents.rs

use axum::{
    extract::{Path, State},
    http::header,
    response::{IntoResponse, Response},
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthPrincipal,
};

// Entrega os bytes de um documento privado. Toda a autorização (papel,
// tenant, extensão) acontece no serviço; aqui só montamos a resposta.
pub async fn show_document(
    State(app_state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    Path((user_id, filename)): Path<(Uuid, String)>,
) -> Result<Response, AppError> {
    let (content_type, bytes) = app_state
        .document_service
        .fetch(&principal, user_id, &filename)
        .await?;

    // Configura o header para o navegador mostrar o documento
    let headers = [(header::CONTENT_TYPE, content_type)];

    Ok((headers, bytes).into_response())
}
