// src/middleware/auth.rs

use axum::{
    extract::{FromRequestParts, State},
    http::request::Parts,
    middleware::Next,
    response::Response,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::auth::Principal,
};

// O middleware em si: valida o Bearer token e insere o `Principal`
// (id, tenant, papel) nos "extensions" da requisição. É daqui que o
// motor de escopo tira o tenant de TODA operação protegida.
pub async fn auth_guard(
    State(app_state): State<AppState>,
    mut request: axum::http::Request<axum::body::Body>,
    next: Next,
) -> Result<Response, AppError> {
    let headers = request.headers();
    let auth_header = headers.get("Authorization").and_then(|value| value.to_str().ok());

    if let Some(auth_header) = auth_header {
        if let Some(token) = auth_header.strip_prefix("Bearer ") {
            let principal = app_state.auth_service.validate_token(token).await?;

            request.extensions_mut().insert(principal);
            return Ok(next.run(request).await);
        }
    }

    Err(AppError::InvalidToken)
}

// Extrator para obter o principal autenticado diretamente nos handlers
pub struct AuthPrincipal(pub Principal);

impl<S> FromRequestParts<S> for AuthPrincipal
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Principal>()
            .cloned()
            .map(AuthPrincipal)
            .ok_or(AppError::InvalidToken)
    }
}
