use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthPrincipal,
    models::auth::{AuthResponse, LoginUserPayload},
    models::user::User,
    scoping::TenantScope,
};

// Handler de login
pub async fn login(
    State(app_state): State<AppState>,
    Json(payload): Json<LoginUserPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login_user(&payload.email, &payload.password)
        .await?;

    Ok(Json(AuthResponse { token }))
}

// Handler da rota protegida /me. A própria linha do usuário é lida pelo
// acessor escopado, como qualquer outra leitura.
pub async fn get_me(
    State(app_state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<User>, AppError> {
    let scope = TenantScope::for_principal(&principal);

    let user = app_state
        .store
        .users(&scope)
        .find_by_id(principal.id)
        .await?
        .ok_or(AppError::NotFound)?;

    Ok(Json(user))
}
