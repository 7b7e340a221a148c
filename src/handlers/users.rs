// src/handlers/users.rs

use axum::{
    extract::{Multipart, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::AuthPrincipal,
    models::user::{ProvisionUserPayload, User},
    scoping::TenantScope,
    services::provisioning_service::UploadedFile,
};

// Lista os usuários visíveis para o principal: sempre e somente os do
// tenant dele.
pub async fn list_users(
    State(app_state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
) -> Result<Json<Vec<User>>, AppError> {
    let scope = TenantScope::for_principal(&principal);
    let users = app_state.store.users(&scope).list().await?;

    Ok(Json(users))
}

// Recebe o formulário multipart de cadastro (campos de texto + foto +
// arquivo de application) e repassa ao serviço de provisionamento.
pub async fn create_user(
    State(app_state): State<AppState>,
    AuthPrincipal(principal): AuthPrincipal,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<User>), AppError> {
    let mut name = String::new();
    let mut email = String::new();
    let mut department = String::new();
    let mut title = String::new();
    let mut status = true;
    let mut role = String::new();
    let mut tenant_id: Option<Uuid> = None;
    let mut photo: Option<UploadedFile> = None;
    let mut application: Option<UploadedFile> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| anyhow::anyhow!("Falha ao ler o formulário multipart: {}", e))?
    {
        let Some(field_name) = field.name().map(str::to_string) else {
            continue;
        };

        match field_name.as_str() {
            "photo" | "application" => {
                let uploaded = UploadedFile {
                    filename: field.file_name().unwrap_or_default().to_string(),
                    content_type: field.content_type().map(str::to_string),
                    bytes: field
                        .bytes()
                        .await
                        .map_err(|e| anyhow::anyhow!("Falha ao ler o arquivo enviado: {}", e))?,
                };

                if field_name == "photo" {
                    photo = Some(uploaded);
                } else {
                    application = Some(uploaded);
                }
            }
            _ => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| anyhow::anyhow!("Falha ao ler o campo '{}': {}", field_name, e))?;

                match field_name.as_str() {
                    "name" => name = value,
                    "email" => email = value,
                    "department" => department = value,
                    "title" => title = value,
                    "status" => status = matches!(value.as_str(), "1" | "true"),
                    "role" => role = value,
                    // Aceito no formulário, mas o escopo sempre decide o
                    // tenant de verdade.
                    "tenantId" => tenant_id = value.parse().ok(),
                    _ => {}
                }
            }
        }
    }

    // Arquivos ausentes entram como uploads vazios: as regras de
    // validação do serviço os reportam junto com os demais campos.
    let photo = photo.unwrap_or_else(|| UploadedFile {
        filename: String::new(),
        content_type: None,
        bytes: Default::default(),
    });
    let application = application.unwrap_or_else(|| UploadedFile {
        filename: String::new(),
        content_type: None,
        bytes: Default::default(),
    });

    let payload = ProvisionUserPayload {
        name,
        email,
        department,
        title,
        status,
        role,
        tenant_id,
    };

    let user = app_state
        .provisioning_service
        .provision(&principal, payload, &photo, &application)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}
