// src/services/provisioning_service.rs

use bcrypt::hash;
use bytes::Bytes;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::{
    common::error::AppError,
    models::auth::Principal,
    models::document::{DocumentType, NewDocument},
    models::user::{NewUser, ProvisionUserPayload, Role, User},
    scoping::{ScopedStore, TenantScope},
    storage::BlobStore,
};

// Teto de 1 MiB para a foto e para o arquivo de application.
const MAX_UPLOAD_BYTES: usize = 1024 * 1024;

// Extensões aceitas para o arquivo de application.
const ALLOWED_APPLICATION_EXTENSIONS: &[&str] = &["pdf"];

// Um arquivo recebido no formulário multipart.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub filename: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl UploadedFile {
    pub fn extension(&self) -> Option<String> {
        let (stem, ext) = self.filename.rsplit_once('.')?;
        if stem.is_empty() || ext.is_empty() {
            return None;
        }
        Some(ext.to_ascii_lowercase())
    }

    // Parte do nome antes da extensão, reduzida a caracteres seguros
    // para virar componente de caminho no bucket.
    pub fn sanitized_stem(&self) -> String {
        let stem = self
            .filename
            .rsplit_once('.')
            .map(|(stem, _)| stem)
            .unwrap_or(&self.filename);

        let clean: String = stem
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '-' || c == '_' { c } else { '-' })
            .collect();

        if clean.is_empty() {
            "document".to_string()
        } else {
            clean
        }
    }
}

fn validation_failure(message: &'static str) -> ValidationError {
    let mut error = ValidationError::new("invalid");
    error.message = Some(message.into());
    error
}

// O serviço de provisionamento: valida tudo de uma vez, sobe os
// arquivos, cria o User através do motor de escopo (tenant forçado) e
// registra o Document. Para quem chama é uma única operação lógica.
#[derive(Clone)]
pub struct ProvisioningService {
    store: ScopedStore,
    public_blobs: Arc<dyn BlobStore>,
    private_blobs: Arc<dyn BlobStore>,
}

impl ProvisioningService {
    pub fn new(
        store: ScopedStore,
        public_blobs: Arc<dyn BlobStore>,
        private_blobs: Arc<dyn BlobStore>,
    ) -> Self {
        Self { store, public_blobs, private_blobs }
    }

    pub async fn provision(
        &self,
        principal: &Principal,
        payload: ProvisionUserPayload,
        photo: &UploadedFile,
        application: &UploadedFile,
    ) -> Result<User, AppError> {
        // 1. Valida TODOS os campos antes de qualquer efeito colateral.
        let role = Self::validate(&payload, photo, application)?;

        let scope = TenantScope::for_principal(principal);

        // 2. Foto vai para o bucket público; a referência fica no usuário.
        let photo_key = format!(
            "photos/{}.{}",
            Uuid::new_v4().simple(),
            photo.extension().unwrap_or_else(|| "jpg".to_string()),
        );
        let photo_ref = self.public_blobs.put(&photo_key, photo.bytes.clone()).await?;

        // 3. Nome determinístico do documento: raiz do nome original mais
        // o timestamp de criação mais a extensão original. Evita colisão
        // sem perder o rastro do nome de origem.
        let extension = application.extension().unwrap_or_default();
        let filename = format!(
            "{}_{}.{}",
            application.sanitized_stem(),
            Utc::now().timestamp(),
            extension,
        );

        // 4. Cria o usuário pelo acessor escopado. O tenant_id que veio no
        // payload é descartado: a linha nasce no tenant do principal.
        // A senha inicial é aleatória; o usuário a troca por outra via.
        let generated_password = Uuid::new_v4().simple().to_string();
        let password_hash = tokio::task::spawn_blocking(move || {
            hash(&generated_password, bcrypt::DEFAULT_COST)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))?
        ?;

        let user = self
            .store
            .users(&scope)
            .create(NewUser {
                tenant_id: payload.tenant_id.unwrap_or(Uuid::nil()),
                name: payload.name,
                email: payload.email,
                department: payload.department,
                title: payload.title,
                photo_ref: Some(photo_ref),
                status: payload.status,
                role,
                password_hash,
            })
            .await?;

        // 5 e 6. Sobe o arquivo para o bucket privado e registra a linha
        // do documento. Se qualquer um dos dois falhar, desfaz o usuário:
        // um User visível sem Document seria inconsistência permanente.
        match self
            .attach_application(&scope, user.id, &filename, &extension, application)
            .await
        {
            Ok(_) => Ok(user),
            Err(e) => {
                tracing::warn!(
                    "Provisionamento de {} falhou depois da criação; removendo o usuário.",
                    user.email
                );
                self.store.users(&scope).remove(user.id).await?;
                Err(e)
            }
        }
    }

    async fn attach_application(
        &self,
        scope: &TenantScope,
        user_id: Uuid,
        filename: &str,
        extension: &str,
        application: &UploadedFile,
    ) -> Result<(), AppError> {
        let key = format!("documents/{}/{}", user_id, filename);
        self.private_blobs.put(&key, application.bytes.clone()).await?;

        self.store
            .documents(scope)
            .create_for(
                user_id,
                NewDocument {
                    user_id,
                    kind: DocumentType::Application,
                    filename: filename.to_string(),
                    extension: extension.to_string(),
                    size: application.bytes.len() as i64,
                },
            )
            .await?;

        Ok(())
    }

    // Junta os erros do derive `Validate` com as regras de arquivo, para
    // devolver todos os campos violados de uma vez só.
    fn validate(
        payload: &ProvisionUserPayload,
        photo: &UploadedFile,
        application: &UploadedFile,
    ) -> Result<Role, AppError> {
        let mut errors = match payload.validate() {
            Ok(()) => ValidationErrors::new(),
            Err(e) => e,
        };

        let role = payload.role.parse::<Role>();
        if role.is_err() {
            errors.add("role".into(), validation_failure("Papel de usuário desconhecido."));
        }

        let is_image = photo
            .content_type
            .as_deref()
            .is_some_and(|ct| ct.starts_with("image/"));
        if !is_image {
            errors.add("photo".into(), validation_failure("A foto deve ser uma imagem."));
        }
        if photo.bytes.len() > MAX_UPLOAD_BYTES {
            errors.add("photo".into(), validation_failure("A foto deve ter no máximo 1 MiB."));
        }

        let extension_ok = application
            .extension()
            .is_some_and(|ext| ALLOWED_APPLICATION_EXTENSIONS.contains(&ext.as_str()));
        if !extension_ok {
            errors.add("application".into(), validation_failure("O arquivo deve ser um PDF."));
        }
        if application.bytes.len() > MAX_UPLOAD_BYTES {
            errors.add("application".into(), validation_failure("O arquivo deve ter no máximo 1 MiB."));
        }

        if !errors.is_empty() {
            return Err(errors.into());
        }

        // Seguro: a ausência de erro acima garante que o parse funcionou.
        Ok(role.unwrap_or(Role::Member))
    }
}
