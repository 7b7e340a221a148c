// src/services/document_service.rs

use bytes::Bytes;
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::auth::Principal,
    scoping::{ScopedStore, TenantScope},
    storage::BlobStore,
};

// Content-type conhecido para cada extensão de documento. Lista fechada:
// extensão fora dela rende UnsupportedMedia, nunca bytes com header errado.
fn content_type_for(extension: &str) -> Option<&'static str> {
    match extension {
        "pdf" => Some("application/pdf"),
        _ => None,
    }
}

#[derive(Clone)]
pub struct DocumentService {
    store: ScopedStore,
    private_blobs: Arc<dyn BlobStore>,
}

impl DocumentService {
    pub fn new(store: ScopedStore, private_blobs: Arc<dyn BlobStore>) -> Self {
        Self { store, private_blobs }
    }

    /// Entrega os bytes de um documento privado para um chamador
    /// autorizado, junto com o content-type correspondente.
    ///
    /// Ordem das verificações:
    /// 1. papel do principal (só administradores baixam documentos);
    /// 2. resolução do usuário dono DENTRO do tenant do principal, então
    ///    um dono de outro tenant resolve para "não encontrado";
    /// 3. linha do documento por filename;
    /// 4. content-type pela extensão registrada;
    /// 5. bytes do bucket privado.
    pub async fn fetch(
        &self,
        principal: &Principal,
        user_id: Uuid,
        filename: &str,
    ) -> Result<(&'static str, Bytes), AppError> {
        if !principal.role.is_admin() {
            return Err(AppError::Forbidden);
        }

        let scope = TenantScope::for_principal(principal);

        let Some((owner, document)) = self
            .store
            .documents(&scope)
            .find(user_id, filename)
            .await?
        else {
            return Err(AppError::NotFound);
        };

        let Some(content_type) = content_type_for(&document.extension) else {
            return Err(AppError::UnsupportedMedia(document.extension));
        };

        // A linha garante que o objeto deveria existir; se o bucket não o
        // tem, isso é falha de armazenamento, não um 404.
        let key = format!("documents/{}/{}", owner.id, document.filename);
        let bytes = self.private_blobs.get(&key).await?;

        Ok((content_type, bytes))
    }
}
