// src/db/memory.rs

use async_trait::async_trait;
use chrono::Utc;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{DocumentStore, UserFilter, UserStore},
    models::document::{Document, NewDocument},
    models::user::{NewUser, User, UserChanges},
};

// Backend em memória do armazenamento de entidades. Usado pelos testes
// de integração e por desenvolvimento local sem Postgres. Reproduz as
// mesmas regras do repositório real, inclusive a chave única de e-mail.
#[derive(Clone, Default)]
pub struct MemoryUserStore {
    rows: Arc<RwLock<HashMap<Uuid, User>>>,
}

impl MemoryUserStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserStore for MemoryUserStore {
    async fn insert(&self, row: NewUser) -> Result<User, AppError> {
        let mut rows = self.rows.write().await;

        // Unicidade de e-mail é global no sistema, não por tenant.
        if rows.values().any(|u| u.email == row.email) {
            return Err(AppError::EmailAlreadyExists);
        }

        let now = Utc::now();
        let user = User {
            id: Uuid::new_v4(),
            tenant_id: row.tenant_id,
            name: row.name,
            email: row.email,
            department: row.department,
            title: row.title,
            photo_ref: row.photo_ref,
            status: row.status,
            role: row.role,
            password_hash: row.password_hash,
            created_at: now,
            updated_at: now,
        };

        rows.insert(user.id, user.clone());
        Ok(user)
    }

    async fn find(&self, filter: UserFilter) -> Result<Vec<User>, AppError> {
        let rows = self.rows.read().await;

        let mut users: Vec<User> = rows
            .values()
            .filter(|u| filter.id.is_none_or(|id| u.id == id))
            .filter(|u| filter.email.as_deref().is_none_or(|e| u.email == e))
            .filter(|u| filter.tenant_id.is_none_or(|t| u.tenant_id == t))
            .cloned()
            .collect();

        // Mesma ordem determinística do repositório Postgres.
        users.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(users)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut rows = self.rows.write().await;

        let Some(user) = rows.get_mut(&id) else {
            return Ok(None);
        };

        if let Some(name) = changes.name {
            user.name = name;
        }
        if let Some(department) = changes.department {
            user.department = department;
        }
        if let Some(title) = changes.title {
            user.title = title;
        }
        if let Some(photo_ref) = changes.photo_ref {
            user.photo_ref = Some(photo_ref);
        }
        if let Some(status) = changes.status {
            user.status = status;
        }
        user.updated_at = Utc::now();

        Ok(Some(user.clone()))
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        self.rows.write().await.remove(&id);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct MemoryDocumentStore {
    rows: Arc<RwLock<HashMap<Uuid, Document>>>,
}

impl MemoryDocumentStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryDocumentStore {
    async fn insert(&self, row: NewDocument) -> Result<Document, AppError> {
        let document = Document {
            id: Uuid::new_v4(),
            user_id: row.user_id,
            kind: row.kind,
            filename: row.filename,
            extension: row.extension,
            size: row.size,
            created_at: Utc::now(),
        };

        self.rows.write().await.insert(document.id, document.clone());
        Ok(document)
    }

    async fn find_by_user_and_filename(
        &self,
        user_id: Uuid,
        filename: &str,
    ) -> Result<Option<Document>, AppError> {
        let rows = self.rows.read().await;
        Ok(rows
            .values()
            .find(|d| d.user_id == user_id && d.filename == filename)
            .cloned())
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let rows = self.rows.read().await;

        let mut documents: Vec<Document> = rows
            .values()
            .filter(|d| d.user_id == user_id)
            .cloned()
            .collect();

        documents.sort_by(|a, b| (a.created_at, a.id).cmp(&(b.created_at, b.id)));
        Ok(documents)
    }
}
