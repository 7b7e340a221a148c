// src/models/document.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "document_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum DocumentType {
    Application,
}

// Documento privado de um usuário. O tenant de um documento é derivado
// transitivamente pelo usuário dono; a linha em si não carrega tenant_id.
// Imutável depois de criado: não há caminho de update.
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: Uuid,
    pub user_id: Uuid,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub kind: DocumentType,
    pub filename: String,
    pub extension: String,
    pub size: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct NewDocument {
    pub user_id: Uuid,
    pub kind: DocumentType,
    pub filename: String,
    pub extension: String,
    pub size: i64,
}
