// src/models/user.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;
use validator::Validate;

// Papel do usuário dentro do tenant. Apenas administradores podem
// baixar documentos privados.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "user_role", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Member,
}

impl Role {
    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl FromStr for Role {
    type Err = ();

    // O formulário envia o papel como texto ("Admin", "member", ...).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "admin" => Ok(Role::Admin),
            "member" => Ok(Role::Member),
            _ => Err(()),
        }
    }
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: Uuid,
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub photo_ref: Option<String>,
    pub status: bool,
    pub role: Role,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Dados de inserção de um usuário. O `tenant_id` aqui é o valor que o
// chamador FORNECEU; o acessor escopado sempre o sobrescreve com o
// tenant do principal antes de persistir.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub tenant_id: Uuid,
    pub name: String,
    pub email: String,
    pub department: String,
    pub title: String,
    pub photo_ref: Option<String>,
    pub status: bool,
    pub role: Role,
    pub password_hash: String,
}

// Campos textuais do formulário de cadastro. Os arquivos (foto e
// application) chegam separados, como partes do multipart. O tenantId é
// aceito mas ignorado: o escopo decide o tenant, não o formulário.
#[derive(Debug, Clone, Validate)]
pub struct ProvisionUserPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub name: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 1, message = "O departamento é obrigatório."))]
    pub department: String,
    #[validate(length(min = 1, message = "O cargo é obrigatório."))]
    pub title: String,
    pub status: bool,
    pub role: String,
    pub tenant_id: Option<Uuid>,
}

// Campos mutáveis de um usuário. Não existe campo `tenant_id`:
// o tenant de uma linha é imutável por construção.
#[derive(Debug, Clone, Default)]
pub struct UserChanges {
    pub name: Option<String>,
    pub department: Option<String>,
    pub title: Option<String>,
    pub photo_ref: Option<String>,
    pub status: Option<bool>,
}
