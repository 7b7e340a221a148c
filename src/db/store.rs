// src/db/store.rs

use async_trait::async_trait;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::document::{Document, NewDocument},
    models::user::{NewUser, User, UserChanges},
};

// Predicado tipado para consultas de usuários. Os campos presentes são
// combinados com AND. É sobre este struct que o motor de escopo conjuga
// o predicado de tenant.
#[derive(Debug, Clone, Default)]
pub struct UserFilter {
    pub id: Option<Uuid>,
    pub email: Option<String>,
    pub tenant_id: Option<Uuid>,
}

impl UserFilter {
    pub fn by_id(id: Uuid) -> Self {
        Self { id: Some(id), ..Default::default() }
    }

    pub fn by_email(email: &str) -> Self {
        Self { email: Some(email.to_string()), ..Default::default() }
    }

    pub fn in_tenant(mut self, tenant_id: Uuid) -> Self {
        self.tenant_id = Some(tenant_id);
        self
    }
}

// Armazenamento puro de dados, SEM nenhuma noção de tenant. A conjugação
// do predicado de tenant é responsabilidade exclusiva do motor de escopo;
// manter as duas preocupações ortogonais é o que torna cada uma testável.
#[async_trait]
pub trait UserStore: Send + Sync {
    /// Insere um usuário. Violação da chave única de e-mail vira
    /// [`AppError::EmailAlreadyExists`].
    async fn insert(&self, row: NewUser) -> Result<User, AppError>;

    /// Retorna as linhas que satisfazem TODOS os campos do filtro,
    /// ordenadas por data de criação.
    async fn find(&self, filter: UserFilter) -> Result<Vec<User>, AppError>;

    /// Aplica as mudanças e retorna a linha atualizada, ou `None` se o id
    /// não existe. `UserChanges` não tem campo de tenant: o tenant de uma
    /// linha nunca muda.
    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError>;

    /// Remove a linha. Usado apenas pela compensação do provisionamento;
    /// usuários não são removidos por nenhum fluxo normal.
    async fn delete(&self, id: Uuid) -> Result<(), AppError>;
}

#[async_trait]
pub trait DocumentStore: Send + Sync {
    async fn insert(&self, row: NewDocument) -> Result<Document, AppError>;

    async fn find_by_user_and_filename(
        &self,
        user_id: Uuid,
        filename: &str,
    ) -> Result<Option<Document>, AppError>;

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError>;
}
