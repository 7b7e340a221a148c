// src/scoping.rs
//
// O motor de escopo de tenant. TODO acesso a entidades pertencentes a um
// tenant passa por aqui: os acessores escopados conjugam o predicado
// `tenant_id = tenant atual` em toda leitura e sobrescrevem o campo
// `tenant_id` em toda escrita. Nenhum handler ou serviço fala com os
// repositórios crus diretamente, então não existe call site capaz de
// "esquecer" o filtro.

use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{DocumentStore, UserFilter, UserStore},
    models::auth::Principal,
    models::document::{Document, NewDocument},
    models::user::{NewUser, User, UserChanges},
};

// O contexto de tenant da requisição atual. É um valor explícito,
// passado como argumento; nunca um singleton de processo, para que
// requisições paralelas de tenants diferentes não se misturem.
#[derive(Debug, Clone, Copy)]
pub struct TenantScope {
    tenant_id: Option<Uuid>,
}

impl TenantScope {
    pub fn for_principal(principal: &Principal) -> Self {
        Self { tenant_id: Some(principal.tenant_id) }
    }

    // Sem principal autenticado não há tenant. Leituras neste escopo
    // retornam o conjunto vazio; escritas são recusadas. NUNCA existe
    // um fallback para acesso sem escopo.
    pub fn anonymous() -> Self {
        Self { tenant_id: None }
    }

    pub fn tenant_id(&self) -> Option<Uuid> {
        self.tenant_id
    }
}

// Ponto de entrada único do motor: entrega acessores escopados por
// entidade a partir de um `TenantScope`.
#[derive(Clone)]
pub struct ScopedStore {
    users: Arc<dyn UserStore>,
    documents: Arc<dyn DocumentStore>,
}

impl ScopedStore {
    pub fn new(users: Arc<dyn UserStore>, documents: Arc<dyn DocumentStore>) -> Self {
        Self { users, documents }
    }

    pub fn users(&self, scope: &TenantScope) -> ScopedUsers<'_> {
        ScopedUsers {
            store: self.users.as_ref(),
            tenant_id: scope.tenant_id(),
        }
    }

    pub fn documents(&self, scope: &TenantScope) -> ScopedDocuments<'_> {
        ScopedDocuments {
            users: self.users.as_ref(),
            documents: self.documents.as_ref(),
            tenant_id: scope.tenant_id(),
        }
    }
}

// Acessor de usuários amarrado a um tenant. Toda leitura carrega o
// predicado de tenant; toda criação força o tenant do escopo.
pub struct ScopedUsers<'a> {
    store: &'a dyn UserStore,
    tenant_id: Option<Uuid>,
}

impl ScopedUsers<'_> {
    pub async fn list(&self) -> Result<Vec<User>, AppError> {
        let Some(tenant_id) = self.tenant_id else {
            return Ok(Vec::new());
        };

        self.store
            .find(UserFilter::default().in_tenant(tenant_id))
            .await
    }

    // Uma busca por id de outro tenant se comporta EXATAMENTE como
    // "linha não existe". A diferença nunca vaza por código de erro.
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, AppError> {
        let Some(tenant_id) = self.tenant_id else {
            return Ok(None);
        };

        let users = self
            .store
            .find(UserFilter::by_id(id).in_tenant(tenant_id))
            .await?;

        Ok(users.into_iter().next())
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<User>, AppError> {
        let Some(tenant_id) = self.tenant_id else {
            return Ok(None);
        };

        let users = self
            .store
            .find(UserFilter::by_email(email).in_tenant(tenant_id))
            .await?;

        Ok(users.into_iter().next())
    }

    // O `tenant_id` que veio no payload é descartado e sobrescrito com o
    // tenant do escopo. O chamador não tem como criar em outro tenant.
    pub async fn create(&self, mut row: NewUser) -> Result<User, AppError> {
        let Some(tenant_id) = self.tenant_id else {
            return Err(AppError::Forbidden);
        };

        row.tenant_id = tenant_id;
        self.store.insert(row).await
    }

    // Atualiza uma linha do tenant atual. Linhas de outros tenants são
    // invisíveis, logo "não encontradas". `UserChanges` não carrega
    // tenant_id, então nenhum update pode mover uma linha de tenant.
    pub async fn update(&self, id: Uuid, changes: UserChanges) -> Result<User, AppError> {
        if self.find_by_id(id).await?.is_none() {
            return Err(AppError::NotFound);
        }

        self.store
            .update(id, changes)
            .await?
            .ok_or(AppError::NotFound)
    }

    // Compensação do provisionamento: desfaz a criação de um usuário do
    // tenant atual quando a persistência do documento falhou depois.
    pub(crate) async fn remove(&self, id: Uuid) -> Result<(), AppError> {
        if self.find_by_id(id).await?.is_none() {
            return Ok(());
        }

        self.store.delete(id).await
    }
}

// Acessor de documentos. Um documento não carrega tenant_id próprio:
// o escopo é derivado transitivamente pelo usuário dono, sempre
// resolvido através do acessor de usuários escopado.
pub struct ScopedDocuments<'a> {
    users: &'a dyn UserStore,
    documents: &'a dyn DocumentStore,
    tenant_id: Option<Uuid>,
}

impl ScopedDocuments<'_> {
    fn scoped_users(&self) -> ScopedUsers<'_> {
        ScopedUsers {
            store: self.users,
            tenant_id: self.tenant_id,
        }
    }

    /// Resolve o usuário dono dentro do escopo e então o documento por
    /// filename. Dono fora do tenant => `None`, como se não existisse.
    pub async fn find(
        &self,
        user_id: Uuid,
        filename: &str,
    ) -> Result<Option<(User, Document)>, AppError> {
        let Some(user) = self.scoped_users().find_by_id(user_id).await? else {
            return Ok(None);
        };

        let Some(document) = self
            .documents
            .find_by_user_and_filename(user.id, filename)
            .await?
        else {
            return Ok(None);
        };

        Ok(Some((user, document)))
    }

    pub async fn list_for(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let Some(user) = self.scoped_users().find_by_id(user_id).await? else {
            return Ok(Vec::new());
        };

        self.documents.list_by_user(user.id).await
    }

    /// Cria um documento para um usuário do tenant atual. Dono invisível
    /// no escopo => NotFound, nunca uma inserção órfã.
    pub async fn create_for(
        &self,
        user_id: Uuid,
        mut row: NewDocument,
    ) -> Result<Document, AppError> {
        if self.tenant_id.is_none() {
            return Err(AppError::Forbidden);
        }

        let Some(user) = self.scoped_users().find_by_id(user_id).await? else {
            return Err(AppError::NotFound);
        };

        row.user_id = user.id;
        self.documents.insert(row).await
    }
}
