// Infra compartilhada dos testes de integração: stores em memória e
// construtores de principals e payloads.
#![allow(dead_code)]

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use staffdesk::db::{MemoryDocumentStore, MemoryUserStore};
use staffdesk::models::auth::Principal;
use staffdesk::models::user::{NewUser, ProvisionUserPayload, Role};
use staffdesk::scoping::ScopedStore;
use staffdesk::services::provisioning_service::UploadedFile;

pub fn scoped_store() -> ScopedStore {
    ScopedStore::new(
        Arc::new(MemoryUserStore::new()),
        Arc::new(MemoryDocumentStore::new()),
    )
}

pub fn principal_in(tenant_id: Uuid, role: Role) -> Principal {
    Principal {
        id: Uuid::new_v4(),
        tenant_id,
        role,
    }
}

pub fn new_user(email: &str) -> NewUser {
    NewUser {
        // Valor que um chamador forneceria; o escopo sempre sobrescreve.
        tenant_id: Uuid::new_v4(),
        name: "Kevin McKee".to_string(),
        email: email.to_string(),
        department: "Information Technology".to_string(),
        title: "Instructor".to_string(),
        photo_ref: None,
        status: true,
        role: Role::Member,
        password_hash: "hash-irrelevante".to_string(),
    }
}

pub fn provision_payload(email: &str) -> ProvisionUserPayload {
    ProvisionUserPayload {
        name: "Kevin McKee".to_string(),
        email: email.to_string(),
        department: "Information Technology".to_string(),
        title: "Instructor".to_string(),
        status: true,
        role: "Admin".to_string(),
        tenant_id: None,
    }
}

pub fn photo_upload() -> UploadedFile {
    UploadedFile {
        filename: "kevin.png".to_string(),
        content_type: Some("image/png".to_string()),
        bytes: Bytes::from_static(b"png-bytes"),
    }
}

pub fn application_upload() -> UploadedFile {
    UploadedFile {
        filename: "kevin resume.pdf".to_string(),
        content_type: Some("application/pdf".to_string()),
        bytes: Bytes::from_static(b"%PDF-1.4 fake"),
    }
}
