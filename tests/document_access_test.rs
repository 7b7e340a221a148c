// Testes do gateway de documentos: papel exigido, invisibilidade entre
// tenants, extensões suportadas e falha de armazenamento.

mod common;

use std::sync::Arc;

use bytes::Bytes;
use uuid::Uuid;

use staffdesk::common::AppError;
use staffdesk::models::document::{DocumentType, NewDocument};
use staffdesk::models::user::{Role, User};
use staffdesk::scoping::{ScopedStore, TenantScope};
use staffdesk::services::DocumentService;
use staffdesk::storage::{BlobStore, MemoryBlobStore};

use common::{new_user, principal_in, scoped_store};

const PDF_BYTES: &[u8] = b"%PDF-1.4 conteudo";

// Cria um usuário no tenant com um documento pdf registrado e o objeto
// correspondente no bucket privado.
async fn seed_user_with_pdf(
    store: &ScopedStore,
    blobs: &MemoryBlobStore,
    tenant_id: Uuid,
    filename: &str,
) -> User {
    let scope = TenantScope::for_principal(&principal_in(tenant_id, Role::Admin));

    let user = store
        .users(&scope)
        .create(new_user(&format!("{}@lc.com", Uuid::new_v4().simple())))
        .await
        .unwrap();

    store
        .documents(&scope)
        .create_for(
            user.id,
            NewDocument {
                user_id: user.id,
                kind: DocumentType::Application,
                filename: filename.to_string(),
                extension: filename.rsplit_once('.').unwrap().1.to_string(),
                size: PDF_BYTES.len() as i64,
            },
        )
        .await
        .unwrap();

    blobs
        .put(
            &format!("documents/{}/{}", user.id, filename),
            Bytes::from_static(PDF_BYTES),
        )
        .await
        .unwrap();

    user
}

#[tokio::test]
async fn an_admin_in_the_tenant_receives_the_pdf_bytes() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let user = seed_user_with_pdf(&store, &blobs, tenant1, "resume_1700000000.pdf").await;

    let admin = principal_in(tenant1, Role::Admin);
    let (content_type, bytes) = service
        .fetch(&admin, user.id, "resume_1700000000.pdf")
        .await
        .unwrap();

    assert_eq!(content_type, "application/pdf");
    assert_eq!(bytes.as_ref(), PDF_BYTES);
}

#[tokio::test]
async fn a_non_admin_is_always_refused_regardless_of_tenant() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();
    let user = seed_user_with_pdf(&store, &blobs, tenant1, "resume_1700000000.pdf").await;

    // Mesmo tenant, documento existente: ainda assim Forbidden.
    let member_same_tenant = principal_in(tenant1, Role::Member);
    let result = service
        .fetch(&member_same_tenant, user.id, "resume_1700000000.pdf")
        .await;
    assert!(matches!(result, Err(AppError::Forbidden)));

    // Outro tenant e filename inexistente: a resposta não muda.
    let member_other_tenant = principal_in(tenant2, Role::Member);
    let result = service.fetch(&member_other_tenant, user.id, "nope.pdf").await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn an_admin_cannot_see_documents_of_another_tenant() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();
    let user = seed_user_with_pdf(&store, &blobs, tenant1, "resume_1700000000.pdf").await;

    // O dono está em outro tenant: NotFound, jamais os bytes. A resposta
    // é idêntica à de um documento que não existe.
    let admin_other_tenant = principal_in(tenant2, Role::Admin);
    let result = service
        .fetch(&admin_other_tenant, user.id, "resume_1700000000.pdf")
        .await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn a_missing_document_is_not_found() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let user = seed_user_with_pdf(&store, &blobs, tenant1, "resume_1700000000.pdf").await;

    let admin = principal_in(tenant1, Role::Admin);
    let result = service.fetch(&admin, user.id, "outro-arquivo.pdf").await;
    assert!(matches!(result, Err(AppError::NotFound)));
}

#[tokio::test]
async fn an_unknown_extension_is_unsupported_media() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let user = seed_user_with_pdf(&store, &blobs, tenant1, "resume_1700000000.docx").await;

    // Linha existe, admin no tenant certo, mas a extensão não tem
    // content-type conhecido: 415, nunca bytes com header chutado.
    let admin = principal_in(tenant1, Role::Admin);
    let result = service
        .fetch(&admin, user.id, "resume_1700000000.docx")
        .await;
    assert!(matches!(result, Err(AppError::UnsupportedMedia(ref ext)) if ext == "docx"));
}

#[tokio::test]
async fn a_row_without_its_blob_surfaces_a_storage_error() {
    let store = scoped_store();
    let blobs = MemoryBlobStore::new();
    let service = DocumentService::new(store.clone(), Arc::new(blobs.clone()));

    let tenant1 = Uuid::new_v4();
    let scope = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));

    let user = store
        .users(&scope)
        .create(new_user("kevin@lc.com"))
        .await
        .unwrap();

    // Linha registrada, mas nenhum objeto no bucket.
    store
        .documents(&scope)
        .create_for(
            user.id,
            NewDocument {
                user_id: user.id,
                kind: DocumentType::Application,
                filename: "resume_1700000000.pdf".to_string(),
                extension: "pdf".to_string(),
                size: 10,
            },
        )
        .await
        .unwrap();

    let admin = principal_in(tenant1, Role::Admin);
    let result = service
        .fetch(&admin, user.id, "resume_1700000000.pdf")
        .await;
    assert!(matches!(result, Err(AppError::Storage(_))));
}
