// Testes do motor de escopo: isolamento de leitura, tenant forçado na
// escrita e comportamento do escopo anônimo.

mod common;

use uuid::Uuid;

use staffdesk::common::AppError;
use staffdesk::models::user::{Role, UserChanges};
use staffdesk::scoping::TenantScope;

use common::{new_user, principal_in, scoped_store};

#[tokio::test]
async fn a_user_can_only_see_users_in_the_same_tenant() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));
    let scope2 = TenantScope::for_principal(&principal_in(tenant2, Role::Admin));

    for i in 0..10 {
        store
            .users(&scope1)
            .create(new_user(&format!("t1-{}@lc.com", i)))
            .await
            .unwrap();
    }
    for i in 0..10 {
        store
            .users(&scope2)
            .create(new_user(&format!("t2-{}@lc.com", i)))
            .await
            .unwrap();
    }

    // Cada tenant enxerga exatamente os seus 10, independente do tamanho
    // do outro.
    let visible = store.users(&scope1).list().await.unwrap();
    assert_eq!(visible.len(), 10);
    assert!(visible.iter().all(|u| u.tenant_id == tenant1));
}

#[tokio::test]
async fn a_user_can_only_create_a_user_in_his_tenant_even_if_other_tenant_is_provided() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));

    let mut row = new_user("kevin@lc.com");
    row.tenant_id = tenant2; // valor malicioso do chamador

    let created = store.users(&scope1).create(row).await.unwrap();

    assert_eq!(created.tenant_id, tenant1);
    assert_ne!(created.tenant_id, tenant2);
}

#[tokio::test]
async fn cross_tenant_find_by_id_behaves_like_missing_row() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));
    let scope2 = TenantScope::for_principal(&principal_in(tenant2, Role::Admin));

    let created = store
        .users(&scope1)
        .create(new_user("kevin@lc.com"))
        .await
        .unwrap();

    // Linha de outro tenant e linha inexistente são indistinguíveis:
    // ambas viram Ok(None), nunca um erro diferente.
    let cross_tenant = store.users(&scope2).find_by_id(created.id).await.unwrap();
    let absent = store.users(&scope2).find_by_id(Uuid::new_v4()).await.unwrap();

    assert!(cross_tenant.is_none());
    assert!(absent.is_none());

    // No tenant dono a linha aparece normalmente.
    let own = store.users(&scope1).find_by_id(created.id).await.unwrap();
    assert_eq!(own.unwrap().id, created.id);
}

#[tokio::test]
async fn repeated_find_by_id_is_idempotent() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));
    let scope2 = TenantScope::for_principal(&principal_in(tenant2, Role::Admin));

    let created = store
        .users(&scope1)
        .create(new_user("kevin@lc.com"))
        .await
        .unwrap();

    // A decisão de visibilidade não muda entre chamadas.
    for _ in 0..3 {
        assert!(store.users(&scope1).find_by_id(created.id).await.unwrap().is_some());
        assert!(store.users(&scope2).find_by_id(created.id).await.unwrap().is_none());
    }
}

#[tokio::test]
async fn anonymous_scope_reads_nothing_and_cannot_write() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));
    store
        .users(&scope1)
        .create(new_user("kevin@lc.com"))
        .await
        .unwrap();

    let anonymous = TenantScope::anonymous();

    // Leituras sem tenant retornam o conjunto vazio, sem erro.
    assert!(store.users(&anonymous).list().await.unwrap().is_empty());
    assert!(store
        .users(&anonymous)
        .find_by_email("kevin@lc.com")
        .await
        .unwrap()
        .is_none());

    // Escritas sem tenant são recusadas; nunca caem em acesso sem escopo.
    let result = store.users(&anonymous).create(new_user("other@lc.com")).await;
    assert!(matches!(result, Err(AppError::Forbidden)));
}

#[tokio::test]
async fn updates_are_confined_to_the_tenant() {
    let store = scoped_store();
    let tenant1 = Uuid::new_v4();
    let tenant2 = Uuid::new_v4();

    let scope1 = TenantScope::for_principal(&principal_in(tenant1, Role::Admin));
    let scope2 = TenantScope::for_principal(&principal_in(tenant2, Role::Admin));

    let created = store
        .users(&scope1)
        .create(new_user("kevin@lc.com"))
        .await
        .unwrap();

    // Dentro do tenant o update funciona (ex.: desativação da conta).
    let changes = UserChanges { status: Some(false), ..Default::default() };
    let updated = store.users(&scope1).update(created.id, changes).await.unwrap();
    assert!(!updated.status);
    assert_eq!(updated.tenant_id, tenant1);

    // De outro tenant a linha é invisível: o update responde NotFound.
    let changes = UserChanges { name: Some("Hacked".to_string()), ..Default::default() };
    let result = store.users(&scope2).update(created.id, changes).await;
    assert!(matches!(result, Err(AppError::NotFound)));
}
