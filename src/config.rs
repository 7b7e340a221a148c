// src/config.rs

use sqlx::{postgres::PgPoolOptions, PgPool};
use std::{env, sync::Arc, time::Duration};

use crate::{
    db::{DocumentRepository, UserRepository},
    scoping::ScopedStore,
    services::{AuthService, DocumentService, ProvisioningService},
    storage::{BlobStore, FsBlobStore},
};

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub store: ScopedStore,
    pub auth_service: AuthService,
    pub document_service: DocumentService,
    pub provisioning_service: ProvisioningService,
}

impl AppState {
    // A assinatura retorna um Result: se a configuração falhar, quem
    // chama decide abortar.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let storage_root = env::var("STORAGE_ROOT").unwrap_or_else(|_| "storage".to_string());

        // Conecta ao banco de dados, usando '?' para propagar erros
        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // Dois buckets lógicos: fotos são públicas, documentos privados.
        let public_blobs: Arc<dyn BlobStore> =
            Arc::new(FsBlobStore::new(format!("{}/public", storage_root)));
        let private_blobs: Arc<dyn BlobStore> =
            Arc::new(FsBlobStore::new(format!("{}/private", storage_root)));

        // --- Monta o gráfico de dependências ---
        let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
        let document_repo = Arc::new(DocumentRepository::new(db_pool.clone()));

        let store = ScopedStore::new(user_repo.clone(), document_repo);
        let auth_service = AuthService::new(user_repo, jwt_secret);
        let document_service = DocumentService::new(store.clone(), private_blobs.clone());
        let provisioning_service =
            ProvisioningService::new(store.clone(), public_blobs, private_blobs);

        // Retorna Ok com o estado montado
        Ok(Self {
            db_pool,
            store,
            auth_service,
            document_service,
            provisioning_service,
        })
    }
}
