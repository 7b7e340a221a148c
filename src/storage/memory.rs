// src/storage/memory.rs

use async_trait::async_trait;
use bytes::Bytes;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::storage::blob::{BlobError, BlobStore};

// Backend de blobs em memória, usado nos testes de integração e em
// desenvolvimento local sem um bucket real.
#[derive(Clone, Default)]
pub struct MemoryBlobStore {
    objects: Arc<RwLock<HashMap<String, Bytes>>>,
}

impl MemoryBlobStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Quantidade de objetos gravados (útil em asserções de teste).
    pub async fn len(&self) -> usize {
        self.objects.read().await.len()
    }

    pub async fn contains(&self, key: &str) -> bool {
        self.objects.read().await.contains_key(key)
    }
}

#[async_trait]
impl BlobStore for MemoryBlobStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<String, BlobError> {
        self.objects.write().await.insert(key.to_string(), bytes);
        Ok(key.to_string())
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        self.objects
            .read()
            .await
            .get(key)
            .cloned()
            .ok_or(BlobError::NotFound)
    }
}
