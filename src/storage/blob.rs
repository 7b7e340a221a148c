// src/storage/blob.rs

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum BlobError {
    #[error("Objeto não encontrado no armazenamento")]
    NotFound,

    #[error("Falha no backend de armazenamento: {0}")]
    Backend(String),
}

// Operações mínimas que qualquer backend de blobs precisa oferecer.
// A aplicação enxerga dois "buckets" lógicos: um público (fotos) e um
// privado (documentos), cada um sendo uma instância deste trait.
#[async_trait]
pub trait BlobStore: Send + Sync {
    /// Grava os bytes em `key` e retorna a referência gravada (a própria key).
    async fn put(&self, key: &str, bytes: Bytes) -> Result<String, BlobError>;

    /// Lê os bytes gravados em `key`.
    async fn get(&self, key: &str) -> Result<Bytes, BlobError>;
}
