// src/storage/fs.rs

use async_trait::async_trait;
use bytes::Bytes;
use std::path::{Path, PathBuf};

use crate::storage::blob::{BlobError, BlobStore};

// Backend de blobs no sistema de arquivos local, abaixo de um diretório
// raiz configurado. As keys usam '/' como separador (ex.:
// "documents/{user_id}/{filename}") e viram subdiretórios.
#[derive(Clone)]
pub struct FsBlobStore {
    root: PathBuf,
}

impl FsBlobStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    // Monta o caminho completo, recusando componentes que escapariam
    // do diretório raiz.
    fn resolve(&self, key: &str) -> Result<PathBuf, BlobError> {
        let mut path = self.root.clone();
        for part in key.split('/') {
            if part.is_empty() || part == "." || part == ".." || Path::new(part).is_absolute() {
                return Err(BlobError::Backend(format!("Key inválida: {}", key)));
            }
            path.push(part);
        }
        Ok(path)
    }
}

#[async_trait]
impl BlobStore for FsBlobStore {
    async fn put(&self, key: &str, bytes: Bytes) -> Result<String, BlobError> {
        let path = self.resolve(key)?;

        if let Some(parent) = path.parent() {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| BlobError::Backend(e.to_string()))?;
        }

        tokio::fs::write(&path, &bytes)
            .await
            .map_err(|e| BlobError::Backend(e.to_string()))?;

        Ok(key.to_string())
    }

    async fn get(&self, key: &str) -> Result<Bytes, BlobError> {
        let path = self.resolve(key)?;

        match tokio::fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(BlobError::NotFound),
            Err(e) => Err(BlobError::Backend(e.to_string())),
        }
    }
}
