// src/db/document_repo.rs

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::DocumentStore,
    models::document::{Document, NewDocument},
};

#[derive(Clone)]
pub struct DocumentRepository {
    pool: PgPool,
}

impl DocumentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DocumentStore for DocumentRepository {
    async fn insert(&self, row: NewDocument) -> Result<Document, AppError> {
        let document = sqlx::query_as::<_, Document>(
            r#"
            INSERT INTO documents (user_id, type, filename, extension, size)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING *
            "#,
        )
        .bind(row.user_id)
        .bind(row.kind)
        .bind(&row.filename)
        .bind(&row.extension)
        .bind(row.size)
        .fetch_one(&self.pool)
        .await?;

        Ok(document)
    }

    async fn find_by_user_and_filename(
        &self,
        user_id: Uuid,
        filename: &str,
    ) -> Result<Option<Document>, AppError> {
        let document = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 AND filename = $2",
        )
        .bind(user_id)
        .bind(filename)
        .fetch_optional(&self.pool)
        .await?;

        Ok(document)
    }

    async fn list_by_user(&self, user_id: Uuid) -> Result<Vec<Document>, AppError> {
        let documents = sqlx::query_as::<_, Document>(
            "SELECT * FROM documents WHERE user_id = $1 ORDER BY created_at, id",
        )
        .bind(user_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(documents)
    }
}
