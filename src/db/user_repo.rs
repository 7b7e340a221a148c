use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{UserFilter, UserStore},
    models::user::{NewUser, User, UserChanges},
};

// O repositório de usuários, responsável por todas as interações com a
// tabela 'users'. Não sabe nada de tenancy: recebe o filtro pronto.
#[derive(Clone)]
pub struct UserRepository {
    pool: PgPool,
}

impl UserRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for UserRepository {
    // Cria um novo usuário no banco de dados
    async fn insert(&self, row: NewUser) -> Result<User, AppError> {
        sqlx::query_as::<_, User>(
            r#"
            INSERT INTO users
                (tenant_id, name, email, department, title, photo_ref, status, role, password_hash)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(row.tenant_id)
        .bind(&row.name)
        .bind(&row.email)
        .bind(&row.department)
        .bind(&row.title)
        .bind(&row.photo_ref)
        .bind(row.status)
        .bind(row.role)
        .bind(&row.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            // Converte erro de violação de chave única em um erro mais amigável
            if let Some(db_err) = e.as_database_error() {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            AppError::DatabaseError(e)
        })
    }

    // Busca usuários combinando os campos do filtro com AND
    async fn find(&self, filter: UserFilter) -> Result<Vec<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("SELECT * FROM users WHERE 1=1");

        if let Some(id) = filter.id {
            qb.push(" AND id = ");
            qb.push_bind(id);
        }
        if let Some(email) = filter.email {
            qb.push(" AND email = ");
            qb.push_bind(email);
        }
        if let Some(tenant_id) = filter.tenant_id {
            qb.push(" AND tenant_id = ");
            qb.push_bind(tenant_id);
        }

        qb.push(" ORDER BY created_at, id");

        let users = qb
            .build_query_as::<User>()
            .fetch_all(&self.pool)
            .await?;

        Ok(users)
    }

    async fn update(&self, id: Uuid, changes: UserChanges) -> Result<Option<User>, AppError> {
        let mut qb = QueryBuilder::<Postgres>::new("UPDATE users SET updated_at = now()");

        if let Some(name) = changes.name {
            qb.push(", name = ");
            qb.push_bind(name);
        }
        if let Some(department) = changes.department {
            qb.push(", department = ");
            qb.push_bind(department);
        }
        if let Some(title) = changes.title {
            qb.push(", title = ");
            qb.push_bind(title);
        }
        if let Some(photo_ref) = changes.photo_ref {
            qb.push(", photo_ref = ");
            qb.push_bind(photo_ref);
        }
        if let Some(status) = changes.status {
            qb.push(", status = ");
            qb.push_bind(status);
        }

        qb.push(" WHERE id = ");
        qb.push_bind(id);
        qb.push(" RETURNING *");

        let user = qb
            .build_query_as::<User>()
            .fetch_optional(&self.pool)
            .await?;

        Ok(user)
    }

    async fn delete(&self, id: Uuid) -> Result<(), AppError> {
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}
