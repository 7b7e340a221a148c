// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::store::{UserFilter, UserStore},
    models::auth::{Claims, Principal},
};

// Colaborador de autenticação: transforma credenciais em token e token
// em `Principal`. É a única peça que consulta o armazenamento cru de
// usuários, porque antes da autenticação ainda não existe escopo.
#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, jwt_secret: String) -> Self {
        Self { users, jwt_secret }
    }

    pub async fn login_user(&self, email: &str, password: &str) -> Result<String, AppError> {
        let user = self
            .users
            .find(UserFilter::by_email(email))
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::InvalidCredentials)?;

        // Conta desativada não loga; a mensagem é a mesma de credencial
        // errada para não revelar o estado da conta.
        if !user.status {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = user.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))?
        ?;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(user.id)
    }

    // Decodifica o token e recarrega a linha do usuário: tenant e papel
    // saem sempre do banco, nunca de claims antigas.
    pub async fn validate_token(&self, token: &str) -> Result<Principal, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        let user = self
            .users
            .find(UserFilter::by_id(token_data.claims.sub))
            .await?
            .into_iter()
            .next()
            .ok_or(AppError::InvalidToken)?;

        if !user.status {
            return Err(AppError::InvalidToken);
        }

        Ok(Principal::from(&user))
    }

    fn create_token(&self, user_id: Uuid) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: user_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        // Usa '?' para um tratamento de erro mais limpo
        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}
