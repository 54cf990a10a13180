// src/services/auth.rs

use bcrypt::verify;
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};

use crate::{
    common::error::AppError,
    models::auth::{Claims, Operator},
};

const TOKEN_TTL_DAYS: i64 = 7;

#[derive(Clone)]
pub struct AuthService {
    operator: Operator,
    password_hash: String,
    jwt_secret: String,
}

impl AuthService {
    pub fn new(operator: Operator, password_hash: String, jwt_secret: String) -> Self {
        Self { operator, password_hash, jwt_secret }
    }

    pub async fn login(&self, email: &str, password: &str) -> Result<String, AppError> {
        if !email.trim().eq_ignore_ascii_case(&self.operator.email) {
            return Err(AppError::InvalidCredentials);
        }

        let password_clone = password.to_owned();
        let password_hash_clone = self.password_hash.clone();

        // Executa a verificação em um thread separado
        let is_password_valid = tokio::task::spawn_blocking(move || {
            verify(&password_clone, &password_hash_clone)
        })
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !is_password_valid {
            return Err(AppError::InvalidCredentials);
        }

        tracing::info!("🔑 Login do operador {}", self.operator.email);
        self.create_token()
    }

    pub fn validate_token(&self, token: &str) -> Result<Operator, AppError> {
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &Validation::default(),
        )
        .map_err(|_| AppError::InvalidToken)?;

        // Token de outro operador (ex.: e-mail trocado na configuração)
        if !token_data.claims.sub.eq_ignore_ascii_case(&self.operator.email) {
            return Err(AppError::InvalidToken);
        }

        Ok(self.operator.clone())
    }

    fn create_token(&self) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(TOKEN_TTL_DAYS);

        let claims = Claims {
            sub: self.operator.email.clone(),
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn service(secret: &str) -> AuthService {
        let hash = bcrypt::hash("s3cret", 4).unwrap();
        AuthService::new(
            Operator { email: "me@studio.dev".into(), name: "Me".into() },
            hash,
            secret.into(),
        )
    }

    #[tokio::test]
    async fn login_then_validate() {
        let auth = service("secret-a");
        let token = auth.login("ME@studio.dev", "s3cret").await.unwrap();
        let operator = auth.validate_token(&token).unwrap();
        assert_eq!(operator.email, "me@studio.dev");
    }

    #[tokio::test]
    async fn wrong_password_or_email_is_rejected() {
        let auth = service("secret-a");
        assert!(matches!(
            auth.login("me@studio.dev", "nope").await,
            Err(AppError::InvalidCredentials)
        ));
        assert!(matches!(
            auth.login("other@studio.dev", "s3cret").await,
            Err(AppError::InvalidCredentials)
        ));
    }

    #[tokio::test]
    async fn token_from_other_secret_is_invalid() {
        let token = service("secret-a").login("me@studio.dev", "s3cret").await.unwrap();
        assert!(matches!(
            service("secret-b").validate_token(&token),
            Err(AppError::InvalidToken)
        ));
    }
}
