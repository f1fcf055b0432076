use sea_orm::SqlErr;
use tokio_util::sync::CancellationToken;

use crate::{
    auth::{
        AuthError, JwtKeys, TokenBundle,
        jwt::{encode_token, make_access_claims},
        password::{hash_password, verify_password},
    },
    db::{
        dao::{DaoLayerError, UserDao},
        entities::user,
    },
};

const TOKEN_TYPE: &str = "Bearer";

#[derive(Clone)]
pub struct AuthService {
    user_dao: UserDao,
    jwt: JwtKeys,
    access_ttl_secs: usize,
}

impl AuthService {
    pub fn new(user_dao: UserDao, jwt: JwtKeys, access_ttl_secs: usize) -> Self {
        Self {
            user_dao,
            jwt,
            access_ttl_secs,
        }
    }

    pub async fn register(
        &self,
        cancel: &CancellationToken,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, AuthError> {
        let email = normalize_email(email)?;

        if self.user_dao.find_by_email(cancel, &email).await?.is_some() {
            return Err(AuthError::EmailTaken);
        }

        let password_hash = hash_password(password)?;
        // A concurrent registration can still win the race to the unique index.
        let user = match self.user_dao.create_user(cancel, &email, &password_hash).await {
            Ok(user) => user,
            Err(DaoLayerError::Db(err))
                if matches!(err.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
            {
                return Err(AuthError::EmailTaken);
            }
            Err(err) => return Err(err.into()),
        };

        self.issue_token(&user)
    }

    pub async fn login(
        &self,
        cancel: &CancellationToken,
        email: &str,
        password: &str,
    ) -> Result<TokenBundle, AuthError> {
        let email = normalize_email(email)?;
        let user = self
            .user_dao
            .find_by_email(cancel, &email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !verify_password(password, &user.password_hash)? {
            return Err(AuthError::InvalidCredentials);
        }

        self.issue_token(&user)
    }

    fn issue_token(&self, user: &user::Model) -> Result<TokenBundle, AuthError> {
        let claims = make_access_claims(user.id, self.access_ttl_secs);
        Ok(TokenBundle {
            access_token: encode_token(&self.jwt, &claims)?,
            token_type: TOKEN_TYPE,
            expires_in: self.access_ttl_secs,
        })
    }
}

fn normalize_email(email: &str) -> Result<String, AuthError> {
    let email = email.trim().to_ascii_lowercase();
    if email.is_empty() {
        return Err(AuthError::InvalidPayload("email is required".to_string()));
    }
    if !email.contains('@') {
        return Err(AuthError::InvalidPayload("email is not valid".to_string()));
    }
    Ok(email)
}
