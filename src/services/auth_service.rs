use std::sync::Arc;

use crate::database::UserStore;
use crate::dto::auth_dto::{LoginPayload, SignupPayload};
use crate::error::{Error, Result};
use crate::models::user::{NewUser, User};
use crate::utils::crypto::{hash_password, verify_password};
use crate::utils::token::JwtKeys;

const INVALID_CREDENTIALS: &str = "Invalid email or password";

#[derive(Clone)]
pub struct AuthService {
    users: Arc<dyn UserStore>,
    keys: JwtKeys,
}

impl AuthService {
    pub fn new(users: Arc<dyn UserStore>, keys: JwtKeys) -> Self {
        Self { users, keys }
    }

    pub async fn register(&self, payload: SignupPayload) -> Result<User> {
        let email = payload.email.trim().to_lowercase();
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(Error::Conflict("Email already registered".into()));
        }

        let password_hash = hash_password(&payload.password)?;
        let user = self
            .users
            .create_user(NewUser {
                name: payload.name.trim().to_string(),
                email,
                password_hash,
                linkedin_url: payload.linkedin_url.filter(|u| !u.trim().is_empty()),
            })
            .await?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    /// Returns a bearer token and the authenticated user.
    pub async fn login(&self, payload: LoginPayload) -> Result<(String, User)> {
        let email = payload.email.trim().to_lowercase();
        let user = self
            .users
            .find_by_email(&email)
            .await?
            .ok_or_else(|| Error::Unauthorized(INVALID_CREDENTIALS.into()))?;

        if !verify_password(&payload.password, &user.password_hash) {
            tracing::warn!(user_id = %user.id, "Login rejected: wrong password");
            return Err(Error::Unauthorized(INVALID_CREDENTIALS.into()));
        }

        let token = self.keys.issue(user.id, &user.email)?;
        Ok((token, user))
    }

    /// Resolves a verified token subject to its account. A token for a
    /// deleted account is rejected like an invalid one.
    pub async fn current_user(&self, user_id: uuid::Uuid) -> Result<User> {
        self.users
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| Error::Unauthorized("Could not validate credentials".into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::memory::MemoryStore;

    fn service() -> AuthService {
        AuthService::new(Arc::new(MemoryStore::new()), JwtKeys::new("secret", 30))
    }

    fn signup(email: &str) -> SignupPayload {
        SignupPayload {
            name: "Ana".into(),
            email: email.into(),
            password: "hunter22".into(),
            linkedin_url: None,
        }
    }

    #[tokio::test]
    async fn register_then_login_issues_verifiable_token() {
        let auth = service();
        let user = auth.register(signup("Ana@Example.com")).await.unwrap();
        assert_eq!(user.email, "ana@example.com");
        assert_ne!(user.password_hash, "hunter22");

        let (token, logged_in) = auth
            .login(LoginPayload {
                email: "ana@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap();
        assert_eq!(logged_in.id, user.id);

        let claims = JwtKeys::new("secret", 30).verify(&token).unwrap();
        assert_eq!(claims.sub, user.id);
        assert_eq!(auth.current_user(claims.sub).await.unwrap().id, user.id);
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let auth = service();
        auth.register(signup("ana@example.com")).await.unwrap();
        let err = auth.register(signup("ANA@example.com")).await.unwrap_err();
        assert!(matches!(err, Error::Conflict(_)));
    }

    #[tokio::test]
    async fn wrong_password_and_unknown_email_are_unauthorized() {
        let auth = service();
        auth.register(signup("ana@example.com")).await.unwrap();

        let wrong = auth
            .login(LoginPayload {
                email: "ana@example.com".into(),
                password: "nope".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(wrong, Error::Unauthorized(_)));

        let unknown = auth
            .login(LoginPayload {
                email: "bob@example.com".into(),
                password: "hunter22".into(),
            })
            .await
            .unwrap_err();
        assert!(matches!(unknown, Error::Unauthorized(_)));
    }
}
