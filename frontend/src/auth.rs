//! Session lookup, sign-in and sign-out against `/api/session`.

use crate::store::{decode, encode, send, StoreError};
use async_trait::async_trait;
use shared::{Session, SignInRequest};

const SESSION_URL: &str = "/api/session";

#[async_trait(?Send)]
pub trait AuthService {
    /// `None` when nobody is signed in.
    async fn current_session(&self) -> Result<Option<Session>, StoreError>;

    async fn sign_in(&self, email: String) -> Result<Session, StoreError>;

    async fn sign_out(&self) -> Result<(), StoreError>;
}

#[derive(Debug, Clone, Default)]
pub struct HttpAuth;

#[async_trait(?Send)]
impl AuthService for HttpAuth {
    async fn current_session(&self) -> Result<Option<Session>, StoreError> {
        match send("GET", SESSION_URL, None).await {
            Ok(body) => decode(&body).map(Some),
            Err(StoreError::Status(401)) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn sign_in(&self, email: String) -> Result<Session, StoreError> {
        let body = send("POST", SESSION_URL, Some(encode(&SignInRequest { email })?)).await?;
        decode(&body)
    }

    async fn sign_out(&self) -> Result<(), StoreError> {
        send("DELETE", SESSION_URL, None).await?;
        Ok(())
    }
}
