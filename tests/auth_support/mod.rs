#![allow(dead_code)]

use std::sync::Mutex;

use instacrew::auth::{AuthError, AuthStore, ClientCredentials, Token};

#[derive(Default)]
pub struct InMemoryAuthStore {
    credentials: Mutex<Option<ClientCredentials>>,
    token: Mutex<Option<Token>>,
}

impl InMemoryAuthStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn seeded(credentials: Option<ClientCredentials>, token: Option<Token>) -> Self {
        Self {
            credentials: Mutex::new(credentials),
            token: Mutex::new(token),
        }
    }

    pub fn token(&self) -> Option<Token> {
        self.token.lock().expect("store lock poisoned").clone()
    }

    pub fn credentials(&self) -> Option<ClientCredentials> {
        self.credentials.lock().expect("store lock poisoned").clone()
    }
}

impl AuthStore for InMemoryAuthStore {
    fn load_credentials(&self) -> Result<Option<ClientCredentials>, AuthError> {
        Ok(self.credentials())
    }

    fn save_credentials(&self, credentials: &ClientCredentials) -> Result<(), AuthError> {
        *self.credentials.lock().expect("store lock poisoned") = Some(credentials.clone());
        Ok(())
    }

    fn load_token(&self) -> Result<Option<Token>, AuthError> {
        Ok(self.token())
    }

    fn save_token(&self, token: &Token) -> Result<(), AuthError> {
        *self.token.lock().expect("store lock poisoned") = Some(token.clone());
        Ok(())
    }
}

pub fn app_credentials() -> ClientCredentials {
    ClientCredentials::new("app-id", "app-secret", "https://localhost:8000/callback")
}
