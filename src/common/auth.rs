use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};

use super::{app_error::AppError, config::AuthConfig};

/// Claims carried by the session tokens the hosted auth provider issues.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    pub sub: String,
    pub email: Option<String>,
    pub name: Option<String>,
    pub exp: usize,
}

/// The signed-in user, inserted into request extensions by the auth gate.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: String,
    pub email: Option<String>,
    pub name: Option<String>,
}

impl AuthUser {
    /// Display name, falling back to the email address.
    pub fn display_name(&self) -> Option<String> {
        self.name
            .clone()
            .filter(|name| !name.trim().is_empty())
            .or_else(|| self.email.clone())
    }
}

pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
    login_path: String,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        match &config.audience {
            Some(audience) => {
                validation.set_audience(&[audience]);
                validation.required_spec_claims.insert("aud".to_string());
            }
            None => validation.validate_aud = false,
        }

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
            login_path: config.login_path.clone(),
        }
    }

    pub fn login_path(&self) -> &str {
        &self.login_path
    }

    pub fn verify(&self, token: &str) -> Result<AuthUser, AppError> {
        let claims = decode::<SessionClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| AppError::Unauthorized(format!("Invalid session token: {err}")))?
            .claims;

        if claims.sub.trim().is_empty() {
            return Err(AppError::Unauthorized("Session token has no subject".into()));
        }

        Ok(AuthUser {
            user_id: claims.sub,
            email: claims.email,
            name: claims.name,
        })
    }
}
