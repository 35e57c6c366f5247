use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use serde::Deserialize;

use super::model::CallerIdentity;
use crate::core::config::AuthConfig;
use crate::core::error::AppError;

/// Validates gateway-issued HS256 bearer tokens.
///
/// The upstream gateway signs short-lived tokens with a shared secret; there
/// is no key rotation endpoint to poll, so validation is fully local.
pub struct TokenValidator {
    decoding_key: DecodingKey,
    issuer: String,
    leeway: u64,
}

#[derive(Debug, Clone, Deserialize)]
struct Claims {
    sub: String,
    #[serde(rename = "iss")]
    _iss: String,
    #[serde(rename = "exp")]
    _exp: u64,
    #[serde(default)]
    email: Option<String>,
}

impl TokenValidator {
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            decoding_key: DecodingKey::from_secret(config.token_secret.as_bytes()),
            issuer: config.issuer.clone(),
            leeway: config.leeway.as_secs(),
        }
    }

    pub fn validate_token(&self, token: &str) -> Result<CallerIdentity, AppError> {
        let header = decode_header(token).map_err(|e| AppError::Unauthorized(e.to_string()))?;

        if header.alg != Algorithm::HS256 {
            return Err(AppError::Unauthorized(format!(
                "Unsupported algorithm: {:?}. Only HS256 is allowed",
                header.alg
            )));
        }

        let mut validation = Validation::new(Algorithm::HS256);
        validation.set_issuer(&[&self.issuer]);
        validation.leeway = self.leeway;

        let token_data = decode::<Claims>(token, &self.decoding_key, &validation)
            .map_err(|e| AppError::Unauthorized(e.to_string()))?;

        let claims = token_data.claims;

        if claims.sub.is_empty() {
            return Err(AppError::Unauthorized("Token has empty subject".to_string()));
        }

        Ok(CallerIdentity {
            subject: claims.sub,
            email: claims.email,
        })
    }
}
