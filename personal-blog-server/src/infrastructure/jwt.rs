use jsonwebtoken::{Algorithm, DecodingKey, Validation, decode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),
}

/// Claims carried by tokens from the identity provider.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) user_id: i64,
    pub(crate) username: String,
    pub(crate) exp: i64,
}

/// Verifies HS256 tokens signed with the secret shared with the identity provider.
pub(crate) struct JwtService {
    decoding_key: DecodingKey,
}

impl JwtService {
    const LEEWAY_SECONDS: u64 = 10;

    pub(crate) fn new(secret: &str) -> Self {
        JwtService {
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
        }
    }

    pub(crate) fn verify_token(&self, token: &str) -> Result<Claims, JwtError> {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = Self::LEEWAY_SECONDS;

        let token_data =
            decode::<Claims>(token, &self.decoding_key, &validation).map_err(JwtError::Decode)?;

        Ok(token_data.claims)
    }
}
