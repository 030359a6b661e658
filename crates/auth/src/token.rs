use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use thiserror::Error;

use crate::{validate_claims, AccessClaims, Principal, TokenValidationError};

/// Verifies HS256-signed access tokens from the identity provider.
///
/// Signature checking is delegated to `jsonwebtoken`; time-window checks
/// happen in [`validate_claims`] against an explicit clock, so the library's
/// own `exp` handling stays off.
#[derive(Clone)]
pub struct Hs256TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl Hs256TokenVerifier {
    pub fn new(secret: &[u8]) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.required_spec_claims.clear();
        validation.validate_exp = false;
        Self {
            decoding_key: DecodingKey::from_secret(secret),
            validation,
        }
    }

    /// Decode and verify `token`, producing the [`Principal`] it asserts.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Result<Principal, VerifyError> {
        let data = decode::<AccessClaims>(token, &self.decoding_key, &self.validation)
            .map_err(|err| VerifyError::Decode(err.to_string()))?;
        validate_claims(&data.claims, now)?;
        Ok(Principal::from(&data.claims))
    }
}

#[derive(Debug, Error)]
pub enum VerifyError {
    #[error("token rejected: {0}")]
    Decode(String),

    #[error(transparent)]
    Claims(#[from] TokenValidationError),
}
