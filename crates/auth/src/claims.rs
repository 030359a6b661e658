use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use stockbook_core::PrincipalId;

use crate::Role;

/// Claims stockbook expects inside an access token.
///
/// The identity provider mints tokens; this is the minimal claim set a
/// decoded token must carry before we trust it. Timestamps travel as
/// standard numeric-date `iat`/`exp` claims.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AccessClaims {
    /// Subject / principal identifier.
    pub sub: PrincipalId,

    /// Display name, echoed into recorded movements.
    pub name: String,

    /// Role granted for this session.
    pub role: Role,

    /// Issued-at timestamp.
    #[serde(rename = "iat", with = "chrono::serde::ts_seconds")]
    pub issued_at: DateTime<Utc>,

    /// Expiration timestamp.
    #[serde(rename = "exp", with = "chrono::serde::ts_seconds")]
    pub expires_at: DateTime<Utc>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TokenValidationError {
    #[error("token has expired")]
    Expired,

    #[error("token not yet valid (issued_at is in the future)")]
    NotYetValid,

    #[error("invalid token time window (expires_at <= issued_at)")]
    InvalidTimeWindow,
}

/// Deterministically validate access-token claims.
///
/// Note: this validates the *claims* only. Signature verification / decoding
/// lives in [`crate::token`].
pub fn validate_claims(
    claims: &AccessClaims,
    now: DateTime<Utc>,
) -> Result<(), TokenValidationError> {
    if claims.expires_at <= claims.issued_at {
        return Err(TokenValidationError::InvalidTimeWindow);
    }
    if now < claims.issued_at {
        return Err(TokenValidationError::NotYetValid);
    }
    if now >= claims.expires_at {
        return Err(TokenValidationError::Expired);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, TimeZone, Utc};

    use super::*;

    fn claims_between(issued_at: DateTime<Utc>, expires_at: DateTime<Utc>) -> AccessClaims {
        AccessClaims {
            sub: PrincipalId::new(),
            name: "Dana".to_string(),
            role: Role::Admin,
            issued_at,
            expires_at,
        }
    }

    #[test]
    fn claims_within_window_validate() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now - Duration::minutes(5), now + Duration::minutes(55));
        assert_eq!(validate_claims(&claims, now), Ok(()));
    }

    #[test]
    fn expired_claims_are_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now - Duration::hours(2), now - Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn expiry_instant_counts_as_expired() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now - Duration::hours(1), now);
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::Expired)
        );
    }

    #[test]
    fn future_issued_at_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now + Duration::minutes(1), now + Duration::hours(1));
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::NotYetValid)
        );
    }

    #[test]
    fn inverted_window_is_rejected() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now, now - Duration::seconds(1));
        assert_eq!(
            validate_claims(&claims, now),
            Err(TokenValidationError::InvalidTimeWindow)
        );
    }

    #[test]
    fn claims_use_numeric_date_wire_names() {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 12, 0, 0).unwrap();
        let claims = claims_between(now, now + Duration::hours(1));
        let value = serde_json::to_value(&claims).unwrap();
        assert_eq!(value["iat"], serde_json::json!(now.timestamp()));
        assert_eq!(
            value["exp"],
            serde_json::json!((now + Duration::hours(1)).timestamp())
        );
        assert!(value.get("issued_at").is_none());
    }
}
