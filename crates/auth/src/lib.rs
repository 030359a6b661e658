//! Authentication and authorization boundary for stockbook.
//!
//! Tokens are minted elsewhere; this crate only verifies them. A bearer
//! token is decoded into [`AccessClaims`], the claims are checked against
//! the clock, and the result is a [`Principal`] the rest of the system can
//! trust. Role checks live on [`Role`] so handlers never inspect raw
//! claims.

pub mod claims;
pub mod principal;
pub mod roles;
pub mod token;

pub use claims::{validate_claims, AccessClaims, TokenValidationError};
pub use principal::Principal;
pub use roles::Role;
pub use stockbook_core::PrincipalId;
pub use token::{Hs256TokenVerifier, VerifyError};
