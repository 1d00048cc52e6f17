//! Bearer-token extraction, JWT verification and permission checks.

use std::collections::BTreeSet;

use axum::http::{header::AUTHORIZATION, HeaderMap};
use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, errors::ErrorKind, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::SecurityConfig;

pub mod permissions {
    pub const GET_DRINKS_DETAIL: &str = "get:drinks-detail";
    pub const POST_DRINKS: &str = "post:drinks";
    pub const PATCH_DRINKS: &str = "patch:drinks";
    pub const DELETE_DRINKS: &str = "delete:drinks";

    pub const GET_DONORS: &str = "get:donors";
    pub const POST_DONORS: &str = "post:donors";
    pub const PATCH_DONORS: &str = "patch:donors";
    pub const DELETE_DONORS: &str = "delete:donors";
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AuthError {
    #[error("authorization header is expected")]
    MissingHeader,

    #[error("authorization header must be 'Bearer <token>'")]
    MalformedHeader,

    #[error("authorization header must start with 'Bearer'")]
    InvalidScheme,

    #[error("token expired")]
    TokenExpired,

    #[error("invalid token: {0}")]
    TokenInvalid(String),

    #[error("permission '{0}' not granted")]
    MissingPermission(String),

    #[error("token verifier misconfigured: {0}")]
    Misconfigured(String),
}

/// Claims carried by access tokens. Permissions may arrive either as the
/// `permissions` array or the space-delimited `scope` claim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub permissions: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scope: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    pub exp: i64,
    #[serde(default)]
    pub iat: i64,
}

impl Claims {
    /// Claims issued now and expiring `expiry_hours` later. Lifetimes that
    /// overflow the clock are rejected.
    pub fn new(subject: impl Into<String>, permissions: Vec<String>, expiry_hours: u64) -> Result<Self, AuthError> {
        let now = Utc::now();
        let lifetime = i64::try_from(expiry_hours)
            .ok()
            .and_then(Duration::try_hours)
            .ok_or_else(|| AuthError::Misconfigured(format!("token lifetime of {} hours is too long", expiry_hours)))?;
        let exp = now
            .checked_add_signed(lifetime)
            .ok_or_else(|| AuthError::Misconfigured(format!("token lifetime of {} hours is too long", expiry_hours)))?;

        Ok(Self {
            sub: subject.into(),
            permissions,
            scope: None,
            iss: None,
            exp: exp.timestamp(),
            iat: now.timestamp(),
        })
    }
}

/// Verified identity handed to protected handlers
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Identity {
    pub subject: String,
    pub permissions: BTreeSet<String>,
}

impl Identity {
    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions.contains(permission)
    }
}

impl From<Claims> for Identity {
    fn from(claims: Claims) -> Self {
        let mut permissions: BTreeSet<String> = claims.permissions.into_iter().collect();
        if let Some(scope) = claims.scope {
            permissions.extend(scope.split_whitespace().map(str::to_string));
        }

        Self {
            subject: claims.sub,
            permissions,
        }
    }
}

/// Pull the raw token out of `Authorization: Bearer <token>`.
///
/// The header is split on single spaces and must produce exactly two parts,
/// the first of which is `bearer` in any case.
pub fn extract_bearer_token(headers: &HeaderMap) -> Result<&str, AuthError> {
    let value = headers.get(AUTHORIZATION).ok_or(AuthError::MissingHeader)?;
    let value = value.to_str().map_err(|_| AuthError::MalformedHeader)?;

    let parts: Vec<&str> = value.split(' ').collect();
    if parts.len() != 2 {
        return Err(AuthError::MalformedHeader);
    }
    if !parts[0].eq_ignore_ascii_case("bearer") {
        return Err(AuthError::InvalidScheme);
    }
    if parts[1].is_empty() {
        return Err(AuthError::MalformedHeader);
    }

    Ok(parts[1])
}

/// Checks a raw bearer token and returns the identity it proves.
pub trait TokenVerifier: Send + Sync {
    fn verify(&self, token: &str) -> Result<Identity, AuthError>;
}

/// `jsonwebtoken`-backed verifier: RS256 against a public key, or HS256
/// against a shared secret.
pub struct JwtVerifier {
    key: DecodingKey,
    validation: Validation,
}

impl JwtVerifier {
    pub fn hs256(secret: &str) -> Self {
        Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation: Self::validation(Algorithm::HS256),
        }
    }

    pub fn rs256(public_key_pem: &str) -> Result<Self, AuthError> {
        let key = DecodingKey::from_rsa_pem(public_key_pem.as_bytes())
            .map_err(|e| AuthError::Misconfigured(format!("bad public key: {}", e)))?;
        Ok(Self {
            key,
            validation: Self::validation(Algorithm::RS256),
        })
    }

    /// Build from config; the public key wins over the secret when both are set.
    /// `jwt_public_key` may hold the PEM itself or a path to it.
    pub fn from_config(security: &SecurityConfig) -> Result<Self, AuthError> {
        let verifier = match (&security.jwt_public_key, &security.jwt_secret) {
            (Some(key), _) => {
                let pem = if key.trim_start().starts_with("-----BEGIN") {
                    key.clone()
                } else {
                    std::fs::read_to_string(key)
                        .map_err(|e| AuthError::Misconfigured(format!("cannot read {}: {}", key, e)))?
                };
                Self::rs256(&pem)?
            }
            (None, Some(secret)) => Self::hs256(secret),
            (None, None) => {
                return Err(AuthError::Misconfigured(
                    "set SECURITY_JWT_PUBLIC_KEY or SECURITY_JWT_SECRET".to_string(),
                ))
            }
        };

        Ok(verifier
            .with_issuer(security.jwt_issuer.as_deref())
            .with_audience(security.jwt_audience.as_deref()))
    }

    pub fn with_issuer(mut self, issuer: Option<&str>) -> Self {
        if let Some(issuer) = issuer {
            self.validation.set_issuer(&[issuer]);
        }
        self
    }

    pub fn with_audience(mut self, audience: Option<&str>) -> Self {
        match audience {
            Some(audience) => {
                self.validation.validate_aud = true;
                self.validation.set_audience(&[audience]);
            }
            None => self.validation.validate_aud = false,
        }
        self
    }

    fn validation(algorithm: Algorithm) -> Validation {
        let mut validation = Validation::new(algorithm);
        validation.set_required_spec_claims(&["exp", "sub"]);
        validation.validate_aud = false;
        validation
    }
}

impl TokenVerifier for JwtVerifier {
    fn verify(&self, token: &str) -> Result<Identity, AuthError> {
        decode::<Claims>(token, &self.key, &self.validation)
            .map(|data| Identity::from(data.claims))
            .map_err(|e| match e.kind() {
                ErrorKind::ExpiredSignature => AuthError::TokenExpired,
                _ => AuthError::TokenInvalid(e.to_string()),
            })
    }
}

/// Mint an HS256 token for local development and tests.
pub fn generate_jwt(claims: &Claims, secret: &str) -> Result<String, AuthError> {
    if secret.is_empty() {
        return Err(AuthError::Misconfigured("empty JWT secret".to_string()));
    }

    let encoding_key = EncodingKey::from_secret(secret.as_bytes());
    encode(&Header::new(Algorithm::HS256), claims, &encoding_key)
        .map_err(|e| AuthError::Misconfigured(format!("JWT generation error: {}", e)))
}
