use std::sync::Arc;

use axum::{
    extract::{Request, State},
    http::HeaderMap,
    middleware::Next,
    response::Response,
};

use crate::auth::{extract_bearer_token, AuthError, Identity, TokenVerifier};
use crate::error::ApiError;

/// Route-level authorization: a verifier plus the permission a route requires.
///
/// One guard is built per protected route and attached with
/// `route_layer(from_fn_with_state(guard, require_scope))`.
#[derive(Clone)]
pub struct ScopeGuard {
    verifier: Arc<dyn TokenVerifier>,
    required: Option<&'static str>,
}

impl ScopeGuard {
    /// Guard that only requires a verified token
    pub fn authenticated(verifier: Arc<dyn TokenVerifier>) -> Self {
        Self {
            verifier,
            required: None,
        }
    }

    /// Same verifier, additionally requiring `permission`
    pub fn requiring(&self, permission: &'static str) -> Self {
        Self {
            verifier: Arc::clone(&self.verifier),
            required: Some(permission),
        }
    }

    pub fn required(&self) -> Option<&'static str> {
        self.required
    }

    pub fn authorize(&self, headers: &HeaderMap) -> Result<Identity, AuthError> {
        let token = extract_bearer_token(headers)?;
        let identity = self.verifier.verify(token)?;

        if let Some(permission) = self.required {
            if !identity.has_permission(permission) {
                return Err(AuthError::MissingPermission(permission.to_string()));
            }
        }

        Ok(identity)
    }
}

/// Middleware that verifies the bearer token, checks the guard's permission and
/// injects the [`Identity`] for the handler
pub async fn require_scope(
    State(guard): State<ScopeGuard>,
    mut request: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let identity = guard.authorize(request.headers()).map_err(|err| {
        tracing::warn!(
            "Rejected {} {} (requires {}): {}",
            request.method(),
            request.uri().path(),
            guard.required().unwrap_or("a bearer token"),
            err
        );
        ApiError::from(err)
    })?;

    tracing::debug!(
        "Authorized '{}' for {} {}",
        identity.subject,
        request.method(),
        request.uri().path()
    );

    request.extensions_mut().insert(identity);
    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{header::AUTHORIZATION, HeaderValue};
    use std::collections::BTreeSet;

    /// Accepts any token and grants the permissions it lists, comma separated
    struct ListVerifier;

    impl TokenVerifier for ListVerifier {
        fn verify(&self, token: &str) -> Result<Identity, AuthError> {
            if token == "bad" {
                return Err(AuthError::TokenInvalid("bad signature".into()));
            }
            Ok(Identity {
                subject: "tester".into(),
                permissions: token.split(',').map(str::to_string).collect::<BTreeSet<_>>(),
            })
        }
    }

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(&format!("Bearer {}", token)).unwrap());
        headers
    }

    #[test]
    fn authenticated_guard_accepts_any_verified_token() {
        let guard = ScopeGuard::authenticated(Arc::new(ListVerifier));
        assert_eq!(guard.authorize(&bearer("nothing")).unwrap().subject, "tester");
        assert_eq!(guard.authorize(&HeaderMap::new()), Err(AuthError::MissingHeader));
        assert!(matches!(guard.authorize(&bearer("bad")), Err(AuthError::TokenInvalid(_))));
    }

    #[test]
    fn scoped_guard_checks_permission() {
        let guard = ScopeGuard::authenticated(Arc::new(ListVerifier)).requiring("post:drinks");
        assert_eq!(guard.required(), Some("post:drinks"));
        assert!(guard.authorize(&bearer("get:drinks-detail,post:drinks")).is_ok());
        assert_eq!(
            guard.authorize(&bearer("get:drinks-detail")),
            Err(AuthError::MissingPermission("post:drinks".into()))
        );
    }
}
