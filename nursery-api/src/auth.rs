//! Authentication and Authorization
//!
//! Resolves the acting identity for every request. Reads are public; the
//! catalog's mutating routes and the admin routes require an [`AdminActor`].
//!
//! # Credentials
//!
//! ```text
//! Authorization: Bearer <token>
//! ```
//!
//! The token is offered to each configured [`IdentityProvider`] in turn:
//! - static API tokens mapped to actor ids (`NURSERY_API_TOKENS=token:actor,...`)
//! - HS256 session JWTs from the identity service (`NURSERY_JWT_SECRET`),
//!   where `sub` is the actor id
//!
//! A credential that no provider accepts leaves the request anonymous, so a
//! stale session still browses the public catalog; routes that need an
//! [`AdminActor`] answer it with 401. `NURSERY_ADMIN_ACTORS` optionally
//! restricts which actors may mutate the catalog; everyone else authenticated
//! gets 403.

use async_trait::async_trait;
use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header::AUTHORIZATION, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use jsonwebtoken::{decode, errors::ErrorKind, Algorithm, DecodingKey, Validation};
use nursery_core::ActorId;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use crate::error::ApiError;
use crate::state::AppState;

/// How an actor was authenticated
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthMethod {
    ApiToken,
    Jwt,
}

/// Authenticated identity attached to a request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    pub id: ActorId,
    pub method: AuthMethod,
}

/// Authentication error
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authorization header present but not `Bearer <token>`
    InvalidTokenFormat,
    /// No provider recognised the token
    UnknownCredential,
    /// Token validation failed
    ValidationFailed(String),
    /// Token expired
    TokenExpired,
}

impl AuthError {
    fn message(&self) -> String {
        match self {
            AuthError::InvalidTokenFormat => {
                "Invalid authorization header format. Expected: Bearer <token>".to_string()
            }
            AuthError::UnknownCredential => "Invalid credentials".to_string(),
            AuthError::ValidationFailed(msg) => format!("Token validation failed: {}", msg),
            AuthError::TokenExpired => "Token has expired".to_string(),
        }
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        ApiError::Unauthenticated(e.message())
    }
}

/// Source of actor identities
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    fn name(&self) -> &'static str;

    /// `Ok(None)` when the token is not one this provider issues
    async fn resolve(&self, token: &str) -> Result<Option<Actor>, AuthError>;
}

/// Static bearer tokens mapped to actor ids
#[derive(Debug, Clone, Default)]
pub struct StaticTokenProvider {
    tokens: HashMap<String, ActorId>,
}

impl StaticTokenProvider {
    pub fn new<I>(tokens: I) -> Self
    where
        I: IntoIterator<Item = (String, String)>,
    {
        Self {
            tokens: tokens
                .into_iter()
                .map(|(token, actor)| (token, ActorId::new(actor)))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

#[async_trait]
impl IdentityProvider for StaticTokenProvider {
    fn name(&self) -> &'static str {
        "static-token"
    }

    async fn resolve(&self, token: &str) -> Result<Option<Actor>, AuthError> {
        Ok(self.tokens.get(token).map(|id| Actor {
            id: id.clone(),
            method: AuthMethod::ApiToken,
        }))
    }
}

/// Error type for JWT configuration
#[derive(Debug, Clone, thiserror::Error)]
#[error("JWT config error: {message}")]
pub struct JwtConfigError {
    pub message: String,
}

/// JWT claims the catalog reads
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionClaims {
    /// Subject (actor id)
    pub sub: String,
    /// Expiration time (Unix timestamp)
    pub exp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 session tokens issued by the external identity service
#[derive(Clone)]
pub struct JwtIdentityProvider {
    key: DecodingKey,
    validation: Validation,
}

impl JwtIdentityProvider {
    /// Minimum secret length for HS256
    pub const MIN_SECRET_LENGTH: usize = 32;

    pub fn try_new(
        secret: &str,
        issuer: Option<&str>,
        audience: Option<&str>,
    ) -> Result<Self, JwtConfigError> {
        if secret.len() < Self::MIN_SECRET_LENGTH {
            return Err(JwtConfigError {
                message: format!(
                    "JWT secret must be at least {} bytes. Got {} bytes.",
                    Self::MIN_SECRET_LENGTH,
                    secret.len()
                ),
            });
        }

        let mut validation = Validation::new(Algorithm::HS256);
        if let Some(iss) = issuer {
            validation.set_issuer(&[iss]);
        }
        match audience {
            Some(aud) => validation.set_audience(&[aud]),
            None => validation.validate_aud = false,
        }

        Ok(Self {
            key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        })
    }

    fn looks_like_jwt(token: &str) -> bool {
        token.split('.').count() == 3
    }
}

#[async_trait]
impl IdentityProvider for JwtIdentityProvider {
    fn name(&self) -> &'static str {
        "jwt"
    }

    async fn resolve(&self, token: &str) -> Result<Option<Actor>, AuthError> {
        if !Self::looks_like_jwt(token) {
            return Ok(None);
        }

        let data = decode::<SessionClaims>(token, &self.key, &self.validation).map_err(|e| {
            if e.kind() == &ErrorKind::ExpiredSignature {
                AuthError::TokenExpired
            } else {
                AuthError::ValidationFailed(e.to_string())
            }
        })?;

        if data.claims.sub.trim().is_empty() {
            return Err(AuthError::ValidationFailed("missing subject".to_string()));
        }

        Ok(Some(Actor {
            id: ActorId::new(data.claims.sub),
            method: AuthMethod::Jwt,
        }))
    }
}

/// Authentication configuration
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
    pub jwt_secret: Option<String>,
    pub jwt_issuer: Option<String>,
    pub jwt_audience: Option<String>,
    /// `(token, actor id)` pairs
    pub api_tokens: Vec<(String, String)>,
    /// Actors allowed to mutate; empty admits every authenticated actor
    pub admin_actors: Vec<String>,
}

impl AuthConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let api_tokens = std::env::var("NURSERY_API_TOKENS")
            .map(|v| parse_token_pairs(&v))
            .unwrap_or_default();

        let admin_actors = std::env::var("NURSERY_ADMIN_ACTORS")
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            jwt_secret: std::env::var("NURSERY_JWT_SECRET").ok(),
            jwt_issuer: std::env::var("NURSERY_JWT_ISSUER").ok(),
            jwt_audience: std::env::var("NURSERY_JWT_AUDIENCE").ok(),
            api_tokens,
            admin_actors,
        }
    }

    pub fn with_api_token(mut self, token: impl Into<String>, actor: impl Into<String>) -> Self {
        self.api_tokens.push((token.into(), actor.into()));
        self
    }
}

/// Parse `token:actor,token:actor`; malformed entries are skipped
fn parse_token_pairs(raw: &str) -> Vec<(String, String)> {
    raw.split(',')
        .filter_map(|pair| {
            let (token, actor) = pair.trim().split_once(':')?;
            let (token, actor) = (token.trim(), actor.trim());
            if token.is_empty() || actor.is_empty() {
                tracing::warn!("Ignoring malformed NURSERY_API_TOKENS entry");
                return None;
            }
            Some((token.to_string(), actor.to_string()))
        })
        .collect()
}

/// Configured identity providers plus the admin policy
pub struct Authenticator {
    providers: Vec<Arc<dyn IdentityProvider>>,
    admin_actors: HashSet<String>,
}

impl Authenticator {
    pub fn from_config(config: &AuthConfig) -> Result<Self, JwtConfigError> {
        let mut providers: Vec<Arc<dyn IdentityProvider>> = Vec::new();

        let tokens = StaticTokenProvider::new(config.api_tokens.clone());
        if !tokens.is_empty() {
            providers.push(Arc::new(tokens));
        }

        if let Some(secret) = config.jwt_secret.as_deref() {
            providers.push(Arc::new(JwtIdentityProvider::try_new(
                secret,
                config.jwt_issuer.as_deref(),
                config.jwt_audience.as_deref(),
            )?));
        }

        if providers.is_empty() {
            tracing::warn!("No identity providers configured; catalog writes are disabled");
        }

        Ok(Self {
            providers,
            admin_actors: config.admin_actors.iter().cloned().collect(),
        })
    }

    pub fn with_provider(mut self, provider: Arc<dyn IdentityProvider>) -> Self {
        self.providers.push(provider);
        self
    }

    /// Resolve the request's bearer credential, if any
    pub async fn authenticate(&self, headers: &HeaderMap) -> Result<Option<Actor>, AuthError> {
        let Some(header) = headers.get(AUTHORIZATION) else {
            return Ok(None);
        };

        let token = header
            .to_str()
            .ok()
            .and_then(|h| h.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|t| !t.is_empty())
            .ok_or(AuthError::InvalidTokenFormat)?;

        for provider in &self.providers {
            if let Some(actor) = provider.resolve(token).await? {
                tracing::debug!(provider = provider.name(), actor_id = %actor.id, "Request authenticated");
                return Ok(Some(actor));
            }
        }

        Err(AuthError::UnknownCredential)
    }

    pub fn is_admin(&self, actor: &ActorId) -> bool {
        self.admin_actors.is_empty() || self.admin_actors.contains(actor.as_str())
    }
}

/// Credential presented with a request that no provider accepted
#[derive(Debug, Clone)]
pub struct RejectedCredential(pub AuthError);

/// Identity middleware
///
/// Stores the resolved [`Actor`] in request extensions. Requests without
/// credentials, or with one that fails to resolve, pass through anonymously;
/// a failure is kept as a [`RejectedCredential`] for [`AdminActor`].
pub async fn identity_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Response {
    match state.auth.authenticate(request.headers()).await {
        Ok(Some(actor)) => {
            request.extensions_mut().insert(actor);
        }
        Ok(None) => {}
        Err(e) => {
            tracing::info!(path = %request.uri().path(), error = ?e, "Rejected credential");
            request.extensions_mut().insert(RejectedCredential(e));
        }
    }

    next.run(request).await
}

/// Extractor for handlers that mutate the catalog or expose admin data
#[derive(Debug, Clone)]
pub struct AdminActor(pub Actor);

impl AdminActor {
    pub fn id(&self) -> &ActorId {
        &self.0.id
    }
}

#[async_trait]
impl FromRequestParts<AppState> for AdminActor {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let Some(actor) = parts.extensions.get::<Actor>().cloned() else {
            return Err(match parts.extensions.get::<RejectedCredential>() {
                Some(RejectedCredential(e)) => e.clone().into(),
                None => ApiError::Unauthenticated("Authentication required".to_string()),
            });
        };

        if !state.auth.is_admin(&actor.id) {
            return Err(ApiError::Forbidden(format!(
                "Actor {} may not modify the catalog",
                actor.id
            )));
        }

        Ok(AdminActor(actor))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;
    use jsonwebtoken::{encode, EncodingKey, Header};

    const SECRET: &str = "test-secret-that-is-at-least-32-bytes";

    fn bearer(token: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", token)).unwrap(),
        );
        headers
    }

    fn jwt(sub: &str, exp_offset: i64) -> String {
        let exp = (chrono::Utc::now().timestamp() + exp_offset) as u64;
        let claims = SessionClaims {
            sub: sub.to_string(),
            exp,
            iat: None,
            iss: None,
        };
        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(SECRET.as_bytes()),
        )
        .unwrap()
    }

    fn authenticator() -> Authenticator {
        let config = AuthConfig {
            jwt_secret: Some(SECRET.to_string()),
            ..Default::default()
        }
        .with_api_token("static-token", "admin_static");
        Authenticator::from_config(&config).unwrap()
    }

    #[test]
    fn test_parse_token_pairs() {
        let pairs = parse_token_pairs("abc:alice, def:bob ,broken, :x");
        assert_eq!(
            pairs,
            vec![
                ("abc".to_string(), "alice".to_string()),
                ("def".to_string(), "bob".to_string()),
            ]
        );
    }

    #[test]
    fn test_short_jwt_secret_rejected() {
        assert!(JwtIdentityProvider::try_new("short", None, None).is_err());
    }

    #[tokio::test]
    async fn test_no_header_is_anonymous() {
        let auth = authenticator();
        assert_eq!(auth.authenticate(&HeaderMap::new()).await, Ok(None));
    }

    #[tokio::test]
    async fn test_static_token() {
        let auth = authenticator();
        let actor = auth.authenticate(&bearer("static-token")).await.unwrap().unwrap();
        assert_eq!(actor.id.as_str(), "admin_static");
        assert_eq!(actor.method, AuthMethod::ApiToken);
    }

    #[tokio::test]
    async fn test_jwt_subject_becomes_actor() {
        let auth = authenticator();
        let actor = auth
            .authenticate(&bearer(&jwt("user_42", 3600)))
            .await
            .unwrap()
            .unwrap();
        assert_eq!(actor.id.as_str(), "user_42");
        assert_eq!(actor.method, AuthMethod::Jwt);
    }

    #[tokio::test]
    async fn test_rejected_credentials() {
        let auth = authenticator();

        assert_eq!(
            auth.authenticate(&bearer("unknown")).await,
            Err(AuthError::UnknownCredential)
        );
        assert_eq!(
            auth.authenticate(&bearer(&jwt("user_42", -3600))).await,
            Err(AuthError::TokenExpired)
        );

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Basic abc"));
        assert_eq!(
            auth.authenticate(&headers).await,
            Err(AuthError::InvalidTokenFormat)
        );
    }

    #[test]
    fn test_admin_allowlist() {
        let open = Authenticator::from_config(&AuthConfig::default()).unwrap();
        assert!(open.is_admin(&ActorId::new("anyone")));

        let restricted = Authenticator::from_config(&AuthConfig {
            admin_actors: vec!["admin_1".to_string()],
            ..Default::default()
        })
        .unwrap();
        assert!(restricted.is_admin(&ActorId::new("admin_1")));
        assert!(!restricted.is_admin(&ActorId::new("visitor")));
    }
}
