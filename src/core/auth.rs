use crate::core::{AppError, AppState};
use axum::extract::State;
use axum::http::HeaderMap;
use axum::{body::Body, extract::Request, http, http::Response, middleware::Next};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, warn};

use crate::entities::Identity;

/// Contents of the bearer tokens issued by the surrounding booking app.
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub exp: usize,
    pub iat: usize,
    /// User identifier, or the admin sentinel for admin tokens.
    pub sub: String,
    /// "user" or "admin"; decides which side of the conversation this is.
    pub role: String,
}

impl Claims {
    pub fn identity(&self) -> Identity {
        if self.role == "admin" {
            Identity::Admin
        } else {
            Identity::User(self.sub.clone())
        }
    }
}

/// Issues a token for `identity`. Token issuance belongs to the booking app;
/// this lives here so the test suite and local tooling can mint credentials.
pub fn encode_token(identity: &Identity, secret: &str) -> Result<String, AppError> {
    let now = Utc::now();
    let claims = Claims {
        iat: now.timestamp() as usize,
        exp: (now + Duration::hours(24)).timestamp() as usize,
        sub: identity.as_str().to_string(),
        role: identity.role().to_string(),
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::internal_server_error("Failed to encode token").with_details(e.to_string()))
}

pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Token rejected: {e}");
        AppError::unauthorized("Invalid token")
    })
}

/// Strict bearer-token middleware for the query API. Inserts the resolved
/// [`Identity`] as a request extension; rejects with 401 otherwise.
pub async fn authentication_middleware(
    State(state): State<Arc<AppState>>,
    mut req: Request,
    next: Next,
) -> Result<Response<Body>, AppError> {
    let token = bearer_token(req.headers())
        .ok_or_else(|| AppError::unauthorized("Missing authorization header"))?;

    let claims = decode_token(&token, &state.jwt_secret)?;
    req.extensions_mut().insert(claims.identity());

    Ok(next.run(req).await)
}

/// Identity resolution for WebSocket upgrades. Unauthenticated connections
/// are allowed (they can send with a client-supplied sender id but cannot be
/// addressed), so a missing or invalid credential resolves to anonymous.
/// The token is taken from the `Authorization` header or, for browser
/// clients that cannot set headers on upgrade requests, a `token` query
/// parameter.
pub fn resolve_connection_identity(
    headers: &HeaderMap,
    token_param: Option<&str>,
    secret: &str,
) -> Option<Identity> {
    let token = bearer_token(headers).or_else(|| token_param.map(str::to_string))?;

    match decode_token(&token, secret) {
        Ok(claims) => Some(claims.identity()),
        Err(_) => {
            warn!("WebSocket credential rejected, continuing as anonymous");
            None
        }
    }
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(http::header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}
