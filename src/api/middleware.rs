//! API Middleware
//!
//! Bearer-token authentication and per-route role gates.

use axum::{
    extract::{Request, State},
    http::{header, HeaderMap},
    middleware::Next,
    response::Response,
};

use super::AppState;
use crate::auth::{self, Role};
use crate::error::{AppError, AppResult};

/// Identity decoded from the bearer token, attached to the request for
/// downstream handlers.
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: i64,
    pub role: Role,
    pub email: String,
}

/// Extract and verify the bearer token, then stash the caller's identity
/// in the request extensions. Absent token -> 401 `missing_token`,
/// undecodable or expired -> 401 `invalid_token`.
pub async fn auth_middleware(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(&headers)?;
    let claims = auth::decode_token(&token, &state.config.jwt_secret)?;

    request.extensions_mut().insert(AuthUser {
        user_id: claims.sub,
        role: claims.role,
        email: claims.email,
    });

    Ok(next.run(request).await)
}

/// Route-level gate: reject callers whose role is not in the allowed set.
/// Runs after `auth_middleware`; a missing identity means the route was
/// wired without it, which is treated as an absent token.
pub async fn require_roles(
    allowed: &'static [Role],
    request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = request
        .extensions()
        .get::<AuthUser>()
        .ok_or(AppError::MissingToken)?;

    if !allowed.contains(&user.role) {
        return Err(AppError::Forbidden);
    }

    Ok(next.run(request).await)
}

fn bearer_token(headers: &HeaderMap) -> AppResult<String> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AppError::MissingToken)?
        .to_str()
        .map_err(|_| AppError::InvalidToken)?;

    let token = value
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::MissingToken)?;

    Ok(token.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers_with(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, value.parse().unwrap());
        headers
    }

    #[test]
    fn bearer_extraction() {
        assert_eq!(
            bearer_token(&headers_with("Bearer abc.def.ghi")).unwrap(),
            "abc.def.ghi"
        );
        assert!(matches!(
            bearer_token(&HeaderMap::new()),
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Bearer ")),
            Err(AppError::MissingToken)
        ));
        assert!(matches!(
            bearer_token(&headers_with("Basic dXNlcjpwdw==")),
            Err(AppError::MissingToken)
        ));
    }
}
