//! Authentication middleware for bearer session tokens.

use std::sync::Arc;

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderMap, Method, Request, StatusCode, header::AUTHORIZATION},
    middleware::Next,
    response::{IntoResponse, Response},
};

use xpensa_types::{AppError, FinanceRepository};

use super::handlers::AppState;

/// Paths served without a session.
const PUBLIC_PREFIXES: [&str; 2] = ["/api-docs", "/swagger-ui"];

/// Extracts the token from an Authorization value.
/// Expected format: "Bearer <token>" or just "<token>"
fn extract_token(auth_header: Option<&str>) -> Option<&str> {
    let header = auth_header?.trim();
    let token = header.strip_prefix("Bearer ").unwrap_or(header).trim();
    (!token.is_empty()).then_some(token)
}

/// Reads the bearer token from request headers.
pub(crate) fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    extract_token(headers.get(AUTHORIZATION).and_then(|v| v.to_str().ok()))
}

fn is_public(method: &Method, path: &str) -> bool {
    if path == "/health" {
        return true;
    }
    if method == Method::POST && matches!(path, "/api/auth/signup" | "/api/auth/login") {
        return true;
    }
    PUBLIC_PREFIXES.iter().any(|prefix| path.starts_with(prefix))
}

/// Authentication middleware that validates session tokens.
///
/// On success the authenticated [`xpensa_types::UserId`] is inserted into the
/// request extensions for handlers to extract.
///
/// Endpoints that bypass authentication:
/// - `/health`
/// - `POST /api/auth/signup` and `POST /api/auth/login`
/// - `/api-docs/*` and `/swagger-ui/*`
pub async fn auth_middleware<R: FinanceRepository>(
    State(state): State<Arc<AppState<R>>>,
    mut request: Request<Body>,
    next: Next,
) -> Response {
    if is_public(request.method(), request.uri().path()) {
        return next.run(request).await;
    }

    let Some(token) = bearer_token(request.headers()) else {
        return unauthorized_response("Missing or invalid Authorization header");
    };

    match state.service.authenticate(token).await {
        Ok(user_id) => {
            request.extensions_mut().insert(user_id);
            next.run(request).await
        }
        Err(AppError::Unauthorized(msg)) => unauthorized_response(&msg),
        Err(e) => {
            tracing::error!("Session verification failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({
                    "error": "Internal server error",
                    "code": 500
                })),
            )
                .into_response()
        }
    }
}

fn unauthorized_response(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(serde_json::json!({
            "error": message,
            "code": 401
        })),
    )
        .into_response()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_token_bearer() {
        assert_eq!(extract_token(Some("Bearer xp_test_123")), Some("xp_test_123"));
    }

    #[test]
    fn test_extract_token_raw() {
        assert_eq!(extract_token(Some("xp_test_123")), Some("xp_test_123"));
    }

    #[test]
    fn test_extract_token_none_or_blank() {
        assert_eq!(extract_token(None), None);
        assert_eq!(extract_token(Some("Bearer ")), None);
    }

    #[test]
    fn test_public_paths() {
        assert!(is_public(&Method::GET, "/health"));
        assert!(is_public(&Method::POST, "/api/auth/login"));
        assert!(is_public(&Method::GET, "/swagger-ui/index.html"));
        assert!(is_public(&Method::GET, "/api-docs/openapi.json"));
        assert!(!is_public(&Method::GET, "/api/auth/login"));
        assert!(!is_public(&Method::GET, "/api/profile/health"));
    }
}
