use axum::{
    extract::{FromRequestParts, Request, State},
    http::{header, request::Parts, HeaderMap},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;
use thiserror::Error;

use crate::models::Role;
use crate::services::{JwtService, ServiceError, Store, TokenError};
use crate::AppState;

/// The acting user, re-loaded from the store on every request.
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub role: Role,
}

#[derive(Debug, Error)]
pub enum AccessError {
    #[error("Token de acceso requerido")]
    MissingToken,

    #[error("Formato de autorización inválido")]
    MalformedHeader,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token expirado")]
    TokenExpired,

    #[error("Usuario no encontrado")]
    UserNotFound,

    #[error("{0}")]
    Forbidden(String),

    #[error(transparent)]
    Store(#[from] ServiceError),
}

impl From<TokenError> for AccessError {
    fn from(err: TokenError) -> Self {
        match err {
            TokenError::Expired => AccessError::TokenExpired,
            TokenError::Malformed => AccessError::InvalidToken,
        }
    }
}

impl From<AccessError> for AppError {
    fn from(err: AccessError) -> Self {
        match err {
            AccessError::Store(e) => AppError::from(e),
            AccessError::Forbidden(_) => AppError::Forbidden(anyhow::anyhow!(err.to_string())),
            other => AppError::Unauthorized(anyhow::anyhow!(other.to_string())),
        }
    }
}

/// Pull the bearer token out of `Authorization: Bearer <token>`.
fn bearer_token(headers: &HeaderMap) -> Result<&str, AccessError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .ok_or(AccessError::MissingToken)?
        .to_str()
        .map_err(|_| AccessError::MalformedHeader)?;

    match value.trim().split_once(' ') {
        Some((scheme, token)) if scheme.eq_ignore_ascii_case("bearer") && !token.trim().is_empty() => {
            Ok(token.trim())
        }
        _ => Err(AccessError::MalformedHeader),
    }
}

/// Verify the presented token and re-load the user it names.
pub async fn authenticate(
    headers: &HeaderMap,
    jwt: &JwtService,
    store: &dyn Store,
) -> Result<AuthUser, AccessError> {
    let token = bearer_token(headers)?;
    let claims = jwt.verify(token)?;

    let user = store
        .find_user_by_id(claims.user_id)
        .await?
        .ok_or(AccessError::UserNotFound)?;

    Ok(AuthUser {
        id: user.id,
        email: user.email,
        name: user.name,
        role: user.role,
    })
}

/// Router layer: authenticate, then attach [`AuthUser`] to the request.
pub async fn access_guard(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = authenticate(req.headers(), &state.jwt, state.store.as_ref())
        .await
        .map_err(|e| {
            tracing::debug!(reason = %e, "Access denied");
            AppError::from(e)
        })?;

    tracing::Span::current().record("user_id", user.id);
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts.extensions.get::<AuthUser>().cloned().ok_or_else(|| {
            AppError::InternalError(anyhow::anyhow!(
                "Authenticated user missing from request extensions"
            ))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewUser;
    use crate::services::store::UserStore;
    use crate::services::MemoryStore;
    use axum::http::HeaderValue;
    use chrono::Duration;
    use secrecy::Secret;

    fn jwt() -> JwtService {
        JwtService::new(&Secret::new("guard-test-secret-guard-test-secret".to_string()))
    }

    fn headers(value: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
        headers
    }

    async fn store_with_owner() -> (MemoryStore, i64) {
        let store = MemoryStore::new();
        let user = store
            .insert_user(NewUser {
                name: "Olga".into(),
                email: "olga@example.com".into(),
                password_hash: "x".into(),
                role: Role::Owner,
            })
            .await
            .unwrap();
        (store, user.id)
    }

    #[tokio::test]
    async fn test_valid_token_yields_user() {
        let (store, id) = store_with_owner().await;
        let jwt = jwt();
        let token = jwt.issue(id, "olga@example.com", Role::Owner).unwrap();

        let user = authenticate(&headers(&format!("Bearer {}", token)), &jwt, &store)
            .await
            .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.role, Role::Owner);
        assert_eq!(user.name, "Olga");
    }

    #[tokio::test]
    async fn test_header_problems() {
        let (store, _) = store_with_owner().await;
        let jwt = jwt();

        let missing = authenticate(&HeaderMap::new(), &jwt, &store).await;
        assert!(matches!(missing, Err(AccessError::MissingToken)));

        for bad in ["Bearer", "Bearer ", "Token abc", "abc"] {
            let result = authenticate(&headers(bad), &jwt, &store).await;
            assert!(matches!(result, Err(AccessError::MalformedHeader)), "{bad}");
        }

        let garbage = authenticate(&headers("Bearer abc.def.ghi"), &jwt, &store).await;
        assert!(matches!(garbage, Err(AccessError::InvalidToken)));
    }

    #[tokio::test]
    async fn test_expired_and_orphaned_tokens() {
        let (store, id) = store_with_owner().await;

        let expired_jwt = JwtService::with_ttl(
            &Secret::new("guard-test-secret-guard-test-secret".to_string()),
            Duration::seconds(-1),
        );
        let expired = expired_jwt.issue(id, "olga@example.com", Role::Owner).unwrap();
        let result = authenticate(&headers(&format!("Bearer {}", expired)), &jwt(), &store).await;
        assert!(matches!(result, Err(AccessError::TokenExpired)));

        let orphan = jwt().issue(id + 1000, "ghost@example.com", Role::Owner).unwrap();
        let result = authenticate(&headers(&format!("Bearer {}", orphan)), &jwt(), &store).await;
        assert!(matches!(result, Err(AccessError::UserNotFound)));
    }

    #[test]
    fn test_guard_failures_are_401_and_role_failures_403() {
        use axum::http::StatusCode;

        for err in [
            AccessError::MissingToken,
            AccessError::MalformedHeader,
            AccessError::InvalidToken,
            AccessError::TokenExpired,
            AccessError::UserNotFound,
        ] {
            assert_eq!(AppError::from(err).status_code(), StatusCode::UNAUTHORIZED);
        }
        assert_eq!(
            AppError::from(AccessError::Forbidden("no".into())).status_code(),
            StatusCode::FORBIDDEN
        );
    }
}
