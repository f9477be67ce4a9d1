use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use service_core::error::AppError;

use crate::middleware::auth::{AccessError, AuthUser};
use crate::models::Role;

pub const OWNER_ONLY: &[Role] = &[Role::Owner];
pub const TENANT_ONLY: &[Role] = &[Role::Tenant];
pub const ANY_ROLE: &[Role] = &[Role::Owner, Role::Tenant];

/// Pure role check against an allow-list.
pub fn authorize(user: &AuthUser, allowed: &[Role]) -> Result<(), AccessError> {
    if allowed.contains(&user.role) {
        return Ok(());
    }

    let message = match allowed {
        [Role::Owner] => "Acceso denegado: solo para propietarios".to_string(),
        [Role::Tenant] => "Acceso denegado: solo para inquilinos".to_string(),
        _ => format!("Acceso denegado para el rol {}", user.role.label()),
    };
    Err(AccessError::Forbidden(message))
}

/// Router layer placed inside `access_guard`; rejects users whose role is not allowed.
pub async fn require_roles(
    State(allowed): State<&'static [Role]>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let user = req.extensions().get::<AuthUser>().ok_or_else(|| {
        AppError::InternalError(anyhow::anyhow!("Role check ran before authentication"))
    })?;

    authorize(user, allowed).map_err(|e| {
        tracing::info!(user_id = user.id, role = %user.role, "Role not allowed");
        AppError::from(e)
    })?;

    Ok(next.run(req).await)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(role: Role) -> AuthUser {
        AuthUser {
            id: 1,
            email: "a@example.com".into(),
            name: "A".into(),
            role,
        }
    }

    #[test]
    fn test_allow_list() {
        assert!(authorize(&user(Role::Owner), OWNER_ONLY).is_ok());
        assert!(authorize(&user(Role::Tenant), TENANT_ONLY).is_ok());
        assert!(authorize(&user(Role::Tenant), ANY_ROLE).is_ok());
        assert!(authorize(&user(Role::Owner), ANY_ROLE).is_ok());
    }

    #[test]
    fn test_rejections_name_the_required_role() {
        let err = authorize(&user(Role::Tenant), OWNER_ONLY).unwrap_err();
        assert_eq!(err.to_string(), "Acceso denegado: solo para propietarios");

        let err = authorize(&user(Role::Owner), TENANT_ONLY).unwrap_err();
        assert_eq!(err.to_string(), "Acceso denegado: solo para inquilinos");

        let err = authorize(&user(Role::Owner), &[]).unwrap_err();
        assert_eq!(err.to_string(), "Acceso denegado para el rol propietario");
    }
}
