use std::sync::Arc;

use crate::models::{NewUser, Role, TenantSummary, User};
use crate::services::{metrics, JwtService, ServiceError, Store};
use crate::utils::{hash_password, verify_password, Password, DUMMY_HASH};

/// What the dashboard shows, by role.
#[derive(Debug, Clone, PartialEq)]
pub enum Dashboard {
    Owner { total_tenants: i64 },
    Tenant,
}

/// Input for an owner-created tenant account.
#[derive(Debug, Clone)]
pub struct NewTenantAccount {
    pub name: String,
    pub email: String,
    pub password: Password,
    pub phone: Option<String>,
}

#[derive(Clone)]
pub struct AuthService {
    store: Arc<dyn Store>,
    jwt: JwtService,
}

impl AuthService {
    pub fn new(store: Arc<dyn Store>, jwt: JwtService) -> Self {
        Self { store, jwt }
    }

    /// Authenticate and issue a session token carrying the stored role.
    ///
    /// When the client states which role it expects, a mismatch is reported
    /// before the password is checked.
    pub async fn login(
        &self,
        email: &str,
        password: &Password,
        expected_role: Option<Role>,
    ) -> Result<(User, String), ServiceError> {
        let Some(user) = self.store.find_user_by_email(email).await? else {
            // Same Argon2 cost as a wrong password.
            let _ = verify_password(password, DUMMY_HASH);
            metrics::record_login("invalid_credentials");
            tracing::info!("Login rejected: unknown email");
            return Err(ServiceError::InvalidCredentials);
        };

        if let Some(expected) = expected_role {
            if expected != user.role {
                metrics::record_login("role_mismatch");
                tracing::info!(user_id = user.id, expected = %expected, actual = %user.role, "Login rejected: role mismatch");
                return Err(ServiceError::RoleMismatch(expected));
            }
        }

        if !verify_password(password, &user.password_hash)? {
            metrics::record_login("invalid_credentials");
            tracing::info!(user_id = user.id, "Login rejected: wrong password");
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.jwt.issue(user.id, &user.email, user.role)?;
        metrics::record_login("success");
        tracing::info!(user_id = user.id, role = %user.role, "User logged in");

        Ok((user, token))
    }

    /// Self-registration. Only owners may sign themselves up.
    pub async fn register(
        &self,
        name: String,
        email: &str,
        password: &Password,
        requested_role: Option<&str>,
    ) -> Result<(User, String), ServiceError> {
        if let Some(requested) = requested_role.map(str::trim).filter(|r| !r.is_empty()) {
            if Role::parse(requested) != Some(Role::Owner) {
                tracing::warn!(requested_role = %requested, "Self-registration with non-owner role rejected");
                return Err(ServiceError::ForbiddenSelfRegistration);
            }
        }

        if self.store.find_user_by_email(email).await?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        let user = self
            .store
            .insert_user(NewUser {
                name,
                email: email.to_string(),
                password_hash: hash_password(password)?,
                role: Role::Owner,
            })
            .await?;

        let token = self.jwt.issue(user.id, &user.email, user.role)?;
        tracing::info!(user_id = user.id, "Owner registered");

        Ok((user, token))
    }

    /// Create a tenant user and its profile, linked to the calling owner.
    pub async fn create_tenant(
        &self,
        owner_id: i64,
        account: NewTenantAccount,
    ) -> Result<TenantSummary, ServiceError> {
        if self.store.find_user_by_email(&account.email).await?.is_some() {
            return Err(ServiceError::EmailTaken);
        }

        let tenant = self
            .store
            .insert_tenant_account(
                NewUser {
                    name: account.name,
                    email: account.email,
                    password_hash: hash_password(&account.password)?,
                    role: Role::Tenant,
                },
                owner_id,
                account.phone,
            )
            .await?;

        tracing::info!(owner_id, tenant_id = tenant.id, "Tenant created");
        Ok(tenant)
    }

    pub async fn list_tenants(&self, owner_id: i64) -> Result<Vec<TenantSummary>, ServiceError> {
        self.store.list_tenants(owner_id).await
    }

    pub async fn dashboard(&self, user_id: i64, role: Role) -> Result<Dashboard, ServiceError> {
        match role {
            Role::Owner => Ok(Dashboard::Owner {
                total_tenants: self.store.count_tenants(user_id).await?,
            }),
            Role::Tenant => Ok(Dashboard::Tenant),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::MemoryStore;
    use secrecy::Secret;

    fn service() -> AuthService {
        let jwt = JwtService::new(&Secret::new("unit-test-secret-unit-test-secret!!".to_string()));
        AuthService::new(Arc::new(MemoryStore::new()), jwt)
    }

    fn pw(value: &str) -> Password {
        Password::new(value.to_string())
    }

    #[tokio::test]
    async fn test_register_always_stores_owner() {
        let auth = service();
        let (user, token) = auth
            .register("Olga".into(), "olga@example.com", &pw("secreto123"), Some("propietario"))
            .await
            .unwrap();
        assert_eq!(user.role, Role::Owner);
        assert!(!token.is_empty());

        let (user, _) = auth
            .register("Otro".into(), "otro@example.com", &pw("secreto123"), None)
            .await
            .unwrap();
        assert_eq!(user.role, Role::Owner);
    }

    #[tokio::test]
    async fn test_register_rejects_other_roles() {
        let auth = service();
        for role in ["tenant", "inquilino", "admin"] {
            let result = auth
                .register("X".into(), "x@example.com", &pw("secreto123"), Some(role))
                .await;
            assert!(matches!(result, Err(ServiceError::ForbiddenSelfRegistration)));
        }
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let auth = service();
        auth.register("A".into(), "dup@example.com", &pw("secreto123"), None)
            .await
            .unwrap();
        let result = auth
            .register("B".into(), "DUP@example.com", &pw("secreto123"), None)
            .await;
        assert!(matches!(result, Err(ServiceError::EmailTaken)));
    }

    #[tokio::test]
    async fn test_role_mismatch_wins_over_password_check() {
        let auth = service();
        auth.register("Olga".into(), "olga@example.com", &pw("secreto123"), None)
            .await
            .unwrap();

        let wrong_password = auth
            .login("olga@example.com", &pw("incorrecta"), Some(Role::Tenant))
            .await;
        assert!(matches!(wrong_password, Err(ServiceError::RoleMismatch(Role::Tenant))));

        let right_password = auth
            .login("olga@example.com", &pw("secreto123"), Some(Role::Tenant))
            .await;
        assert!(matches!(right_password, Err(ServiceError::RoleMismatch(Role::Tenant))));
    }

    #[tokio::test]
    async fn test_login_failures_are_indistinguishable() {
        let auth = service();
        auth.register("Olga".into(), "olga@example.com", &pw("secreto123"), None)
            .await
            .unwrap();

        let started = std::time::Instant::now();
        let unknown = auth.login("nadie@example.com", &pw("secreto123"), None).await;
        let unknown_elapsed = started.elapsed();

        let started = std::time::Instant::now();
        let wrong = auth.login("olga@example.com", &pw("incorrecta"), None).await;
        let wrong_elapsed = started.elapsed();

        assert_eq!(unknown.unwrap_err().to_string(), wrong.unwrap_err().to_string());
        // Both paths run one Argon2 verification.
        assert!(unknown_elapsed * 4 >= wrong_elapsed, "{unknown_elapsed:?} vs {wrong_elapsed:?}");
    }

    #[tokio::test]
    async fn test_dashboard_counts_own_tenants() {
        let auth = service();
        let (owner, _) = auth
            .register("Olga".into(), "olga@example.com", &pw("secreto123"), None)
            .await
            .unwrap();

        for i in 0..2 {
            auth.create_tenant(
                owner.id,
                NewTenantAccount {
                    name: format!("Inquilino {}", i),
                    email: format!("t{}@example.com", i),
                    password: pw("secreto123"),
                    phone: None,
                },
            )
            .await
            .unwrap();
        }

        assert_eq!(
            auth.dashboard(owner.id, Role::Owner).await.unwrap(),
            Dashboard::Owner { total_tenants: 2 }
        );
        assert_eq!(
            auth.dashboard(owner.id + 50, Role::Owner).await.unwrap(),
            Dashboard::Owner { total_tenants: 0 }
        );
    }
}
