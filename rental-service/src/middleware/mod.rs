pub mod auth;
pub mod role;

pub use auth::{access_guard, authenticate, AccessError, AuthUser};
pub use role::{authorize, require_roles, ANY_ROLE, OWNER_ONLY, TENANT_ONLY};
