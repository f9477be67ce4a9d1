use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};

/// Plain-text password as received from a client. Debug output is redacted.
#[derive(Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for Password {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("Password(***)")
    }
}

/// Well-formed hash with the default Argon2id parameters that no password matches.
/// Verified against when a login names an unknown email, so that path costs the
/// same as a wrong password.
pub const DUMMY_HASH: &str = "$argon2id$v=19$m=19456,t=2,p=1$cmVudGFsLWR1bW15LXNsdA$BwgJCgsMDQ4PEBESExQVFhcYGRobHB0eHyAhIiMkJSY";

/// Hash a password with Argon2id and a fresh random salt (PHC string format).
pub fn hash_password(password: &Password) -> Result<String, anyhow::Error> {
    let salt = SaltString::generate(&mut OsRng);

    let hash = Argon2::default()
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {}", e))?
        .to_string();

    Ok(hash)
}

/// Verify a password against a stored PHC hash.
///
/// `Ok(false)` means the password does not match; `Err` means the stored hash is unreadable.
pub fn verify_password(password: &Password, stored_hash: &str) -> Result<bool, anyhow::Error> {
    let parsed_hash = PasswordHash::new(stored_hash)
        .map_err(|e| anyhow::anyhow!("Invalid password hash format: {}", e))?;

    Ok(Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let password = Password::new("clave-segura-123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(hash.starts_with("$argon2"));
        assert!(verify_password(&password, &hash).unwrap());
        assert!(!verify_password(&Password::new("otra".to_string()), &hash).unwrap());
    }

    #[test]
    fn test_same_password_gets_different_salts() {
        let password = Password::new("clave-segura-123".to_string());
        let first = hash_password(&password).unwrap();
        let second = hash_password(&password).unwrap();
        assert_ne!(first, second);
    }

    #[test]
    fn test_dummy_hash_uses_default_cost() {
        let parsed = PasswordHash::new(DUMMY_HASH).expect("dummy hash must parse");
        let params = argon2::Params::try_from(&parsed).unwrap();
        let defaults = argon2::Params::default();
        assert_eq!(parsed.algorithm, argon2::Algorithm::Argon2id.ident());
        assert_eq!(params.m_cost(), defaults.m_cost());
        assert_eq!(params.t_cost(), defaults.t_cost());
        assert_eq!(params.p_cost(), defaults.p_cost());

        let password = Password::new("clave-segura-123".to_string());
        assert!(!verify_password(&password, DUMMY_HASH).unwrap());
    }

    #[test]
    fn test_garbage_hash_is_an_error() {
        let password = Password::new("x".to_string());
        assert!(verify_password(&password, "not-a-hash").is_err());
    }

    #[test]
    fn test_debug_is_redacted() {
        let password = Password::new("secret".to_string());
        assert_eq!(format!("{:?}", password), "Password(***)");
    }
}
