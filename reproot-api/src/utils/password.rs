use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use reproot_core::error::AppError;

/// Newtype for plaintext passwords to prevent accidental logging.
#[derive(Debug, Clone)]
pub struct Password(String);

impl Password {
    pub fn new(password: String) -> Self {
        Self(password)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Hash a password using Argon2id with a fresh random salt.
pub fn hash_password(password: &Password) -> Result<String, AppError> {
    let argon2 = Argon2::default();
    let salt = SaltString::generate(&mut OsRng);

    let password_hash = argon2
        .hash_password(password.as_str().as_bytes(), &salt)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to hash password: {}", e)))?
        .to_string();

    Ok(password_hash)
}

/// Verify a password against a stored hash.
///
/// Returns Ok(true) on a match, Ok(false) on a mismatch. A malformed
/// stored hash is an internal error, not a login failure.
pub fn verify_password(password: &Password, password_hash: &str) -> Result<bool, AppError> {
    let parsed_hash = PasswordHash::new(password_hash)
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Invalid password hash format: {}", e)))?;

    Ok(Argon2::default()
        .verify_password(password.as_str().as_bytes(), &parsed_hash)
        .is_ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_password() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(!hash.is_empty());
        assert!(hash.starts_with("$argon2"));
    }

    #[test]
    fn test_verify_password_correct() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        assert!(verify_password(&password, &hash).unwrap());
    }

    #[test]
    fn test_verify_password_incorrect() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash = hash_password(&password).expect("Failed to hash password");

        let wrong_password = Password::new("wrongPassword".to_string());
        assert!(!verify_password(&wrong_password, &hash).unwrap());
    }

    #[test]
    fn test_different_hashes_for_same_password() {
        let password = Password::new("mySecurePassword123".to_string());
        let hash1 = hash_password(&password).expect("Failed to hash password");
        let hash2 = hash_password(&password).expect("Failed to hash password");

        // Random salt makes every hash unique.
        assert_ne!(hash1, hash2);
        assert!(verify_password(&password, &hash1).unwrap());
        assert!(verify_password(&password, &hash2).unwrap());
    }
}
