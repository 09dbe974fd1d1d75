//! Password hashing and verification (Argon2id).

use argon2::Argon2;
use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};

/// Errors that can occur during password hashing or verification.
#[derive(Debug)]
pub enum PasswordError {
    /// Hashing failed
    Hash,
    /// The stored hash string is not a valid PHC string
    MalformedHash,
    /// Verification failed for a reason other than a wrong password
    Verify,
}

impl std::fmt::Display for PasswordError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PasswordError::Hash => write!(f, "Failed to hash password"),
            PasswordError::MalformedHash => write!(f, "Stored password hash is malformed"),
            PasswordError::Verify => write!(f, "Failed to verify password"),
        }
    }
}

impl std::error::Error for PasswordError {}

/// Hash a password with Argon2id and a fresh random salt.
/// Returns the PHC-format hash string stored in the user record.
pub fn hash_password(password: &str) -> Result<String, PasswordError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|_| PasswordError::Hash)
}

/// Verify a password against a stored PHC hash string.
/// A wrong password is `Ok(false)`, not an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, PasswordError> {
    let parsed = PasswordHash::new(hash).map_err(|_| PasswordError::MalformedHash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(_) => Err(PasswordError::Verify),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify_roundtrip() {
        let hash = hash_password("correct horse battery staple").unwrap();

        assert!(verify_password("correct horse battery staple", &hash).unwrap());
        assert!(!verify_password("wrong password", &hash).unwrap());
    }

    #[test]
    fn test_hashes_are_salted() {
        let hash1 = hash_password("same password").unwrap();
        let hash2 = hash_password("same password").unwrap();

        assert_ne!(hash1, hash2, "Each hash should use a fresh salt");
    }

    #[test]
    fn test_malformed_hash_rejected() {
        assert!(matches!(
            verify_password("anything", "not-a-phc-string"),
            Err(PasswordError::MalformedHash)
        ));
    }
}
