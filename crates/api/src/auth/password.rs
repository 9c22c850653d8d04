//! Argon2id password hashing and the signup password policy.

use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use argon2::Argon2;
use vlab_core::error::CoreError;

/// Shortest accepted password (characters).
pub const MIN_PASSWORD_LEN: usize = 8;
/// Longest accepted password (bytes); bounds hashing cost.
pub const MAX_PASSWORD_BYTES: usize = 1024;

/// Hash `password` with Argon2id and a random salt, returning a PHC string.
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default().hash_password(password.as_bytes(), &salt)?;
    Ok(hash.to_string())
}

/// Check `password` against a stored PHC hash. A mismatch is `Ok(false)`;
/// only a corrupt hash is an error.
pub fn verify_password(password: &str, hash: &str) -> Result<bool, argon2::password_hash::Error> {
    let parsed_hash = PasswordHash::new(hash)?;
    match Argon2::default().verify_password(password.as_bytes(), &parsed_hash) {
        Ok(()) => Ok(true),
        Err(argon2::password_hash::Error::Password) => Ok(false),
        Err(e) => Err(e),
    }
}

pub fn validate_password(password: &str) -> Result<(), CoreError> {
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CoreError::Validation(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )));
    }
    if password.len() > MAX_PASSWORD_BYTES {
        return Err(CoreError::Validation(format!(
            "Password must be at most {MAX_PASSWORD_BYTES} bytes long"
        )));
    }
    Ok(())
}
