//! Password hashing utilities

use bcrypt::{hash, verify};

#[cfg(not(test))]
const HASH_COST: u32 = bcrypt::DEFAULT_COST;
#[cfg(test)]
const HASH_COST: u32 = 4;

/// Hash a password using bcrypt
pub fn hash_password(password: &str) -> Result<String, bcrypt::BcryptError> {
    hash(password, HASH_COST)
}

/// Verify a password against a stored hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, bcrypt::BcryptError> {
    verify(password, hash)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_then_verify() {
        let h = hash_password("kodi-ya-nyumba").unwrap();
        assert_ne!(h, "kodi-ya-nyumba");
        assert!(verify_password("kodi-ya-nyumba", &h).unwrap());
        assert!(!verify_password("wrong-password", &h).unwrap());
    }

    #[test]
    fn garbage_hash_errors() {
        assert!(verify_password("x", "not-a-bcrypt-hash").is_err());
    }
}
