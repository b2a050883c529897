use crate::errors::ServiceError;

/// bcrypt work factor for stored password hashes
pub const BCRYPT_COST: u32 = 10;

/// Hash a plaintext password with bcrypt
pub fn hash_password(password: &str) -> Result<String, ServiceError> {
    bcrypt::hash(password, BCRYPT_COST).map_err(|e| ServiceError::HashError(e.to_string()))
}

/// Check a plaintext password against a stored `$2a$`/`$2b$`/`$2y$` hash
pub fn verify_password(password: &str, hash: &str) -> Result<bool, ServiceError> {
    bcrypt::verify(password, hash).map_err(|e| ServiceError::HashError(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hash_uses_configured_cost() {
        let hash = hash_password("Password@123").unwrap();
        assert!(hash.starts_with("$2b$10$"));
        assert!(verify_password("Password@123", &hash).unwrap());
        assert!(!verify_password("wrong", &hash).unwrap());
    }

    #[test]
    fn accepts_2a_prefixed_hashes() {
        let hash = hash_password("secret").unwrap().replacen("$2b$", "$2a$", 1);
        assert!(verify_password("secret", &hash).unwrap());
    }

    #[test]
    fn garbage_hash_is_an_error() {
        assert!(matches!(
            verify_password("secret", "not-a-hash"),
            Err(ServiceError::HashError(_))
        ));
    }
}
