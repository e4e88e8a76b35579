use crate::error::FrameworkError;

/// bcrypt only looks at the first 72 bytes
const BCRYPT_MAX_BYTES: usize = 72;

fn truncated(password: &str) -> &[u8] {
    let bytes = password.as_bytes();
    &bytes[..bytes.len().min(BCRYPT_MAX_BYTES)]
}

pub fn hash_password(password: &str) -> Result<String, FrameworkError> {
    bcrypt::hash(truncated(password), bcrypt::DEFAULT_COST)
        .map_err(|e| FrameworkError::internal(format!("Error hashing password: {}", e)))
}

/// A malformed stored hash counts as a mismatch
pub fn verify_password(password: &str, hash: &str) -> bool {
    bcrypt::verify(truncated(password), hash).unwrap_or(false)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let hash = hash_password("correct horse").unwrap();
        assert!(verify_password("correct horse", &hash));
        assert!(!verify_password("wrong horse", &hash));
        assert!(!verify_password("anything", "not-a-bcrypt-hash"));
    }

    #[test]
    fn test_passwords_past_72_bytes_are_equivalent() {
        let base = "a".repeat(72);
        let hash = hash_password(&format!("{}tail-one", base)).unwrap();
        assert!(verify_password(&format!("{}tail-two", base), &hash));
    }
}
