/// Password hashing behind a capability trait
///
/// The account manager only sees [`CredentialHasher`]; which adaptive hash
/// backs it is decided at wiring time. [`Argon2Hasher`] is the production
/// implementation.
///
/// # Default Parameters
///
/// - **Algorithm**: Argon2id, version 0x13
/// - **Memory**: 64 MB (65536 KB)
/// - **Iterations**: 3 passes
/// - **Parallelism**: 4 lanes
/// - **Output**: 32-byte hash, PHC string encoded
///
/// # Example
///
/// ```
/// use notedesk_shared::auth::password::{Argon2Hasher, CredentialHasher, HashParams};
///
/// # fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let hasher = Argon2Hasher::new(HashParams::default());
/// let digest = hasher.hash("super_secret_password_123")?;
///
/// assert!(hasher.verify("super_secret_password_123", &digest)?);
/// assert!(!hasher.verify("wrong_password", &digest)?);
/// # Ok(())
/// # }
/// ```

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, ParamsBuilder, Version,
};
use serde::{Deserialize, Serialize};

/// Error type for password hashing operations
#[derive(Debug, thiserror::Error)]
pub enum PasswordError {
    /// Failed to hash password
    #[error("Failed to hash password: {0}")]
    HashError(String),

    /// Failed to verify password
    #[error("Failed to verify password: {0}")]
    VerifyError(String),

    /// Invalid password hash format
    #[error("Invalid password hash format: {0}")]
    InvalidHash(String),
}

/// One-way credential hashing
///
/// Implementations must salt every digest, so hashing the same plaintext
/// twice yields different digests that both verify.
pub trait CredentialHasher: Send + Sync {
    /// Produces a digest for the plaintext
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError>;

    /// Checks a plaintext against a digest produced by [`hash`](Self::hash)
    ///
    /// `Ok(false)` means a well-formed digest that does not match.
    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError>;
}

/// Argon2id cost parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct HashParams {
    /// Memory cost in KiB
    pub memory_kib: u32,

    /// Number of passes
    pub iterations: u32,

    /// Number of lanes
    pub parallelism: u32,
}

impl Default for HashParams {
    fn default() -> Self {
        Self {
            memory_kib: 65536,
            iterations: 3,
            parallelism: 4,
        }
    }
}

/// Argon2id implementation of [`CredentialHasher`]
#[derive(Debug, Clone, Default)]
pub struct Argon2Hasher {
    params: HashParams,
}

impl Argon2Hasher {
    pub fn new(params: HashParams) -> Self {
        Self { params }
    }

    fn argon2(&self) -> Result<Argon2<'static>, PasswordError> {
        let params = ParamsBuilder::new()
            .m_cost(self.params.memory_kib)
            .t_cost(self.params.iterations)
            .p_cost(self.params.parallelism)
            .output_len(32)
            .build()
            .map_err(|e| PasswordError::HashError(format!("Invalid parameters: {}", e)))?;

        Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
    }
}

impl CredentialHasher for Argon2Hasher {
    fn hash(&self, plaintext: &str) -> Result<String, PasswordError> {
        let salt = SaltString::generate(&mut OsRng);

        let digest = self
            .argon2()?
            .hash_password(plaintext.as_bytes(), &salt)
            .map_err(|e| PasswordError::HashError(format!("Hash generation failed: {}", e)))?;

        Ok(digest.to_string())
    }

    fn verify(&self, plaintext: &str, digest: &str) -> Result<bool, PasswordError> {
        let parsed = PasswordHash::new(digest)
            .map_err(|e| PasswordError::InvalidHash(format!("Failed to parse hash: {}", e)))?;

        // Cost parameters come from the digest itself, so digests created
        // with older settings keep verifying.
        match Argon2::default().verify_password(plaintext.as_bytes(), &parsed) {
            Ok(()) => Ok(true),
            Err(argon2::password_hash::Error::Password) => Ok(false),
            Err(e) => Err(PasswordError::VerifyError(format!("Verification failed: {}", e))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fast_hasher() -> Argon2Hasher {
        Argon2Hasher::new(HashParams {
            memory_kib: 4096,
            iterations: 1,
            parallelism: 1,
        })
    }

    #[test]
    fn test_default_params() {
        let params = HashParams::default();
        assert_eq!(params.memory_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 4);
        assert_eq!(Argon2Hasher::default().params, params);
    }

    #[test]
    fn test_hash_encodes_params() {
        let hash = fast_hasher().hash("pw123").expect("Hash should succeed");

        assert!(hash.starts_with("$argon2id$"));
        assert!(hash.contains("v=19"));
        assert!(hash.contains("m=4096"));
        assert!(hash.contains("t=1"));
        assert!(hash.contains("p=1"));
        assert!(!hash.contains("pw123"));
    }

    #[test]
    fn test_hash_produces_different_salts() {
        let hasher = fast_hasher();
        let hash1 = hasher.hash("same_password").unwrap();
        let hash2 = hasher.hash("same_password").unwrap();

        assert_ne!(hash1, hash2);
        assert!(hasher.verify("same_password", &hash1).unwrap());
        assert!(hasher.verify("same_password", &hash2).unwrap());
    }

    #[test]
    fn test_verify_correct_and_incorrect() {
        let hasher = fast_hasher();
        let hash = hasher.hash("correct_password").unwrap();

        assert!(hasher.verify("correct_password", &hash).unwrap());
        assert!(!hasher.verify("wrong_password", &hash).unwrap());
        assert!(!hasher.verify("", &hash).unwrap());
    }

    #[test]
    fn test_verify_uses_params_from_digest() {
        let hash = fast_hasher().hash("portable").unwrap();
        let other = Argon2Hasher::new(HashParams {
            memory_kib: 8192,
            iterations: 2,
            parallelism: 1,
        });

        assert!(other.verify("portable", &hash).unwrap());
    }

    #[test]
    fn test_verify_invalid_hash() {
        let hasher = fast_hasher();
        assert!(matches!(
            hasher.verify("password", "invalid_hash"),
            Err(PasswordError::InvalidHash(_))
        ));
        // Parses as a PHC string but carries no hash to compare against
        assert!(!hasher.verify("password", "$argon2id$invalid").unwrap());
    }

    #[test]
    fn test_invalid_params_rejected() {
        let hasher = Argon2Hasher::new(HashParams {
            memory_kib: 1,
            iterations: 1,
            parallelism: 1,
        });

        assert!(matches!(hasher.hash("pw"), Err(PasswordError::HashError(_))));
    }
}
