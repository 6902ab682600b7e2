/// Credential handling
///
/// # Modules
///
/// - [`password`]: the `CredentialHasher` capability and its Argon2id implementation
///
/// Session and token handling happen in front of this service and are not
/// part of this crate.

pub mod password;
