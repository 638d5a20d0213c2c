//! Credential hashing
//!
//! Accounts never keep a plaintext credential, only the output of a
//! [`CredentialHasher`]. The hasher is a strategy object so a stronger scheme
//! can be plugged into the bank without touching the account contract.

use sha2::{Digest, Sha256};
use std::fmt::Debug;

/// One-way function used to store and verify credentials
pub trait CredentialHasher: Debug + Send + Sync {
    /// Derive the stored form of a credential
    fn hash(&self, credential: &str) -> String;

    /// Check a candidate credential against a stored hash
    ///
    /// The default recomputes the hash and compares it. The comparison is not
    /// constant-time; implementations may override it with one that is.
    fn verify(&self, candidate: &str, stored_hash: &str) -> bool {
        self.hash(candidate) == stored_hash
    }
}

/// Unsalted SHA-256, hex encoded
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl CredentialHasher for Sha256Hasher {
    fn hash(&self, credential: &str) -> String {
        hex::encode(Sha256::digest(credential.as_bytes()))
    }
}
