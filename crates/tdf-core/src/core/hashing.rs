// crates/tdf-core/src/core/hashing.rs
// ============================================================================
// Module: TDF Harness Document Hashing
// Description: RFC 8785 canonical JSON digests for stored documents.
// Purpose: Let durable stores detect documents altered outside the harness.
// Dependencies: serde, serde_jcs, sha2
// ============================================================================

//! ## Overview
//! Documents are canonicalized with RFC 8785 (JCS) before hashing, so two
//! documents with the same content hash identically regardless of key order.
//! Durable stores keep the digest beside each row and re-check it on read.

// ============================================================================
// SECTION: Imports
// ============================================================================

use serde::Deserialize;
use serde::Serialize;
use sha2::Digest;
use sha2::Sha256;
use thiserror::Error;

// ============================================================================
// SECTION: Hash Algorithm
// ============================================================================

/// Supported document hash algorithms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HashAlgorithm {
    /// SHA-256.
    Sha256,
}

impl HashAlgorithm {
    /// Returns the stable label stored beside digests.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
        }
    }

    /// Parses a stored label back into an algorithm.
    #[must_use]
    pub fn from_label(label: &str) -> Option<Self> {
        match label {
            "sha256" => Some(Self::Sha256),
            _ => None,
        }
    }
}

/// Algorithm used when none is configured.
pub const DEFAULT_HASH_ALGORITHM: HashAlgorithm = HashAlgorithm::Sha256;

// ============================================================================
// SECTION: Digest
// ============================================================================

/// Digest of a canonicalized document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentDigest {
    /// Algorithm that produced the digest.
    pub algorithm: HashAlgorithm,
    /// Lowercase hex digest.
    pub value: String,
}

/// Errors raised while hashing documents.
#[derive(Debug, Error)]
pub enum HashError {
    /// The document could not be canonicalized.
    #[error("failed to canonicalize document: {0}")]
    Canonicalization(String),
}

// ============================================================================
// SECTION: Hashing Helpers
// ============================================================================

/// Returns the RFC 8785 canonical bytes of a document.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn canonical_document_bytes<T: Serialize + ?Sized>(document: &T) -> Result<Vec<u8>, HashError> {
    serde_jcs::to_vec(document).map_err(|err| HashError::Canonicalization(err.to_string()))
}

/// Canonicalizes and hashes a document.
///
/// # Errors
///
/// Returns [`HashError::Canonicalization`] when serialization fails.
pub fn digest_document<T: Serialize + ?Sized>(
    algorithm: HashAlgorithm,
    document: &T,
) -> Result<DocumentDigest, HashError> {
    let bytes = canonical_document_bytes(document)?;
    Ok(hash_bytes(algorithm, &bytes))
}

/// Hashes raw bytes, typically canonical bytes read back from storage.
#[must_use]
pub fn hash_bytes(algorithm: HashAlgorithm, bytes: &[u8]) -> DocumentDigest {
    let raw = match algorithm {
        HashAlgorithm::Sha256 => Sha256::digest(bytes).to_vec(),
    };
    DocumentDigest {
        algorithm,
        value: to_hex(&raw),
    }
}

/// Lowercase hex encoding.
fn to_hex(bytes: &[u8]) -> String {
    const DIGITS: &[u8; 16] = b"0123456789abcdef";
    let mut out = String::with_capacity(bytes.len() * 2);
    for byte in bytes {
        out.push(char::from(DIGITS[usize::from(byte >> 4)]));
        out.push(char::from(DIGITS[usize::from(byte & 0x0f)]));
    }
    out
}
