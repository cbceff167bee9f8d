use thiserror::Error;

use super::types::DocumentState;

/// Errors that can occur while building, certifying or sealing a CFDI.
///
/// Every error is terminal for the current attempt; nothing in this crate
/// retries on its own.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CfdiError {
    /// The certificate bytes are not a well-formed DER X.509 certificate.
    #[error("invalid certificate: {0}")]
    InvalidCertificate(String),

    /// Wrong password or malformed encrypted key material.
    #[error("private key decryption failed: {0}")]
    KeyDecryptionFailed(String),

    /// The cadena original transform failed or could not be reached.
    #[error("canonicalization failed: {0}")]
    CanonicalizationFailed(String),

    /// The RSA-SHA256 primitive rejected the key or the message.
    #[error("signing failed: {0}")]
    SigningFailed(String),

    /// A Sello does not verify against the embedded certificate.
    #[error("seal verification failed: {0}")]
    VerificationFailed(String),

    /// Operation attempted out of the Draft → Structured → Certified → Signed order.
    #[error("invalid state {state:?}: {message}")]
    InvalidState {
        state: DocumentState,
        message: String,
    },

    /// XML generation error.
    #[error("XML error: {0}")]
    Xml(String),

    /// Reading a certificate or key file failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl CfdiError {
    pub(crate) fn invalid_state(state: DocumentState, message: impl Into<String>) -> Self {
        Self::InvalidState {
            state,
            message: message.into(),
        }
    }
}
