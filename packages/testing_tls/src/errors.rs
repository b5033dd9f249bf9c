//! Error types for certificate generation and persistence

/// Errors raised while building or writing test certificates
#[derive(Debug, thiserror::Error)]
pub enum TestTlsError {
    #[error("RSA key generation failed: {0}")]
    KeyGeneration(#[from] rsa::Error),
    #[error("Private key encoding failed: {0}")]
    KeyEncoding(String),
    #[error("Certificate signing failed: {0}")]
    Signing(#[from] rcgen::Error),
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rsa::pkcs1::Error> for TestTlsError {
    fn from(err: rsa::pkcs1::Error) -> Self {
        Self::KeyEncoding(format!("PKCS#1: {err}"))
    }
}

impl From<rsa::pkcs8::Error> for TestTlsError {
    fn from(err: rsa::pkcs8::Error) -> Self {
        Self::KeyEncoding(format!("PKCS#8: {err}"))
    }
}

impl From<tempfile::PersistError> for TestTlsError {
    fn from(err: tempfile::PersistError) -> Self {
        Self::Io(err.error)
    }
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TestTlsError>;
