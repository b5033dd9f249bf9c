//! # Testing TLS
//!
//! Self-signed RSA certificates for test suites that need a TLS listener or
//! client. Nothing here is meant for production use.
//!
//! - [`generate_data`] returns a DER certificate and its 2048-bit RSA key
//! - [`generate_files`] additionally writes `CERTIFICATE` and
//!   `RSA PRIVATE KEY` (PKCS#1) PEM files to the temp directory
//! - [`write_certificate_to_file`] writes an existing certificate as PEM
//! - [`SelfSignedConfig`] changes the subject, SANs, validity or key size
//!
//! Written files are never removed by this crate. Hold a [`ScopedFiles`]
//! guard for the duration of a test to clean them up.
//!
//! ```no_run
//! use testing_tls::generate_files;
//!
//! let files = generate_files()?;
//! let _cleanup = files.scoped();
//! println!("cert: {}", files.cert_path.display());
//! println!("key: {}", files.key_path.display());
//! # Ok::<(), testing_tls::TestTlsError>(())
//! ```

#![deny(unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]

pub mod config;
pub mod errors;
pub mod files;
pub mod generation;
pub mod types;

pub use config::SelfSignedConfig;
pub use errors::{Result, TestTlsError};
pub use files::{
    generate_files, generate_files_with, write_certificate_to_file, write_certificates_to_file,
};
pub use generation::{generate_data, generate_data_with};
pub use types::{GeneratedFiles, ScopedFiles, SelfSignedCertificate};
