//! PEM encoding and temporary file persistence
//!
//! Every file is created through `tempfile` so names never collide between
//! concurrently running tests, then persisted so it outlives the call. Nothing
//! here deletes what it writes; see [`crate::ScopedFiles`] for that.

use std::io::Write;
use std::path::{Path, PathBuf};

use pem::{EncodeConfig, LineEnding, Pem};
use rustls::pki_types::CertificateDer;
use tracing::debug;

use crate::config::SelfSignedConfig;
use crate::errors::{Result, TestTlsError};
use crate::generation::generate_data_with;
use crate::types::GeneratedFiles;

pub const CERTIFICATE_PEM_TAG: &str = "CERTIFICATE";
pub const RSA_PRIVATE_KEY_PEM_TAG: &str = "RSA PRIVATE KEY";

const CERT_FILE_PREFIX: &str = "testCert";
const KEY_FILE_PREFIX: &str = "testKey";
const PEM_FILE_SUFFIX: &str = ".pem";

fn pem_config() -> EncodeConfig {
    EncodeConfig::new().set_line_ending(LineEnding::LF)
}

/// Wrap `contents` in a single PEM block labelled `tag`
#[must_use]
pub fn encode_pem(tag: &str, contents: &[u8]) -> String {
    pem::encode_config(&Pem::new(tag, contents), pem_config())
}

/// Generate a certificate and key with the default test parameters and write
/// both to temporary PEM files
///
/// # Errors
///
/// Returns an error if generation fails or either file cannot be written.
pub fn generate_files() -> Result<GeneratedFiles> {
    generate_files_with(&SelfSignedConfig::default())
}

/// Generate a certificate and key from `config` and write both to PEM files
/// in [`SelfSignedConfig::output_dir`]
///
/// # Errors
///
/// Returns an error if generation fails or either file cannot be written.
pub fn generate_files_with(config: &SelfSignedConfig) -> Result<GeneratedFiles> {
    let certificate = generate_data_with(config)?;
    let dir = config.output_dir();

    let key_pem = certificate.private_key_pem()?;
    let cert_path = write_pem_file(&dir, CERT_FILE_PREFIX, &certificate.cert_pem())?;
    let key_path = match write_pem_file(&dir, KEY_FILE_PREFIX, &key_pem) {
        Ok(path) => path,
        Err(e) => {
            // Don't leave half a pair behind
            let _ = std::fs::remove_file(&cert_path);
            return Err(e);
        }
    };

    Ok(GeneratedFiles {
        cert_path,
        key_path,
        certificate,
    })
}

/// Write one certificate to a new temporary PEM file
///
/// # Errors
///
/// Returns [`TestTlsError::Io`] if the file cannot be created or written.
pub fn write_certificate_to_file(cert: &CertificateDer<'_>) -> Result<PathBuf> {
    write_certificates_to_file(std::slice::from_ref(cert))
}

/// Write several certificates, in order, to one new temporary PEM file
///
/// # Errors
///
/// Returns [`TestTlsError::InvalidConfig`] for an empty slice and
/// [`TestTlsError::Io`] if the file cannot be created or written.
pub fn write_certificates_to_file(certs: &[CertificateDer<'_>]) -> Result<PathBuf> {
    if certs.is_empty() {
        return Err(TestTlsError::InvalidConfig(
            "no certificates to write".to_string(),
        ));
    }

    let blocks: Vec<Pem> = certs
        .iter()
        .map(|cert| Pem::new(CERTIFICATE_PEM_TAG, cert.as_ref()))
        .collect();
    let contents = pem::encode_many_config(&blocks, pem_config());

    write_pem_file(&std::env::temp_dir(), CERT_FILE_PREFIX, &contents)
}

/// Create a uniquely named file in `dir`, write `contents` and close it
fn write_pem_file(dir: &Path, prefix: &str, contents: &str) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new()
        .prefix(prefix)
        .suffix(PEM_FILE_SUFFIX)
        .tempfile_in(dir)?;
    file.write_all(contents.as_bytes())?;
    file.as_file().sync_all()?;

    let (handle, path) = file.keep()?;
    drop(handle);

    debug!(path = %path.display(), bytes = contents.len(), "wrote PEM file");
    Ok(path)
}
