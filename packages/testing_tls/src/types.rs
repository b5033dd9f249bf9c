//! Generated certificate material and file handles

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use rsa::pkcs1::EncodeRsaPrivateKey;
use rsa::{RsaPrivateKey, RsaPublicKey};
use rustls::pki_types::{CertificateDer, PrivateKeyDer, PrivatePkcs1KeyDer};
use tracing::{debug, warn};

use crate::errors::Result;
use crate::files::{encode_pem, CERTIFICATE_PEM_TAG, RSA_PRIVATE_KEY_PEM_TAG};

/// A self-signed certificate together with the RSA key that signed it
#[derive(Debug, Clone)]
pub struct SelfSignedCertificate {
    cert_der: CertificateDer<'static>,
    private_key: RsaPrivateKey,
}

impl SelfSignedCertificate {
    pub(crate) fn new(cert_der: CertificateDer<'static>, private_key: RsaPrivateKey) -> Self {
        Self {
            cert_der,
            private_key,
        }
    }

    /// DER-encoded X.509 certificate
    #[must_use]
    pub fn cert_der(&self) -> &CertificateDer<'static> {
        &self.cert_der
    }

    #[must_use]
    pub fn private_key(&self) -> &RsaPrivateKey {
        &self.private_key
    }

    #[must_use]
    pub fn public_key(&self) -> RsaPublicKey {
        self.private_key.to_public_key()
    }

    /// Certificate as a single `CERTIFICATE` PEM block
    #[must_use]
    pub fn cert_pem(&self) -> String {
        encode_pem(CERTIFICATE_PEM_TAG, self.cert_der.as_ref())
    }

    /// PKCS#1 `RSAPrivateKey` DER encoding of the private key
    ///
    /// # Errors
    ///
    /// Returns [`crate::TestTlsError::KeyEncoding`] if the key cannot be encoded.
    pub fn private_key_pkcs1_der(&self) -> Result<Vec<u8>> {
        let document = self.private_key.to_pkcs1_der()?;
        Ok(document.as_bytes().to_vec())
    }

    /// Private key as a single `RSA PRIVATE KEY` PEM block
    ///
    /// # Errors
    ///
    /// Returns [`crate::TestTlsError::KeyEncoding`] if the key cannot be encoded.
    pub fn private_key_pem(&self) -> Result<String> {
        Ok(encode_pem(RSA_PRIVATE_KEY_PEM_TAG, &self.private_key_pkcs1_der()?))
    }

    /// Private key in the form `rustls` server and client configs accept
    ///
    /// # Errors
    ///
    /// Returns [`crate::TestTlsError::KeyEncoding`] if the key cannot be encoded.
    pub fn private_key_der(&self) -> Result<PrivateKeyDer<'static>> {
        let der = self.private_key_pkcs1_der()?;
        Ok(PrivateKeyDer::Pkcs1(PrivatePkcs1KeyDer::from(der)))
    }

    #[must_use]
    pub fn into_parts(self) -> (CertificateDer<'static>, RsaPrivateKey) {
        (self.cert_der, self.private_key)
    }
}

/// Certificate and key files written by [`crate::generate_files`]
///
/// The files are left on disk. Wrap them in [`ScopedFiles`] to have them
/// removed when a test finishes.
#[derive(Debug, Clone)]
pub struct GeneratedFiles {
    pub cert_path: PathBuf,
    pub key_path: PathBuf,
    pub certificate: SelfSignedCertificate,
}

impl GeneratedFiles {
    /// Guard that deletes both files when dropped
    #[must_use]
    pub fn scoped(&self) -> ScopedFiles {
        ScopedFiles::new([&self.cert_path, &self.key_path])
    }
}

/// Removes the files it tracks on drop
///
/// Files that are already gone are ignored; other removal failures are
/// logged and otherwise swallowed since `Drop` cannot report them.
#[derive(Debug, Default)]
pub struct ScopedFiles {
    paths: Vec<PathBuf>,
}

impl ScopedFiles {
    #[must_use]
    pub fn new<I, P>(paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        Self {
            paths: paths.into_iter().map(|p| p.as_ref().to_path_buf()).collect(),
        }
    }

    /// Track one more file
    pub fn push<P: AsRef<Path>>(&mut self, path: P) {
        self.paths.push(path.as_ref().to_path_buf());
    }

    #[must_use]
    pub fn paths(&self) -> &[PathBuf] {
        &self.paths
    }

    /// Stop tracking the files and hand the paths back without deleting them
    #[must_use]
    pub fn release(mut self) -> Vec<PathBuf> {
        std::mem::take(&mut self.paths)
    }
}

impl Drop for ScopedFiles {
    fn drop(&mut self) {
        for path in self.paths.drain(..) {
            match fs::remove_file(&path) {
                Ok(()) => debug!(path = %path.display(), "removed test file"),
                Err(e) if e.kind() == ErrorKind::NotFound => {}
                Err(e) => warn!(path = %path.display(), error = %e, "failed to remove test file"),
            }
        }
    }
}
