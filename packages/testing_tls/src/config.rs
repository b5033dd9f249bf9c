//! Generation parameters for self-signed test certificates
//!
//! [`SelfSignedConfig::default`] reproduces the fixed values dependent test
//! suites expect: organization `Acme Co`, SANs `127.0.0.1` and
//! `testhost.example.com`, two years of validity and a 2048-bit RSA key.

use std::net::{IpAddr, Ipv4Addr};
use std::path::{Path, PathBuf};

use time::Duration;

use crate::errors::{Result, TestTlsError};

pub const DEFAULT_ORGANIZATION: &str = "Acme Co";
pub const DEFAULT_DNS_NAME: &str = "testhost.example.com";
pub const DEFAULT_IP_ADDRESS: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);
pub const DEFAULT_VALIDITY_DAYS: u32 = 2 * 365;
pub const DEFAULT_KEY_BITS: usize = 2048;

/// Smallest and largest RSA modulus the signer accepts
pub const MIN_KEY_BITS: usize = 2048;
pub const MAX_KEY_BITS: usize = 8192;

/// Parameters for a self-signed certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelfSignedConfig {
    pub organization: String,
    pub dns_names: Vec<String>,
    pub ip_addresses: Vec<IpAddr>,
    pub validity: Duration,
    pub key_bits: usize,
    /// Directory for written files, `std::env::temp_dir()` when unset
    pub temp_dir: Option<PathBuf>,
}

impl Default for SelfSignedConfig {
    fn default() -> Self {
        Self {
            organization: DEFAULT_ORGANIZATION.to_string(),
            dns_names: vec![DEFAULT_DNS_NAME.to_string()],
            ip_addresses: vec![DEFAULT_IP_ADDRESS],
            validity: Duration::days(i64::from(DEFAULT_VALIDITY_DAYS)),
            key_bits: DEFAULT_KEY_BITS,
            temp_dir: None,
        }
    }
}

impl SelfSignedConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the subject organization name
    #[must_use]
    pub fn organization(self, organization: &str) -> Self {
        Self {
            organization: organization.to_string(),
            ..self
        }
    }

    /// Replace the DNS subject alternative names
    #[must_use]
    pub fn dns_names(self, names: &[&str]) -> Self {
        Self {
            dns_names: names.iter().map(std::string::ToString::to_string).collect(),
            ..self
        }
    }

    /// Replace the IP subject alternative names
    #[must_use]
    pub fn ip_addresses(self, addrs: &[IpAddr]) -> Self {
        Self {
            ip_addresses: addrs.to_vec(),
            ..self
        }
    }

    /// Set validity period in days
    #[must_use]
    pub fn valid_for_days(self, days: u32) -> Self {
        Self {
            validity: Duration::days(i64::from(days)),
            ..self
        }
    }

    #[must_use]
    pub fn key_bits(self, bits: usize) -> Self {
        Self {
            key_bits: bits,
            ..self
        }
    }

    /// Write generated files into `dir` instead of the process temp directory
    #[must_use]
    pub fn temp_dir<P: AsRef<Path>>(self, dir: P) -> Self {
        Self {
            temp_dir: Some(dir.as_ref().to_path_buf()),
            ..self
        }
    }

    /// Directory that generated files are written to
    #[must_use]
    pub fn output_dir(&self) -> PathBuf {
        self.temp_dir.clone().unwrap_or_else(std::env::temp_dir)
    }

    /// Check the parameters before any key material is generated
    ///
    /// # Errors
    ///
    /// Returns [`TestTlsError::InvalidConfig`] for a non-positive validity
    /// period, an unsupported key size, or an empty SAN list.
    pub fn validate(&self) -> Result<()> {
        if !self.validity.is_positive() {
            return Err(TestTlsError::InvalidConfig(format!(
                "validity must be positive, got {:?}",
                self.validity
            )));
        }
        if !(MIN_KEY_BITS..=MAX_KEY_BITS).contains(&self.key_bits) {
            return Err(TestTlsError::InvalidConfig(format!(
                "key size must be between {MIN_KEY_BITS} and {MAX_KEY_BITS} bits, got {}",
                self.key_bits
            )));
        }
        if self.dns_names.is_empty() && self.ip_addresses.is_empty() {
            return Err(TestTlsError::InvalidConfig(
                "at least one DNS name or IP address is required".to_string(),
            ));
        }
        Ok(())
    }
}
