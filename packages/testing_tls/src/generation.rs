//! Self-signed certificate generation

use rand::rngs::OsRng;
use rand::RngCore;
use rcgen::{
    BasicConstraints, CertificateParams, DistinguishedName, DnType, ExtendedKeyUsagePurpose, IsCa,
    KeyPair, KeyUsagePurpose, PKCS_RSA_SHA256, SanType, SerialNumber,
};
use rsa::pkcs8::EncodePrivateKey;
use rsa::RsaPrivateKey;
use rustls::pki_types::{CertificateDer, PrivatePkcs8KeyDer};
use time::OffsetDateTime;
use tracing::debug;

use crate::config::SelfSignedConfig;
use crate::errors::Result;
use crate::types::SelfSignedCertificate;

/// Serial numbers are drawn from `[0, 2^128)`
const SERIAL_NUMBER_BYTES: usize = 16;

/// Generate a certificate and key with the default test parameters
///
/// # Errors
///
/// Returns an error if key generation, key encoding or signing fails.
pub fn generate_data() -> Result<SelfSignedCertificate> {
    generate_data_with(&SelfSignedConfig::default())
}

/// Generate a certificate and key from `config`
///
/// # Errors
///
/// Returns [`crate::TestTlsError::InvalidConfig`] for rejected parameters and
/// the matching variant if key generation, encoding or signing fails.
pub fn generate_data_with(config: &SelfSignedConfig) -> Result<SelfSignedCertificate> {
    config.validate()?;

    let private_key = RsaPrivateKey::new(&mut OsRng, config.key_bits)?;
    let signing_key = signing_key_pair(&private_key)?;

    let params = certificate_params(config)?;
    let cert = params.self_signed(&signing_key)?;

    debug!(
        key_bits = config.key_bits,
        organization = %config.organization,
        "generated self-signed test certificate"
    );

    Ok(SelfSignedCertificate::new(
        CertificateDer::from(cert.der().to_vec()),
        private_key,
    ))
}

/// Build the certificate parameters for one generation call
fn certificate_params(config: &SelfSignedConfig) -> Result<CertificateParams> {
    let mut params = CertificateParams::default();
    params.serial_number = Some(random_serial_number());

    let mut dn = DistinguishedName::new();
    dn.push(DnType::OrganizationName, config.organization.as_str());
    params.distinguished_name = dn;

    // UTCTime has second precision; drop sub-seconds so both bounds encode exactly
    let now = OffsetDateTime::now_utc();
    let not_before = now.replace_nanosecond(0).unwrap_or(now);
    params.not_before = not_before;
    params.not_after = not_before + config.validity;

    params.key_usages = vec![
        KeyUsagePurpose::KeyEncipherment,
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyCertSign,
    ];
    params.extended_key_usages = vec![ExtendedKeyUsagePurpose::ServerAuth];
    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);

    let mut sans = Vec::with_capacity(config.ip_addresses.len() + config.dns_names.len());
    sans.extend(config.ip_addresses.iter().copied().map(SanType::IpAddress));
    for name in &config.dns_names {
        sans.push(SanType::DnsName(name.as_str().try_into()?));
    }
    params.subject_alt_names = sans;

    Ok(params)
}

/// Import the RSA key into rcgen for SHA256-with-RSA signing
fn signing_key_pair(private_key: &RsaPrivateKey) -> Result<KeyPair> {
    let document = private_key.to_pkcs8_der()?;
    let pkcs8 = PrivatePkcs8KeyDer::from(document.as_bytes());
    Ok(KeyPair::from_pkcs8_der_and_sign_algo(&pkcs8, &PKCS_RSA_SHA256)?)
}

fn random_serial_number() -> SerialNumber {
    let mut bytes = [0u8; SERIAL_NUMBER_BYTES];
    OsRng.fill_bytes(&mut bytes);
    SerialNumber::from_slice(&bytes)
}
