//! Temporary PEM files written by the generator

use std::fs;
use std::io::BufReader;

use rsa::pkcs1::{DecodeRsaPrivateKey, EncodeRsaPublicKey};
use rsa::traits::PublicKeyParts;
use rsa::RsaPrivateKey;
use rustls::pki_types::CertificateDer;
use rustls_pemfile::Item;
use testing_tls::{
    generate_data, generate_files, generate_files_with, write_certificate_to_file,
    write_certificates_to_file, ScopedFiles, SelfSignedConfig,
};
use x509_parser::parse_x509_certificate;

fn read_single_item(path: &std::path::Path) -> Item {
    let file = fs::File::open(path).unwrap();
    let mut reader = BufReader::new(file);
    let item = rustls_pemfile::read_one(&mut reader).unwrap().unwrap();
    assert!(rustls_pemfile::read_one(&mut reader).unwrap().is_none());
    item
}

#[test]
fn test_generate_files_writes_two_readable_files() {
    let files = generate_files().unwrap();
    let _cleanup = files.scoped();

    assert_ne!(files.cert_path, files.key_path);
    assert!(fs::metadata(&files.cert_path).unwrap().len() > 0);
    assert!(fs::metadata(&files.key_path).unwrap().len() > 0);

    let cert_name = files.cert_path.file_name().unwrap().to_string_lossy().into_owned();
    let key_name = files.key_path.file_name().unwrap().to_string_lossy().into_owned();
    assert!(cert_name.starts_with("testCert"));
    assert!(key_name.starts_with("testKey"));
}

#[test]
fn test_certificate_file_round_trips_der() {
    let files = generate_files().unwrap();
    let _cleanup = files.scoped();

    let pem = pem::parse(fs::read(&files.cert_path).unwrap()).unwrap();
    assert_eq!(pem.tag(), "CERTIFICATE");
    assert_eq!(pem.contents(), files.certificate.cert_der().as_ref());

    let Item::X509Certificate(der) = read_single_item(&files.cert_path) else {
        panic!("certificate file holds a non-certificate block");
    };
    let (_, cert) = parse_x509_certificate(&der).unwrap();
    assert!(cert.is_ca());
}

#[test]
fn test_key_file_is_pkcs1_matching_certificate() {
    let files = generate_files().unwrap();
    let _cleanup = files.scoped();

    let pem = pem::parse(fs::read(&files.key_path).unwrap()).unwrap();
    assert_eq!(pem.tag(), "RSA PRIVATE KEY");

    let key = RsaPrivateKey::from_pkcs1_der(pem.contents()).unwrap();
    assert_eq!(key.size() * 8, 2048);
    assert_eq!(key.to_public_key(), files.certificate.public_key());

    let (_, cert) = parse_x509_certificate(files.certificate.cert_der()).unwrap();
    let public = key.to_public_key().to_pkcs1_der().unwrap();
    assert_eq!(
        cert.public_key().subject_public_key.data.as_ref(),
        public.as_bytes()
    );

    assert!(matches!(read_single_item(&files.key_path), Item::Pkcs1Key(_)));
}

#[test]
fn test_generate_files_honors_temp_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = SelfSignedConfig::new().temp_dir(dir.path());

    let files = generate_files_with(&config).unwrap();

    assert_eq!(files.cert_path.parent(), Some(dir.path()));
    assert_eq!(files.key_path.parent(), Some(dir.path()));
}

#[test]
fn test_generate_files_reports_missing_dir() {
    let dir = tempfile::tempdir().unwrap();
    let config = SelfSignedConfig::new().temp_dir(dir.path().join("missing"));

    let err = generate_files_with(&config).unwrap_err();
    assert!(matches!(err, testing_tls::TestTlsError::Io(_)));
}

#[test]
fn test_scoped_guard_removes_generated_files() {
    let files = generate_files().unwrap();
    {
        let _cleanup = files.scoped();
        assert!(files.cert_path.exists());
        assert!(files.key_path.exists());
    }
    assert!(!files.cert_path.exists());
    assert!(!files.key_path.exists());
}

#[test]
fn test_write_certificate_to_file() {
    let generated = generate_data().unwrap();
    let path = write_certificate_to_file(generated.cert_der()).unwrap();
    let _cleanup = ScopedFiles::new([&path]);

    let Item::X509Certificate(der) = read_single_item(&path) else {
        panic!("expected a certificate block");
    };
    assert_eq!(&der, generated.cert_der());
}

#[test]
fn test_write_certificates_keeps_order() {
    let first = generate_data().unwrap();
    let second = generate_data().unwrap();
    let certs = vec![first.cert_der().clone(), second.cert_der().clone()];

    let path = write_certificates_to_file(&certs).unwrap();
    let _cleanup = ScopedFiles::new([&path]);

    let file = fs::File::open(&path).unwrap();
    let read: Vec<CertificateDer<'static>> = rustls_pemfile::certs(&mut BufReader::new(file))
        .collect::<Result<_, _>>()
        .unwrap();
    assert_eq!(read, certs);
}
