use base64ct::{Base64, Encoding};
use rsa::RsaPublicKey;
use rsa::pkcs8::DecodePublicKey;
use std::path::Path;
use tracing::{debug, info};
use x509_cert::Certificate;
use x509_cert::der::pem::LineEnding;
use x509_cert::der::{Decode, Encode, EncodePem};

use crate::core::{CfdiError, Comprobante};

/// A CSD (Certificado de Sello Digital) loaded from DER bytes.
///
/// Keeps the original bytes: `Certificado` on the Comprobante is the base64
/// of exactly what was read, never a re-encoding.
#[derive(Debug, Clone)]
pub struct Certificado {
    der: Vec<u8>,
    certificate: Certificate,
    no_certificado: String,
}

impl Certificado {
    /// Parse a DER-encoded X.509 certificate (the `.cer` file issued by SAT).
    ///
    /// # Errors
    ///
    /// Returns `CfdiError::InvalidCertificate` when the bytes are not a
    /// well-formed certificate.
    pub fn from_der(der: impl Into<Vec<u8>>) -> Result<Self, CfdiError> {
        let der = der.into();
        let certificate = Certificate::from_der(&der)
            .map_err(|e| CfdiError::InvalidCertificate(format!("DER parse error: {e}")))?;
        let no_certificado =
            no_certificado_from_serial(certificate.tbs_certificate.serial_number.as_bytes());
        debug!(%no_certificado, bytes = der.len(), "loaded certificate");

        Ok(Self {
            der,
            certificate,
            no_certificado,
        })
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, CfdiError> {
        Self::from_der(std::fs::read(path)?)
    }

    /// Certificate number derived from the serial number (see
    /// [`no_certificado_from_serial`]).
    pub fn no_certificado(&self) -> &str {
        &self.no_certificado
    }

    /// Base64 of the DER bytes, embedded verbatim as `Certificado`.
    pub fn der_base64(&self) -> String {
        Base64::encode_string(&self.der)
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn certificate(&self) -> &Certificate {
        &self.certificate
    }

    /// PEM (`-----BEGIN CERTIFICATE-----`, 64-column lines).
    pub fn to_pem(&self) -> Result<String, CfdiError> {
        self.certificate
            .to_pem(LineEnding::LF)
            .map_err(|e| CfdiError::InvalidCertificate(format!("PEM encoding error: {e}")))
    }

    /// RSA public key from the SubjectPublicKeyInfo, used to verify a Sello.
    pub fn public_key(&self) -> Result<RsaPublicKey, CfdiError> {
        let spki = self
            .certificate
            .tbs_certificate
            .subject_public_key_info
            .to_der()
            .map_err(|e| CfdiError::InvalidCertificate(format!("SPKI encoding error: {e}")))?;
        RsaPublicKey::from_public_key_der(&spki)
            .map_err(|e| CfdiError::InvalidCertificate(format!("not an RSA public key: {e}")))
    }
}

/// Map each serial number byte to the character with that code point.
///
/// SAT serial numbers are the ASCII digits of the certificate number, so the
/// serial `0x3330303031...` yields `"30001..."`. This is neither the decimal
/// nor the hex rendering of the serial.
pub fn no_certificado_from_serial(serial: &[u8]) -> String {
    serial.iter().map(|&b| char::from(b)).collect()
}

impl Comprobante {
    /// Set `NoCertificado` and `Certificado` from `certificado`.
    ///
    /// Requires a Structured or Certified document; certifying again with
    /// the same certificate yields identical attributes. Fails with
    /// `InvalidState` once the document is sealed.
    pub fn certify(&mut self, certificado: &Certificado) -> Result<&mut Self, CfdiError> {
        self.set_certificacion(
            certificado.no_certificado().to_string(),
            certificado.der_base64(),
        )?;
        info!(no_certificado = certificado.no_certificado(), "certified Comprobante");
        Ok(self)
    }
}
