use base64ct::{Base64, Encoding};
use rsa::pkcs1::DecodeRsaPrivateKey;
use rsa::pkcs1v15::{Signature, SigningKey, VerifyingKey};
use rsa::pkcs8::DecodePrivateKey;
use rsa::signature::{SignatureEncoding, Signer, Verifier};
use rsa::{RsaPrivateKey, RsaPublicKey};
use sha2::Sha256;
use tracing::{debug, info, warn};

use super::canonical::{Canonicalizer, XsltCanonicalizer};
use super::certificate::Certificado;
use super::config::SelloConfig;
use super::key::{KeyDecryptor, LlavePrivada, OpensslKeyTool};
use crate::core::{CfdiError, Comprobante, DocumentState};
use crate::xml::{to_unsigned_xml, to_xml};

/// Algorithm of every Sello: RSA, SHA-256 digest, PKCS#1 v1.5 padding.
pub const SELLO_ALGORITHM: &str = "RSA-SHA256";

/// Sign `cadena` with the encrypted key `llave`.
///
/// The key is decrypted first; a decryption failure short-circuits with
/// `KeyDecryptionFailed` before any signing is attempted. Returns the base64
/// signature.
pub fn sign(
    cadena: &str,
    llave: &LlavePrivada,
    password: &str,
    decryptor: &dyn KeyDecryptor,
) -> Result<String, CfdiError> {
    let pem = decryptor.decrypt(llave, password)?;
    sign_with_pem(cadena, &pem)
}

/// Sign `cadena` with an unencrypted PEM key (PKCS#8 or PKCS#1).
pub fn sign_with_pem(cadena: &str, pem: &str) -> Result<String, CfdiError> {
    let pem = pem.trim();
    let key = RsaPrivateKey::from_pkcs8_pem(pem)
        .or_else(|_| RsaPrivateKey::from_pkcs1_pem(pem))
        .map_err(|e| CfdiError::SigningFailed(format!("malformed decrypted key: {e}")))?;

    let signature = SigningKey::<Sha256>::new(key)
        .try_sign(cadena.as_bytes())
        .map_err(|e| CfdiError::SigningFailed(format!("{SELLO_ALGORITHM} failed: {e}")))?;
    Ok(Base64::encode_string(&signature.to_bytes()))
}

/// Check a base64 Sello over `cadena` against `public_key`.
pub fn verify_sello(
    cadena: &str,
    sello: &str,
    public_key: &RsaPublicKey,
) -> Result<(), CfdiError> {
    let raw = Base64::decode_vec(sello)
        .map_err(|e| CfdiError::VerificationFailed(format!("Sello is not base64: {e}")))?;
    let signature = Signature::try_from(raw.as_slice())
        .map_err(|e| CfdiError::VerificationFailed(format!("malformed signature: {e}")))?;
    VerifyingKey::<Sha256>::new(public_key.clone())
        .verify(cadena.as_bytes(), &signature)
        .map_err(|_| {
            CfdiError::VerificationFailed("Sello does not match the cadena original".into())
        })
}

/// Verify a sealed Comprobante against the certificate it embeds.
///
/// The cadena original is recomputed from the unsigned form, so the check
/// covers every attribute except `Sello` itself.
pub fn verify(
    comprobante: &Comprobante,
    canonicalizer: &dyn Canonicalizer,
) -> Result<(), CfdiError> {
    let sello = comprobante.sello().ok_or_else(|| CfdiError::InvalidState {
        state: comprobante.state(),
        message: "only a sealed document can be verified".into(),
    })?;
    let embedded = comprobante.certificado().unwrap_or_default();
    let der = Base64::decode_vec(embedded)
        .map_err(|e| CfdiError::InvalidCertificate(format!("Certificado is not base64: {e}")))?;
    let certificado = Certificado::from_der(der)?;
    if comprobante.no_certificado() != Some(certificado.no_certificado()) {
        return Err(CfdiError::VerificationFailed(
            "NoCertificado does not match the embedded certificate".into(),
        ));
    }

    let cadena = canonicalizer.canonicalize(&to_unsigned_xml(comprobante)?)?;
    verify_sello(&cadena, sello, &certificado.public_key()?)
}

/// Seals certified Comprobantes: cadena original → key decryption →
/// RSA-SHA256 → commit `Sello`.
///
/// Holds no per-document state, so one `Sellador` can seal many documents
/// from several threads at once.
#[derive(Debug, Clone)]
pub struct Sellador<C = XsltCanonicalizer, K = OpensslKeyTool> {
    canonicalizer: C,
    decryptor: K,
}

impl Sellador {
    /// `xsltproc` for the cadena original and `openssl` for the key.
    pub fn from_config(config: &SelloConfig) -> Self {
        Self::new(XsltCanonicalizer::new(config), OpensslKeyTool::new(config))
    }
}

impl<C: Canonicalizer, K: KeyDecryptor> Sellador<C, K> {
    pub fn new(canonicalizer: C, decryptor: K) -> Self {
        Self {
            canonicalizer,
            decryptor,
        }
    }

    pub fn canonicalizer(&self) -> &C {
        &self.canonicalizer
    }

    /// Cadena original of a certified document.
    ///
    /// Always computed from the unsigned form, so a sealed document yields
    /// the string its Sello covers.
    pub fn cadena_original(&self, comprobante: &Comprobante) -> Result<String, CfdiError> {
        match comprobante.state() {
            DocumentState::Certified | DocumentState::Signed => {}
            state => {
                return Err(CfdiError::InvalidState {
                    state,
                    message: "certify the document before computing its cadena original".into(),
                });
            }
        }
        let xml = to_unsigned_xml(comprobante)?;
        self.canonicalizer.canonicalize(&xml)
    }

    /// Seal `comprobante` and return the final XML.
    ///
    /// On failure the document keeps its certificate attributes and stays
    /// unsealed, so sealing can be retried (e.g. with the right password).
    ///
    /// # Errors
    ///
    /// `InvalidState` unless the document is Certified,
    /// `CanonicalizationFailed`, `KeyDecryptionFailed` or `SigningFailed`
    /// from the respective step.
    pub fn sellar(
        &self,
        comprobante: &mut Comprobante,
        llave: &LlavePrivada,
        password: &str,
    ) -> Result<String, CfdiError> {
        let state = comprobante.state();
        if state != DocumentState::Certified {
            return Err(CfdiError::InvalidState {
                state,
                message: "only a certified, unsealed document can be sealed".into(),
            });
        }

        let cadena = self.cadena_original(comprobante)?;
        debug!(len = cadena.len(), "signing cadena original");
        let sello = sign(&cadena, llave, password, &self.decryptor).inspect_err(|e| {
            warn!(error = %e, "sealing failed");
        })?;
        comprobante.commit_sello(sello)?;
        info!(
            no_certificado = comprobante.no_certificado().unwrap_or_default(),
            "sealed Comprobante"
        );

        to_xml(comprobante)
    }

    /// Verify a sealed document with this Sellador's canonicalizer.
    pub fn verify(&self, comprobante: &Comprobante) -> Result<(), CfdiError> {
        verify(comprobante, &self.canonicalizer)
    }
}
