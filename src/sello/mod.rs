//! Certification and sealing of a Comprobante.
//!
//! The pipeline is strictly sequential per document:
//!
//! 1. [`Comprobante::certify`](crate::core::Comprobante::certify) sets
//!    `NoCertificado` and `Certificado` from a [`Certificado`].
//! 2. The unsigned XML goes through a [`Canonicalizer`] (the SAT XSLT) to
//!    obtain the cadena original.
//! 3. A [`KeyDecryptor`] opens the CSD private key with its password.
//! 4. The cadena original is signed with RSA-SHA256 (PKCS#1 v1.5) and the
//!    base64 signature is committed as `Sello`.
//!
//! [`Sellador`] runs steps 2–4. Nothing is retried: a wrong password or a
//! failing transform is reported to the caller, and the document keeps its
//! certificate attributes so only the sealing step needs to be repeated.
//!
//! # Example
//!
//! ```no_run
//! use cfdi::core::*;
//! use cfdi::sello::*;
//!
//! let mut doc: Comprobante = todo!(); // built with the core API
//! let config = SelloConfig::default().with_stylesheet_path("xslt/cadenaoriginal_3_3.xslt");
//! let sellador = Sellador::from_config(&config);
//!
//! doc.certify(&Certificado::from_file("CSD.cer")?)?;
//! let llave = LlavePrivada::from_file("CSD.key")?;
//! let xml = sellador.sellar(&mut doc, &llave, "12345678a")?;
//! # Ok::<(), CfdiError>(())
//! ```

mod canonical;
mod certificate;
mod config;
mod key;
mod signer;

pub use canonical::*;
pub use certificate::*;
pub use config::*;
pub use key::*;
pub use signer::*;
