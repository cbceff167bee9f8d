//! # cfdi
//!
//! Assembly and digital sealing of Mexican CFDI 3.3 invoices
//! (Comprobante Fiscal Digital por Internet).
//!
//! The crate builds a Comprobante as an owned tree, certifies it with the
//! issuer's CSD certificate, obtains the *cadena original* (canonical string)
//! from the SAT XSLT transform, and seals it with RSA-SHA256.
//!
//! All amounts are opaque strings: the caller's decimal formatting is
//! preserved byte for byte, because the seal covers the exact text.
//!
//! ## Quick Start
//!
//! ```rust
//! use cfdi::core::*;
//!
//! let mut doc = Comprobante::new(Attributes::from([
//!     ("Serie", "A"),
//!     ("Folio", "1"),
//!     ("SubTotal", "100.00"),
//!     ("Total", "116.00"),
//! ]));
//! doc.attach_emisor(Attributes::from([("Rfc", "AAA010101AAA")]))?;
//! doc.attach_receptor(Attributes::from([("Rfc", "XAXX010101000")]))?;
//! doc.new_concepto(Attributes::from([("Importe", "100.00")]))
//!     .traslado(Attributes::from([("Impuesto", "002"), ("Importe", "16.00")]))
//!     .commit(&mut doc)?;
//!
//! assert_eq!(doc.state(), DocumentState::Structured);
//! let xml = cfdi::xml::to_xml(&doc)?;
//! assert!(xml.contains("<cfdi:Traslados>"));
//! # Ok::<(), CfdiError>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Description |
//! |---------|-------------|
//! | `core` (default) | Entity tree, document builder, XML serializer |
//! | `sello` (default) | Certificate loader, cadena original gateway, signer |
//! | `all` | Everything |

#[cfg(feature = "core")]
pub mod core;

#[cfg(feature = "core")]
pub mod xml;

#[cfg(feature = "sello")]
pub mod sello;

// Re-export core types at crate root for convenience
#[cfg(feature = "core")]
pub use crate::core::*;
