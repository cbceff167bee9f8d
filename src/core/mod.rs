//! Core CFDI entity tree, document builder, and errors.
//!
//! The root [`Comprobante`] owns its children in named slots; the builder
//! methods enforce the append-only lifecycle
//! `Draft → Structured → Certified → Signed`.

mod builder;
mod error;
mod types;

pub use builder::*;
pub use error::*;
pub use types::*;

/// CFDI schema version written on every Comprobante.
pub const CFDI_VERSION: &str = "3.3";

/// Namespace and schema location constants of CFDI 3.3.
pub mod ns {
    pub const CFDI: &str = "http://www.sat.gob.mx/cfd/3";
    pub const XSI: &str = "http://www.w3.org/2001/XMLSchema-instance";
    pub const SCHEMA_LOCATION: &str =
        "http://www.sat.gob.mx/cfd/3 http://www.sat.gob.mx/sitio_internet/cfd/3/cfdv33.xsd";
}
