use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Flat mapping of scalar XML attributes.
///
/// Values are kept as the caller wrote them; amounts such as `"100.00"` are
/// never reparsed or reformatted. Serialized transparently, so a JSON object
/// of strings deserializes straight into `Attributes`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Attributes(BTreeMap<String, String>);

impl Attributes {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set an attribute, replacing any previous value under the same name.
    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.0.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterate attributes ordered by name.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub(crate) fn remove(&mut self, name: &str) -> Option<String> {
        self.0.remove(name)
    }
}

impl<K: Into<String>, V: Into<String>, const N: usize> From<[(K, V); N]> for Attributes {
    fn from(pairs: [(K, V); N]) -> Self {
        pairs.into_iter().collect()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

/// Lifecycle of a Comprobante, derived from which slots are filled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum DocumentState {
    /// Emisor, Receptor or every Concepto is still missing.
    Draft,
    /// Emisor, Receptor and at least one Concepto are attached.
    Structured,
    /// `NoCertificado` and `Certificado` are set.
    Certified,
    /// `Sello` is set. Terminal.
    Signed,
}

/// Tax block of a single Concepto (`cfdi:Concepto/cfdi:Impuestos`).
///
/// Each entry carries `Base`, `Impuesto`, `TipoFactor`, `TasaOCuota` and
/// `Importe`; none of them are checked here.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConceptoImpuestos {
    pub traslados: Vec<Attributes>,
    pub retenciones: Vec<Attributes>,
}

impl ConceptoImpuestos {
    /// A Concepto only emits `cfdi:Impuestos` when this is false.
    pub fn is_empty(&self) -> bool {
        self.traslados.is_empty() && self.retenciones.is_empty()
    }
}

/// One line item (`cfdi:Concepto`).
///
/// Produced by [`ConceptoBuilder`](super::ConceptoBuilder) and immutable once
/// committed to a Comprobante.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Concepto {
    pub attributes: Attributes,
    pub impuestos: ConceptoImpuestos,
}

/// Traslados or Retenciones of the document totals, with the total amount
/// that announces them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxGroup {
    pub total: String,
    pub entries: Vec<Attributes>,
}

/// Document-level tax totals (`cfdi:Comprobante/cfdi:Impuestos`).
///
/// Traslados and Retenciones are independent: either, both or neither may be
/// present. A group exists only together with its total, so entries without
/// a total cannot be expressed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImpuestosTotales {
    pub traslados: Option<TaxGroup>,
    pub retenciones: Option<TaxGroup>,
}

impl ImpuestosTotales {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set `TotalImpuestosTrasladados` and its `cfdi:Traslado` entries. The
    /// `cfdi:Traslados` container is written even when `entries` is empty.
    pub fn traslados(
        mut self,
        total: impl Into<String>,
        entries: impl IntoIterator<Item = Attributes>,
    ) -> Self {
        self.traslados = Some(TaxGroup {
            total: total.into(),
            entries: entries.into_iter().collect(),
        });
        self
    }

    /// Set `TotalImpuestosRetenidos` and its `cfdi:Retencion` entries.
    pub fn retenciones(
        mut self,
        total: impl Into<String>,
        entries: impl IntoIterator<Item = Attributes>,
    ) -> Self {
        self.retenciones = Some(TaxGroup {
            total: total.into(),
            entries: entries.into_iter().collect(),
        });
        self
    }
}

/// Related documents (`cfdi:CfdiRelacionados`), e.g. a credit note pointing
/// at the invoices it corrects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CfdiRelacionados {
    /// SAT catalog c_TipoRelacion, e.g. "01" for a credit note.
    pub tipo_relacion: String,
    /// Fiscal folio UUIDs of the related documents, in insertion order.
    pub uuids: Vec<String>,
}

/// Certificate attributes set on the root by certification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct Certificacion {
    pub(crate) no_certificado: String,
    pub(crate) certificado: String,
}

/// Root entity (`cfdi:Comprobante`).
///
/// Children live in named slots and are always serialized in schema order,
/// whatever order they were attached in. Ownership is strictly tree-shaped;
/// the only root fields that change after construction are the certificate
/// attributes and the seal.
#[derive(Debug, Clone)]
pub struct Comprobante {
    pub(crate) attributes: Attributes,
    pub(crate) relacionados: Option<CfdiRelacionados>,
    pub(crate) emisor: Option<Attributes>,
    pub(crate) receptor: Option<Attributes>,
    pub(crate) conceptos: Vec<Concepto>,
    pub(crate) impuestos: Option<ImpuestosTotales>,
    pub(crate) certificacion: Option<Certificacion>,
    pub(crate) sello: Option<String>,
}

impl Comprobante {
    /// Scalar root attributes, including `Version`.
    pub fn attributes(&self) -> &Attributes {
        &self.attributes
    }

    pub fn relacionados(&self) -> Option<&CfdiRelacionados> {
        self.relacionados.as_ref()
    }

    pub fn emisor(&self) -> Option<&Attributes> {
        self.emisor.as_ref()
    }

    pub fn receptor(&self) -> Option<&Attributes> {
        self.receptor.as_ref()
    }

    pub fn conceptos(&self) -> &[Concepto] {
        &self.conceptos
    }

    pub fn impuestos(&self) -> Option<&ImpuestosTotales> {
        self.impuestos.as_ref()
    }

    /// `NoCertificado`: the certificate serial number bytes read as characters.
    pub fn no_certificado(&self) -> Option<&str> {
        self.certificacion.as_ref().map(|c| c.no_certificado.as_str())
    }

    /// `Certificado`: base64 of the DER certificate.
    pub fn certificado(&self) -> Option<&str> {
        self.certificacion.as_ref().map(|c| c.certificado.as_str())
    }

    /// `Sello`: base64 RSA-SHA256 signature over the cadena original.
    pub fn sello(&self) -> Option<&str> {
        self.sello.as_deref()
    }

    pub fn state(&self) -> DocumentState {
        if self.sello.is_some() {
            DocumentState::Signed
        } else if self.certificacion.is_some() {
            DocumentState::Certified
        } else if self.emisor.is_some() && self.receptor.is_some() && !self.conceptos.is_empty() {
            DocumentState::Structured
        } else {
            DocumentState::Draft
        }
    }
}
