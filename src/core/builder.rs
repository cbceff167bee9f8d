use tracing::{debug, warn};

use super::error::CfdiError;
use super::types::*;
use super::CFDI_VERSION;

/// Root attributes set by the serializer, certification or sealing; never
/// accepted from the caller's attribute map.
pub const RESERVED_ATTRIBUTES: &[&str] = &[
    "NoCertificado",
    "Certificado",
    "Sello",
    "xmlns:cfdi",
    "xmlns:xsi",
    "xsi:schemaLocation",
];

impl Comprobante {
    /// Create a Draft Comprobante from its scalar attributes.
    ///
    /// `Version` is always set to `3.3`. Namespace declarations and the
    /// certificate and seal attributes in `attributes` are dropped.
    pub fn new(mut attributes: Attributes) -> Self {
        for name in RESERVED_ATTRIBUTES {
            if attributes.remove(name).is_some() {
                warn!(attribute = *name, "dropping reserved attribute from Comprobante input");
            }
        }
        attributes.insert("Version", CFDI_VERSION);
        debug!(attributes = attributes.len(), "created Comprobante");

        Self {
            attributes,
            relacionados: None,
            emisor: None,
            receptor: None,
            conceptos: Vec::new(),
            impuestos: None,
            certificacion: None,
            sello: None,
        }
    }

    /// Attach `cfdi:CfdiRelacionados`.
    pub fn attach_relacionados(
        &mut self,
        tipo_relacion: impl Into<String>,
        uuids: impl IntoIterator<Item = impl Into<String>>,
    ) -> Result<&mut Self, CfdiError> {
        self.ensure_unsigned("attach CfdiRelacionados")?;
        if self.relacionados.is_some() {
            return Err(self.already_attached("CfdiRelacionados"));
        }
        self.relacionados = Some(CfdiRelacionados {
            tipo_relacion: tipo_relacion.into(),
            uuids: uuids.into_iter().map(Into::into).collect(),
        });
        Ok(self)
    }

    /// Attach `cfdi:Emisor` (Rfc, Nombre, RegimenFiscal).
    pub fn attach_emisor(&mut self, attributes: Attributes) -> Result<&mut Self, CfdiError> {
        self.ensure_unsigned("attach Emisor")?;
        if self.emisor.is_some() {
            return Err(self.already_attached("Emisor"));
        }
        self.emisor = Some(attributes);
        Ok(self)
    }

    /// Attach `cfdi:Receptor` (Rfc, Nombre, UsoCFDI).
    pub fn attach_receptor(&mut self, attributes: Attributes) -> Result<&mut Self, CfdiError> {
        self.ensure_unsigned("attach Receptor")?;
        if self.receptor.is_some() {
            return Err(self.already_attached("Receptor"));
        }
        self.receptor = Some(attributes);
        Ok(self)
    }

    /// Attach the document-level `cfdi:Impuestos` totals block.
    ///
    /// Entries keep insertion order; amounts are not summed or checked.
    pub fn attach_totals(&mut self, impuestos: ImpuestosTotales) -> Result<&mut Self, CfdiError> {
        self.ensure_unsigned("attach Impuestos")?;
        if self.impuestos.is_some() {
            return Err(self.already_attached("Impuestos"));
        }
        self.impuestos = Some(impuestos);
        Ok(self)
    }

    /// Start a new line item. Nothing is added until
    /// [`ConceptoBuilder::commit`] is called.
    pub fn new_concepto(&self, attributes: Attributes) -> ConceptoBuilder {
        ConceptoBuilder::new(attributes)
    }

    /// Append a finished Concepto to `cfdi:Conceptos`.
    pub fn add_concepto(&mut self, concepto: Concepto) -> Result<&mut Self, CfdiError> {
        self.ensure_unsigned("add Concepto")?;
        self.conceptos.push(concepto);
        debug!(conceptos = self.conceptos.len(), "committed Concepto");
        Ok(self)
    }

    pub(crate) fn set_certificacion(
        &mut self,
        no_certificado: String,
        certificado: String,
    ) -> Result<(), CfdiError> {
        match self.state() {
            DocumentState::Structured | DocumentState::Certified => {
                self.certificacion = Some(Certificacion {
                    no_certificado,
                    certificado,
                });
                Ok(())
            }
            DocumentState::Draft => Err(CfdiError::invalid_state(
                DocumentState::Draft,
                "Emisor, Receptor and at least one Concepto are required before certification",
            )),
            DocumentState::Signed => Err(CfdiError::invalid_state(
                DocumentState::Signed,
                "certifying a sealed document would invalidate its Sello",
            )),
        }
    }

    pub(crate) fn commit_sello(&mut self, sello: String) -> Result<(), CfdiError> {
        match self.state() {
            DocumentState::Certified => {
                self.sello = Some(sello);
                Ok(())
            }
            state => Err(CfdiError::invalid_state(
                state,
                "a Sello can only be committed to a certified, unsealed document",
            )),
        }
    }

    fn ensure_unsigned(&self, operation: &str) -> Result<(), CfdiError> {
        if self.sello.is_some() {
            return Err(CfdiError::invalid_state(
                DocumentState::Signed,
                format!("cannot {operation} on a sealed document"),
            ));
        }
        Ok(())
    }

    fn already_attached(&self, element: &str) -> CfdiError {
        CfdiError::invalid_state(self.state(), format!("{element} is already attached"))
    }
}

/// Accumulates the taxes of one line item before it is committed.
///
/// `commit` consumes the builder, so a builder can be used only once.
///
/// ```
/// use cfdi::core::*;
///
/// let concepto = ConceptoBuilder::new(Attributes::from([("Importe", "100.00")]))
///     .traslado(Attributes::from([("Impuesto", "002"), ("Importe", "16.00")]))
///     .build();
/// assert_eq!(concepto.impuestos.traslados.len(), 1);
/// assert!(concepto.impuestos.retenciones.is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct ConceptoBuilder {
    attributes: Attributes,
    impuestos: ConceptoImpuestos,
}

impl ConceptoBuilder {
    pub fn new(attributes: Attributes) -> Self {
        Self {
            attributes,
            impuestos: ConceptoImpuestos::default(),
        }
    }

    pub fn traslado(mut self, traslado: Attributes) -> Self {
        self.impuestos.traslados.push(traslado);
        self
    }

    pub fn retencion(mut self, retencion: Attributes) -> Self {
        self.impuestos.retenciones.push(retencion);
        self
    }

    /// Finish the line item without committing it.
    pub fn build(self) -> Concepto {
        Concepto {
            attributes: self.attributes,
            impuestos: self.impuestos,
        }
    }

    /// Move the line item into `into`'s Conceptos sequence.
    pub fn commit(self, into: &mut Comprobante) -> Result<(), CfdiError> {
        into.add_concepto(self.build())?;
        Ok(())
    }
}
