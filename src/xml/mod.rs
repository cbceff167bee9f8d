//! CFDI 3.3 XML serialization.
//!
//! Children are written from the Comprobante's named slots in schema order:
//! CfdiRelacionados, Emisor, Receptor, Conceptos, Impuestos. Attribute values
//! are written verbatim (XML-escaped), so amounts keep the caller's
//! formatting.

pub(crate) mod writer;

use crate::core::*;
use writer::XmlWriter;

pub type XmlResult = Result<String, CfdiError>;

/// Serialize the complete document, including `Sello` when present.
pub fn to_xml(comprobante: &Comprobante) -> XmlResult {
    write_comprobante(comprobante, true)
}

/// Serialize the document without `Sello`.
///
/// This is the only form handed to the cadena original transform, so the
/// canonical string never covers a previous or partial seal.
pub fn to_unsigned_xml(comprobante: &Comprobante) -> XmlResult {
    write_comprobante(comprobante, false)
}

fn write_comprobante(c: &Comprobante, include_sello: bool) -> XmlResult {
    let mut w = XmlWriter::new()?;

    let mut root = c.attributes().clone();
    if let (Some(no), Some(cert)) = (c.no_certificado(), c.certificado()) {
        root.insert("NoCertificado", no);
        root.insert("Certificado", cert);
    }
    if include_sello {
        if let Some(sello) = c.sello() {
            root.insert("Sello", sello);
        }
    }

    let namespaces = [
        ("xmlns:cfdi", ns::CFDI),
        ("xmlns:xsi", ns::XSI),
        ("xsi:schemaLocation", ns::SCHEMA_LOCATION),
    ];
    w.start_element("cfdi:Comprobante", namespaces.into_iter().chain(root.iter()))?;

    if let Some(rel) = c.relacionados() {
        w.start_element("cfdi:CfdiRelacionados", [("TipoRelacion", rel.tipo_relacion.as_str())])?;
        for uuid in &rel.uuids {
            w.empty_element("cfdi:CfdiRelacionado", [("UUID", uuid.as_str())])?;
        }
        w.end_element("cfdi:CfdiRelacionados")?;
    }

    if let Some(emisor) = c.emisor() {
        w.empty_element("cfdi:Emisor", emisor.iter())?;
    }
    if let Some(receptor) = c.receptor() {
        w.empty_element("cfdi:Receptor", receptor.iter())?;
    }

    if !c.conceptos().is_empty() {
        w.start_element("cfdi:Conceptos", [])?;
        for concepto in c.conceptos() {
            write_concepto(&mut w, concepto)?;
        }
        w.end_element("cfdi:Conceptos")?;
    }

    if let Some(impuestos) = c.impuestos() {
        write_totales(&mut w, impuestos)?;
    }

    w.end_element("cfdi:Comprobante")?;
    w.into_string()
}

fn write_concepto(w: &mut XmlWriter, concepto: &Concepto) -> Result<(), CfdiError> {
    let impuestos = &concepto.impuestos;
    if impuestos.is_empty() {
        w.empty_element("cfdi:Concepto", concepto.attributes.iter())?;
        return Ok(());
    }

    w.start_element("cfdi:Concepto", concepto.attributes.iter())?;
    w.start_element("cfdi:Impuestos", [])?;
    if !impuestos.traslados.is_empty() {
        write_group(w, "cfdi:Traslados", "cfdi:Traslado", &impuestos.traslados)?;
    }
    if !impuestos.retenciones.is_empty() {
        write_group(w, "cfdi:Retenciones", "cfdi:Retencion", &impuestos.retenciones)?;
    }
    w.end_element("cfdi:Impuestos")?;
    w.end_element("cfdi:Concepto")?;
    Ok(())
}

// Schema order of the totals block is Retenciones before Traslados. A group
// whose total was supplied is always written, even without entries.
fn write_totales(w: &mut XmlWriter, impuestos: &ImpuestosTotales) -> Result<(), CfdiError> {
    let mut totals = Attributes::new();
    if let Some(ret) = &impuestos.retenciones {
        totals.insert("TotalImpuestosRetenidos", ret.total.as_str());
    }
    if let Some(tras) = &impuestos.traslados {
        totals.insert("TotalImpuestosTrasladados", tras.total.as_str());
    }

    if impuestos.retenciones.is_none() && impuestos.traslados.is_none() {
        w.empty_element("cfdi:Impuestos", totals.iter())?;
        return Ok(());
    }

    w.start_element("cfdi:Impuestos", totals.iter())?;
    if let Some(ret) = &impuestos.retenciones {
        write_group(w, "cfdi:Retenciones", "cfdi:Retencion", &ret.entries)?;
    }
    if let Some(tras) = &impuestos.traslados {
        write_group(w, "cfdi:Traslados", "cfdi:Traslado", &tras.entries)?;
    }
    w.end_element("cfdi:Impuestos")?;
    Ok(())
}

/// Write `<group>` with one `<entry>` per item.
fn write_group(
    w: &mut XmlWriter,
    group: &str,
    entry: &str,
    entries: &[Attributes],
) -> Result<(), CfdiError> {
    if entries.is_empty() {
        w.empty_element(group, [])?;
        return Ok(());
    }
    w.start_element(group, [])?;
    for attrs in entries {
        w.empty_element(entry, attrs.iter())?;
    }
    w.end_element(group)?;
    Ok(())
}
