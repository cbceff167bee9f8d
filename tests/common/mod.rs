#![allow(dead_code)]

use cfdi::core::*;
use quick_xml::Reader;
use quick_xml::events::Event;
use std::path::PathBuf;

pub const PASSWORD: &str = "12345678a";
pub const NO_CERTIFICADO: &str = "30001000000300023708";

pub fn fixture(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures")
        .join(name)
}

#[cfg(feature = "sello")]
pub fn certificado() -> cfdi::sello::Certificado {
    cfdi::sello::Certificado::from_file(fixture("csd_eku.cer")).unwrap()
}

#[cfg(feature = "sello")]
pub fn llave() -> cfdi::sello::LlavePrivada {
    cfdi::sello::LlavePrivada::from_file(fixture("csd_eku.key")).unwrap()
}

/// Stand-in for the SAT XSLT: every attribute value in document order,
/// pipe-separated and wrapped in `||`, skipping namespace declarations.
///
/// Refuses documents that already carry a Sello, so any test that hands a
/// sealed form to the transform fails loudly.
pub fn cadena(xml: &str) -> Result<String, CfdiError> {
    let fail = |msg: String| CfdiError::CanonicalizationFailed(msg);
    let mut reader = Reader::from_str(xml);
    let mut fields = Vec::new();
    loop {
        match reader.read_event() {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                for attr in e.attributes() {
                    let attr = attr.map_err(|e| fail(e.to_string()))?;
                    let key = attr.key.as_ref();
                    if key == b"Sello" {
                        return Err(fail("document is already sealed".into()));
                    }
                    if key.starts_with(b"xmlns") || key.starts_with(b"xsi:") {
                        continue;
                    }
                    let value = attr.unescape_value().map_err(|e| fail(e.to_string()))?;
                    fields.push(value.into_owned());
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(fail(e.to_string())),
            _ => {}
        }
    }
    Ok(format!("||{}||", fields.join("|")))
}

pub fn emisor() -> Attributes {
    Attributes::from([
        ("Rfc", "AAA010101AAA"),
        ("Nombre", "EMPRESA DEMO"),
        ("RegimenFiscal", "601"),
    ])
}

pub fn receptor() -> Attributes {
    Attributes::from([
        ("Rfc", "XAXX010101000"),
        ("Nombre", "PUBLICO EN GENERAL"),
        ("UsoCFDI", "G03"),
    ])
}

pub fn comprobante_attrs() -> Attributes {
    Attributes::from([
        ("Serie", "A"),
        ("Folio", "1"),
        ("Fecha", "2019-01-01T12:00:00"),
        ("FormaPago", "01"),
        ("SubTotal", "100.00"),
        ("Moneda", "MXN"),
        ("Total", "116.00"),
        ("TipoDeComprobante", "I"),
        ("MetodoPago", "PUE"),
        ("LugarExpedicion", "45079"),
    ])
}

pub fn traslado_iva(base: &str, importe: &str) -> Attributes {
    Attributes::from([
        ("Base", base),
        ("Impuesto", "002"),
        ("TipoFactor", "Tasa"),
        ("TasaOCuota", "0.160000"),
        ("Importe", importe),
    ])
}

/// One Concepto of 100.00 with 16% IVA, plus the matching totals block.
pub fn sample() -> Comprobante {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_emisor(emisor()).unwrap();
    doc.attach_receptor(receptor()).unwrap();
    doc.new_concepto(Attributes::from([
        ("ClaveProdServ", "01010101"),
        ("ClaveUnidad", "ACT"),
        ("Cantidad", "1"),
        ("Descripcion", "Servicio"),
        ("ValorUnitario", "100.00"),
        ("Importe", "100.00"),
    ]))
    .traslado(traslado_iva("100.00", "16.00"))
    .commit(&mut doc)
    .unwrap();
    doc.attach_totals(ImpuestosTotales::new().traslados(
        "16.00",
        [Attributes::from([
            ("Impuesto", "002"),
            ("TipoFactor", "Tasa"),
            ("TasaOCuota", "0.160000"),
            ("Importe", "16.00"),
        ])],
    ))
    .unwrap();
    doc
}

/// Byte offset of `needle` in `xml`, panicking with context when absent.
pub fn pos(xml: &str, needle: &str) -> usize {
    xml.find(needle)
        .unwrap_or_else(|| panic!("`{needle}` not found in:\n{xml}"))
}
