#![cfg(feature = "core")]

mod common;

use cfdi::core::*;
use cfdi::xml::{to_unsigned_xml, to_xml};
use common::*;

fn concepto(importe: &str) -> Attributes {
    Attributes::from([("Descripcion", "Servicio"), ("Importe", importe)])
}

// --- Structure ---

#[test]
fn minimal_document_serializes_in_schema_order() {
    let xml = to_xml(&sample()).unwrap();

    let emisor = pos(&xml, "<cfdi:Emisor ");
    let receptor = pos(&xml, "<cfdi:Receptor ");
    let conceptos = pos(&xml, "<cfdi:Conceptos>");
    let totals = pos(&xml, "<cfdi:Impuestos TotalImpuestosTrasladados=\"16.00\">");
    assert!(emisor < receptor);
    assert!(receptor < conceptos);
    assert!(conceptos < totals);
    assert!(xml.trim_end().ends_with("</cfdi:Comprobante>"));
}

#[test]
fn call_order_does_not_change_element_order() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_totals(ImpuestosTotales::new().traslados("16.00", [traslado_iva("100.00", "16.00")]))
        .unwrap();
    ConceptoBuilder::new(concepto("100.00")).commit(&mut doc).unwrap();
    doc.attach_receptor(receptor()).unwrap();
    doc.attach_emisor(emisor()).unwrap();
    doc.attach_relacionados("04", ["A39DA66B-52CA-49E3-879B-5C05185B0EF7"])
        .unwrap();

    let xml = to_xml(&doc).unwrap();
    let order = [
        pos(&xml, "<cfdi:CfdiRelacionados "),
        pos(&xml, "<cfdi:Emisor "),
        pos(&xml, "<cfdi:Receptor "),
        pos(&xml, "<cfdi:Conceptos>"),
        pos(&xml, "<cfdi:Impuestos TotalImpuestosTrasladados"),
    ];
    assert!(order.windows(2).all(|w| w[0] < w[1]), "{xml}");
}

#[test]
fn conceptos_keep_commit_order() {
    let mut doc = sample();
    doc.new_concepto(concepto("2.00")).commit(&mut doc).unwrap();
    doc.new_concepto(concepto("3.00")).commit(&mut doc).unwrap();

    let importes: Vec<_> = doc
        .conceptos()
        .iter()
        .map(|c| c.attributes.get("Importe").unwrap())
        .collect();
    assert_eq!(importes, ["100.00", "2.00", "3.00"]);

    let xml = to_xml(&doc).unwrap();
    assert_eq!(xml.matches("<cfdi:Conceptos>").count(), 1);
    assert!(pos(&xml, "Importe=\"2.00\"") < pos(&xml, "Importe=\"3.00\""));
}

#[test]
fn draft_without_conceptos_has_no_container() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_emisor(emisor()).unwrap();
    let xml = to_xml(&doc).unwrap();
    assert!(!xml.contains("cfdi:Conceptos"));
    assert!(!xml.contains("cfdi:Receptor"));
}

// --- Concepto taxes ---

#[test]
fn concepto_with_two_traslados_has_only_traslados() {
    let mut doc = sample();
    doc.new_concepto(concepto("200.00"))
        .traslado(traslado_iva("200.00", "32.00"))
        .traslado(Attributes::from([
            ("Base", "200.00"),
            ("Impuesto", "003"),
            ("TipoFactor", "Tasa"),
            ("TasaOCuota", "0.265000"),
            ("Importe", "53.00"),
        ]))
        .commit(&mut doc)
        .unwrap();

    let c = &doc.conceptos()[1];
    assert_eq!(c.impuestos.traslados.len(), 2);
    assert!(c.impuestos.retenciones.is_empty());

    let xml = to_xml(&doc).unwrap();
    let start = pos(&xml, "Importe=\"200.00\"");
    let block = &xml[start..pos(&xml[start..], "</cfdi:Concepto>") + start];
    assert!(block.contains("<cfdi:Traslados>"));
    assert!(!block.contains("Retenciones"));
    assert!(pos(block, "Importe=\"32.00\"") < pos(block, "Importe=\"53.00\""));
}

#[test]
fn concepto_without_taxes_has_no_impuestos_block() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_emisor(emisor()).unwrap();
    doc.attach_receptor(receptor()).unwrap();
    doc.new_concepto(concepto("50.00")).commit(&mut doc).unwrap();

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("<cfdi:Concepto Descripcion=\"Servicio\" Importe=\"50.00\"/>"));
    assert!(!xml.contains("cfdi:Impuestos"));
}

#[test]
fn concepto_with_only_retenciones() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.new_concepto(concepto("1000.00"))
        .retencion(Attributes::from([
            ("Base", "1000.00"),
            ("Impuesto", "001"),
            ("TipoFactor", "Tasa"),
            ("TasaOCuota", "0.100000"),
            ("Importe", "100.00"),
        ]))
        .commit(&mut doc)
        .unwrap();

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("<cfdi:Retenciones>"));
    assert!(xml.contains("<cfdi:Retencion Base=\"1000.00\""));
    assert!(!xml.contains("Traslado"));
}

#[test]
fn traslados_precede_retenciones_in_concepto() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.new_concepto(concepto("1000.00"))
        .retencion(Attributes::from([("Impuesto", "001"), ("Importe", "100.00")]))
        .traslado(traslado_iva("1000.00", "160.00"))
        .commit(&mut doc)
        .unwrap();

    let xml = to_xml(&doc).unwrap();
    assert!(pos(&xml, "<cfdi:Traslados>") < pos(&xml, "<cfdi:Retenciones>"));
}

// --- Totals ---

#[test]
fn totals_traslados_only() {
    let xml = to_xml(&sample()).unwrap();
    let totals = &xml[pos(&xml, "<cfdi:Impuestos TotalImpuestosTrasladados")..];
    assert!(!totals.contains("TotalImpuestosRetenidos"));
    assert!(!totals.contains("Retenciones"));
    assert!(totals.contains("<cfdi:Traslado Importe=\"16.00\""));
}

#[test]
fn totals_retenciones_only() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_totals(ImpuestosTotales::new().retenciones(
        "100.00",
        [Attributes::from([("Impuesto", "001"), ("Importe", "100.00")])],
    ))
    .unwrap();

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("<cfdi:Impuestos TotalImpuestosRetenidos=\"100.00\">"));
    assert!(xml.contains("<cfdi:Retencion Importe=\"100.00\" Impuesto=\"001\"/>"));
    assert!(!xml.contains("TotalImpuestosTrasladados"));
    assert!(!xml.contains("Traslados"));
}

#[test]
fn totals_with_both_groups() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_totals(
        ImpuestosTotales::new()
            .traslados(
                "160.00",
                [traslado_iva("1000.00", "160.00"), traslado_iva("0.00", "0.00")],
            )
            .retenciones("100.00", [Attributes::from([("Impuesto", "001")])]),
    )
    .unwrap();

    let totals = doc.impuestos().unwrap();
    assert_eq!(totals.traslados.as_ref().unwrap().entries.len(), 2);
    assert_eq!(totals.retenciones.as_ref().unwrap().total, "100.00");

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains(
        "<cfdi:Impuestos TotalImpuestosRetenidos=\"100.00\" TotalImpuestosTrasladados=\"160.00\">"
    ));
    assert!(pos(&xml, "<cfdi:Retenciones>") < pos(&xml, "<cfdi:Traslados>"));
    assert_eq!(xml.matches("<cfdi:Traslado ").count(), 2);
}

#[test]
fn totals_attach_once() {
    let mut doc = sample();
    let err = doc.attach_totals(ImpuestosTotales::new()).unwrap_err();
    assert!(matches!(err, CfdiError::InvalidState { .. }));
}

// --- Attribute values ---

#[test]
fn amounts_are_kept_verbatim() {
    let mut doc = Comprobante::new(Attributes::from([("SubTotal", "100.0000"), ("Total", "116")]));
    doc.new_concepto(concepto("100.0000"))
        .traslado(traslado_iva("100.0000", "16.000000"))
        .commit(&mut doc)
        .unwrap();

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("SubTotal=\"100.0000\""));
    assert!(xml.contains("Total=\"116\""));
    assert!(xml.contains("Importe=\"16.000000\""));
}

#[test]
fn special_characters_are_escaped() {
    let mut doc = Comprobante::new(comprobante_attrs());
    doc.attach_emisor(Attributes::from([("Nombre", "Pérez & Hijos \"La Única\"")]))
        .unwrap();
    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("Nombre=\"Pérez &amp; Hijos &quot;La Única&quot;\""));
    assert_eq!(cadena(&xml).unwrap().matches("Pérez & Hijos \"La Única\"").count(), 1);
}

#[test]
fn attributes_load_from_json() {
    let attrs: Attributes = serde_json::from_str(
        r#"{"Rfc": "AAA010101AAA", "Nombre": "EMPRESA DEMO", "RegimenFiscal": "601"}"#,
    )
    .unwrap();
    assert_eq!(attrs, emisor());
    assert_eq!(attrs.len(), 3);
    assert_eq!(serde_json::to_value(&attrs).unwrap()["Rfc"], "AAA010101AAA");
}

#[test]
fn relacionados_keep_uuid_order() {
    let mut doc = sample();
    doc.attach_relacionados("01", ["UUID-1", "UUID-2"]).unwrap();
    let rel = doc.relacionados().unwrap();
    assert_eq!(rel.tipo_relacion, "01");
    assert_eq!(rel.uuids, ["UUID-1", "UUID-2"]);

    let xml = to_xml(&doc).unwrap();
    assert!(xml.contains("<cfdi:CfdiRelacionados TipoRelacion=\"01\">"));
    assert!(pos(&xml, "UUID=\"UUID-1\"") < pos(&xml, "UUID=\"UUID-2\""));
    assert!(pos(&xml, "</cfdi:CfdiRelacionados>") < pos(&xml, "<cfdi:Emisor "));
}

// --- Lifecycle ---

#[test]
fn state_reaches_structured_after_emisor_receptor_and_concepto() {
    let mut doc = Comprobante::new(comprobante_attrs());
    assert_eq!(doc.state(), DocumentState::Draft);
    doc.attach_emisor(emisor()).unwrap();
    doc.attach_receptor(receptor()).unwrap();
    assert_eq!(doc.state(), DocumentState::Draft);
    doc.new_concepto(concepto("1.00")).commit(&mut doc).unwrap();
    assert_eq!(doc.state(), DocumentState::Structured);
    assert!(doc.no_certificado().is_none());
    assert!(doc.sello().is_none());
}

#[test]
fn unsigned_and_full_forms_match_before_sealing() {
    let doc = sample();
    assert_eq!(to_xml(&doc).unwrap(), to_unsigned_xml(&doc).unwrap());
}

#[test]
fn unsigned_snapshot() {
    let xml = to_xml(&sample()).unwrap();
    insta::assert_snapshot!("unsigned_comprobante", xml);
}
