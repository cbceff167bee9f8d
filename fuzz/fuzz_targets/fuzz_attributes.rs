#![no_main]

use cfdi::core::{Attributes, Comprobante};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    let Ok(s) = std::str::from_utf8(data) else {
        return;
    };
    let mut fields = s.split('\u{0}');
    let name = fields.next().unwrap_or("Folio");
    let value = fields.next().unwrap_or_default();
    if name.is_empty() || !name.chars().all(|c| c.is_ascii_alphanumeric()) {
        return;
    }

    let mut doc = Comprobante::new(Attributes::from([(name, value)]));
    let _ = doc.attach_emisor(Attributes::from([("Nombre", value)]));
    let _ = doc.new_concepto(Attributes::from([("Descripcion", value)])).commit(&mut doc);
    let xml = cfdi::xml::to_xml(&doc).expect("serialization must not fail");
    assert!(!xml.contains("Sello="));
});
