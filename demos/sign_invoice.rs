//! Build, certify and seal a small CFDI with the system `xsltproc` and
//! `openssl`.
//!
//! ```text
//! RUST_LOG=cfdi=debug cargo run --example sign_invoice -- \
//!     csd.cer csd.key PASSWORD cadenaoriginal_3_3.xslt
//! ```

use cfdi::core::*;
use cfdi::sello::{Certificado, LlavePrivada, SelloConfig, Sellador};
use tracing_subscriber::EnvFilter;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("cfdi=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let [cer, key, password, rest @ ..] = args.as_slice() else {
        eprintln!("usage: sign_invoice <file.cer> <file.key> <password> [stylesheet.xslt]");
        std::process::exit(2);
    };

    let mut config = SelloConfig::default();
    if let Some(stylesheet) = rest.first() {
        config = config.with_stylesheet_path(stylesheet);
    }

    match run(&config, cer, key, password) {
        Ok(xml) => println!("{xml}"),
        Err(e) => {
            eprintln!("error: {e}");
            std::process::exit(1);
        }
    }
}

fn run(config: &SelloConfig, cer: &str, key: &str, password: &str) -> Result<String, CfdiError> {
    let mut doc = Comprobante::new(Attributes::from([
        ("Serie", "A"),
        ("Folio", "167"),
        ("Fecha", "2019-01-01T12:00:00"),
        ("FormaPago", "01"),
        ("SubTotal", "1500.00"),
        ("Moneda", "MXN"),
        ("Total", "1740.00"),
        ("TipoDeComprobante", "I"),
        ("MetodoPago", "PUE"),
        ("LugarExpedicion", "45079"),
    ]));
    doc.attach_emisor(Attributes::from([
        ("Rfc", "EKU9003173C9"),
        ("Nombre", "ESCUELA KEMPER URGATE"),
        ("RegimenFiscal", "601"),
    ]))?
    .attach_receptor(Attributes::from([
        ("Rfc", "XAXX010101000"),
        ("Nombre", "PUBLICO EN GENERAL"),
        ("UsoCFDI", "G03"),
    ]))?;

    let lines = [
        ("Consultoria", "1000.00", "160.00"),
        ("Soporte", "500.00", "80.00"),
    ];
    for (descripcion, importe, iva) in lines {
        doc.new_concepto(Attributes::from([
            ("ClaveProdServ", "84111506"),
            ("ClaveUnidad", "E48"),
            ("Cantidad", "1"),
            ("Descripcion", descripcion),
            ("ValorUnitario", importe),
            ("Importe", importe),
        ]))
        .traslado(Attributes::from([
            ("Base", importe),
            ("Impuesto", "002"),
            ("TipoFactor", "Tasa"),
            ("TasaOCuota", "0.160000"),
            ("Importe", iva),
        ]))
        .commit(&mut doc)?;
    }

    doc.attach_totals(ImpuestosTotales::new().traslados(
        "240.00",
        [Attributes::from([
            ("Impuesto", "002"),
            ("TipoFactor", "Tasa"),
            ("TasaOCuota", "0.160000"),
            ("Importe", "240.00"),
        ])],
    ))?;

    doc.certify(&Certificado::from_file(cer)?)?;
    Sellador::from_config(config).sellar(&mut doc, &LlavePrivada::from_file(key)?, password)
}
