#![no_main]

use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Errors are fine, panics are bugs.
    if let Ok(cert) = cfdi::sello::Certificado::from_der(data.to_vec()) {
        let _ = cert.der_base64();
        let _ = cert.public_key();
    }
});
