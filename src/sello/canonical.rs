use std::io::Write;
use std::path::PathBuf;
use std::process::Command;
use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::config::SelloConfig;
use crate::core::CfdiError;

/// Produces the cadena original of a serialized Comprobante.
///
/// The transform is owned by SAT (a versioned XSLT); this crate only invokes
/// it. Implementations must be deterministic: the same document must always
/// yield the same string.
pub trait Canonicalizer: Send + Sync {
    fn canonicalize(&self, xml: &str) -> Result<String, CfdiError>;
}

impl<F> Canonicalizer for F
where
    F: Fn(&str) -> Result<String, CfdiError> + Send + Sync,
{
    fn canonicalize(&self, xml: &str) -> Result<String, CfdiError> {
        self(xml)
    }
}

/// Runs `xsltproc <stylesheet> <file>` over a scoped temporary copy of the
/// document.
///
/// The temporary file is removed when the call returns, on success and on
/// every error path.
#[derive(Debug, Clone)]
pub struct XsltCanonicalizer {
    xsltproc: PathBuf,
    stylesheet: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl XsltCanonicalizer {
    pub fn new(config: &SelloConfig) -> Self {
        Self {
            xsltproc: config.xsltproc_path().to_path_buf(),
            stylesheet: config.stylesheet_path().to_path_buf(),
            temp_dir: config.temp_dir().map(PathBuf::from),
        }
    }

    fn scoped_file(&self, xml: &str) -> Result<NamedTempFile, CfdiError> {
        let mut builder = tempfile::Builder::new();
        builder.prefix("cfdi-").suffix(".xml");
        let file = match &self.temp_dir {
            Some(dir) => builder.tempfile_in(dir),
            None => builder.tempfile(),
        };
        let mut file = file.map_err(|e| {
            CfdiError::CanonicalizationFailed(format!("cannot create temporary file: {e}"))
        })?;
        file.write_all(xml.as_bytes())
            .and_then(|()| file.flush())
            .map_err(|e| {
                CfdiError::CanonicalizationFailed(format!("cannot write temporary file: {e}"))
            })?;
        Ok(file)
    }
}

impl Canonicalizer for XsltCanonicalizer {
    fn canonicalize(&self, xml: &str) -> Result<String, CfdiError> {
        let file = self.scoped_file(xml)?;
        debug!(
            xsltproc = %self.xsltproc.display(),
            stylesheet = %self.stylesheet.display(),
            input = %file.path().display(),
            "running cadena original transform"
        );

        let output = Command::new(&self.xsltproc)
            .arg(&self.stylesheet)
            .arg(file.path())
            .output()
            .map_err(|e| {
                warn!(error = %e, "cannot start xsltproc");
                CfdiError::CanonicalizationFailed(format!(
                    "cannot run {}: {e}",
                    self.xsltproc.display()
                ))
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!(status = %output.status, "cadena original transform failed");
            return Err(CfdiError::CanonicalizationFailed(format!(
                "xsltproc exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let cadena = String::from_utf8(output.stdout).map_err(|e| {
            CfdiError::CanonicalizationFailed(format!("transform output is not UTF-8: {e}"))
        })?;
        if cadena.is_empty() {
            return Err(CfdiError::CanonicalizationFailed(
                "transform produced an empty cadena original".into(),
            ));
        }
        debug!(len = cadena.len(), "cadena original produced");
        Ok(cadena)
    }
}
