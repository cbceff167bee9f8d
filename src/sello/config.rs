//! External tool configuration.
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Paths of the external collaborators used by the sealing pipeline.
///
/// Passed explicitly to [`XsltCanonicalizer`](super::XsltCanonicalizer) and
/// [`OpensslKeyTool`](super::OpensslKeyTool); nothing is read from global
/// state. Missing fields fall back to [`Default`] when deserializing.
///
/// # Examples
/// ```rust
/// use cfdi::sello::SelloConfig;
///
/// let config: SelloConfig = serde_json::from_str(r#"{"openssl_path": "/opt/ssl/bin/openssl"}"#)?;
/// assert_eq!(config.openssl_path().to_str(), Some("/opt/ssl/bin/openssl"));
/// assert_eq!(config.xsltproc_path().to_str(), Some("xsltproc"));
/// # Ok::<(), serde_json::Error>(())
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SelloConfig {
    xsltproc_path: PathBuf,
    stylesheet_path: PathBuf,
    openssl_path: PathBuf,
    temp_dir: Option<PathBuf>,
}

impl SelloConfig {
    pub fn new(
        xsltproc_path: impl Into<PathBuf>,
        stylesheet_path: impl Into<PathBuf>,
        openssl_path: impl Into<PathBuf>,
    ) -> Self {
        Self {
            xsltproc_path: xsltproc_path.into(),
            stylesheet_path: stylesheet_path.into(),
            openssl_path: openssl_path.into(),
            temp_dir: None,
        }
    }

    pub fn with_xsltproc_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.xsltproc_path = path.into();
        self
    }

    pub fn with_stylesheet_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.stylesheet_path = path.into();
        self
    }

    pub fn with_openssl_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.openssl_path = path.into();
        self
    }

    /// Directory for the scoped temporary XML files; the system default when unset.
    pub fn with_temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn xsltproc_path(&self) -> &Path {
        &self.xsltproc_path
    }

    pub fn stylesheet_path(&self) -> &Path {
        &self.stylesheet_path
    }

    pub fn openssl_path(&self) -> &Path {
        &self.openssl_path
    }

    pub fn temp_dir(&self) -> Option<&Path> {
        self.temp_dir.as_deref()
    }
}

impl Default for SelloConfig {
    fn default() -> Self {
        Self::new("xsltproc", "resources/cadenaoriginal_3_3.xslt", "openssl")
    }
}
