//! Resolution of the configured preview location

use crate::error::{ConfigError, Result};
use std::path::{Path, PathBuf};
use url::Url;

/// Where the preview resource lives once resolved
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PreviewLocation {
    File(PathBuf),
    Url(Url),
}

impl PreviewLocation {
    /// Resolve a location string the way a browser would resolve the page's
    /// relative fetch: absolute URLs as-is, relative ones against `base_url`
    /// when one is configured, otherwise as a path next to the page.
    pub fn resolve(location: &str, base_url: Option<&str>, page_dir: &Path) -> Result<Self> {
        if location.starts_with("http://") || location.starts_with("https://") {
            let url = Url::parse(location).map_err(|e| invalid("source", location, e))?;
            return Ok(PreviewLocation::Url(url));
        }

        if let Some(base) = base_url {
            let base = Url::parse(base).map_err(|e| invalid("base_url", base, e))?;
            let url = base.join(location).map_err(|e| invalid("source", location, e))?;
            return Ok(PreviewLocation::Url(url));
        }

        let expanded = shellexpand::tilde(location);
        let path = Path::new(expanded.as_ref());
        if path.is_absolute() {
            Ok(PreviewLocation::File(path.to_path_buf()))
        } else {
            Ok(PreviewLocation::File(page_dir.join(path)))
        }
    }
}

fn invalid(field: &str, value: &str, error: url::ParseError) -> ConfigError {
    ConfigError::InvalidValue {
        field: field.to_string(),
        value: format!("{} ({})", value, error),
    }
}
