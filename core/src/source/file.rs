//! Filesystem preview source

use super::{decode, PreviewSource};
use crate::error::{FetchError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

/// Reads the preview resource from a local file
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }
}

#[async_trait]
impl PreviewSource for FileSource {
    async fn fetch(&self) -> Result<Value> {
        debug!(path = %self.path.display(), "reading preview file");

        let body = fs::read(&self.path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                FetchError::NotFound {
                    path: self.path.display().to_string(),
                }
                .into()
            } else {
                crate::error::Error::Io(e)
            }
        })?;

        decode(&body)
    }

    fn describe(&self) -> String {
        format!("file {}", self.path.display())
    }
}
