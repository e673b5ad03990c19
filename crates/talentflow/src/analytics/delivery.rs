use std::fmt::Debug;
use std::fs;
use std::path::{Path, PathBuf};

use super::export::ExportArtifact;

#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    #[error("unable to write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("delivery rejected: {0}")]
    Rejected(String),
}

/// Hands a rendered export to whatever stores or transmits it.
pub trait ExportDelivery: Debug + Send + Sync {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<(), DeliveryError>;
}

/// Writes each artifact into a fixed directory under its own file name.
#[derive(Debug, Clone)]
pub struct DirectoryDelivery {
    directory: PathBuf,
}

impl DirectoryDelivery {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }

    pub fn path_for(&self, artifact: &ExportArtifact) -> PathBuf {
        self.directory.join(&artifact.file_name)
    }
}

impl ExportDelivery for DirectoryDelivery {
    fn deliver(&self, artifact: &ExportArtifact) -> Result<(), DeliveryError> {
        fs::create_dir_all(&self.directory).map_err(|source| DeliveryError::Io {
            path: self.directory.clone(),
            source,
        })?;

        let path = self.path_for(artifact);
        fs::write(&path, artifact.contents.as_bytes())
            .map_err(|source| DeliveryError::Io { path, source })
    }
}
