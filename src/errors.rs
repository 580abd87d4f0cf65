use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConversionError {
    #[error("No conda environment file (*.yml, *.yaml) found.")]
    NoInputFiles,
    #[error("\"{}\" does not exist.", .path.display())]
    FileNotFound { path: PathBuf },
    #[error("Could not read \"{}\": {source}", .path.display())]
    Read { path: PathBuf, source: io::Error },
    #[error("Could not parse \"{}\": {source}", .path.display())]
    Parse {
        path: PathBuf,
        source: serde_yaml::Error,
    },
    #[error("Invalid package specification \"{spec}\" in \"{}\": {reason}", .path.display())]
    InvalidSpec {
        path: PathBuf,
        spec: String,
        reason: String,
    },
    #[error("\"{}\" already exists, pass \"--force\" to overwrite it.", .path.display())]
    AlreadyExists { path: PathBuf },
    #[error("Could not write \"{}\": {source}", .path.display())]
    Write { path: PathBuf, source: io::Error },
}

impl ConversionError {
    /// Map an I/O error raised while reading an input file to the matching error kind.
    pub(crate) fn from_read(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::NotFound {
            return Self::FileNotFound { path };
        }
        Self::Read { path, source }
    }

    /// Map an I/O error raised while writing the manifest to the matching error kind.
    pub(crate) fn from_write(path: PathBuf, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::AlreadyExists {
            return Self::AlreadyExists { path };
        }
        Self::Write { path, source }
    }
}
