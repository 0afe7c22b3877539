use std::io;
use std::path::PathBuf;

/// The primary error type for all operations in the `ziproute` crate.
#[derive(Debug)]
pub enum PackError {
    /// An I/O error occurred, typically while reading or writing a file.
    /// Includes the path where the error happened when one is known.
    Io { source: io::Error, path: PathBuf },

    /// A matched path fell outside the working root it was expanded under.
    StripPrefix { prefix: PathBuf, path: PathBuf },

    /// A malformed glob pattern in a job's `src` list.
    Pattern(glob::PatternError),

    /// A match that could not be inspected while expanding a pattern.
    Glob(glob::GlobError),

    /// An error from the ZIP codec while encoding or decoding an archive.
    Zip(zip::result::ZipError),

    /// An entry whose decompressed bytes do not match its stored CRC32.
    Checksum { archive: PathBuf, entry: String },

    /// An error while parsing the job manifest.
    SerdeJson(serde_json::Error),

    /// A wrapper for any other error that doesn't fit the specific variants.
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl PackError {
    /// Attaches the offending path to an I/O error.
    pub fn io(source: io::Error, path: impl Into<PathBuf>) -> Self {
        PackError::Io {
            source,
            path: path.into(),
        }
    }
}

impl std::fmt::Display for PackError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PackError::Io { source, path } if path.as_os_str().is_empty() => {
                write!(f, "I/O error: {}", source)
            }
            PackError::Io { source, path } => {
                write!(f, "I/O error on path '{}': {}", path.display(), source)
            }
            PackError::StripPrefix { prefix, path } => write!(
                f,
                "Could not strip prefix '{}' from path '{}'",
                prefix.display(),
                path.display()
            ),
            PackError::Pattern(e) => write!(f, "Invalid glob pattern: {}", e),
            PackError::Glob(e) => write!(f, "Glob expansion error: {}", e),
            PackError::Zip(e) => write!(f, "Archive codec error: {}", e),
            PackError::Checksum { archive, entry } => write!(
                f,
                "CRC32 mismatch for entry '{}' in '{}'",
                entry,
                archive.display()
            ),
            PackError::SerdeJson(e) => write!(f, "Manifest error: {}", e),
            PackError::Other(e) => write!(f, "An unexpected error occurred: {}", e),
        }
    }
}

impl std::error::Error for PackError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            PackError::Io { source, .. } => Some(source),
            PackError::Pattern(e) => Some(e),
            PackError::Glob(e) => Some(e),
            PackError::Zip(e) => Some(e),
            PackError::SerdeJson(e) => Some(e),
            PackError::Other(e) => Some(e.as_ref()),
            _ => None,
        }
    }
}

impl From<glob::PatternError> for PackError {
    fn from(err: glob::PatternError) -> Self {
        PackError::Pattern(err)
    }
}

impl From<glob::GlobError> for PackError {
    fn from(err: glob::GlobError) -> Self {
        PackError::Glob(err)
    }
}

impl From<zip::result::ZipError> for PackError {
    fn from(err: zip::result::ZipError) -> Self {
        PackError::Zip(err)
    }
}

impl From<serde_json::Error> for PackError {
    fn from(err: serde_json::Error) -> Self {
        PackError::SerdeJson(err)
    }
}

// Generic IO error conversion that doesn't carry a path
impl From<io::Error> for PackError {
    fn from(err: io::Error) -> Self {
        PackError::Io {
            source: err,
            path: PathBuf::new(),
        }
    }
}
