use std::fmt;
use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use anyhow::{Context, Result};
use sha2::{Digest, Sha256, Sha384, Sha512};

use crate::error::ConfigError;

/// Content digest algorithms supported for artifact naming.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    Sha256,
    Sha384,
    Sha512,
}

/// Compiled-in canonical algorithm, used unless the configuration pins
/// another one at bootstrap.
pub const CANONICAL_DEFAULT: Algorithm = Algorithm::Sha256;

static CANONICAL: OnceLock<Algorithm> = OnceLock::new();

/// The process-wide canonical digest algorithm.
pub fn canonical() -> Algorithm {
    CANONICAL.get().copied().unwrap_or(CANONICAL_DEFAULT)
}

/// Pins the process-wide canonical algorithm. Written at most once,
/// during bootstrap; later calls are no-ops and the first value wins.
pub fn set_canonical(algorithm: Algorithm) {
    let _ = CANONICAL.set(algorithm);
}

impl Algorithm {
    pub fn from_name(name: &str) -> Result<Self, ConfigError> {
        match name {
            "sha256" => Ok(Self::Sha256),
            "sha384" => Ok(Self::Sha384),
            "sha512" => Ok(Self::Sha512),
            other => Err(ConfigError::UnsupportedAlgorithm(other.to_string())),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
        }
    }

    /// Calculates the digest of a file and returns it as a hex string.
    pub fn digest_file<P: AsRef<Path>>(&self, path: P) -> Result<String> {
        match self {
            Self::Sha256 => hash_file::<Sha256>(path.as_ref()),
            Self::Sha384 => hash_file::<Sha384>(path.as_ref()),
            Self::Sha512 => hash_file::<Sha512>(path.as_ref()),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn hash_file<D>(path: &Path) -> Result<String>
where
    D: Digest + io::Write,
    sha2::digest::Output<D>: fmt::LowerHex,
{
    let file = File::open(path)
        .with_context(|| format!("Failed to open file for hashing: {}", path.display()))?;
    let mut reader = BufReader::new(file);
    let mut hasher = D::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn from_name_resolves_supported_algorithms() {
        assert_eq!(Algorithm::from_name("sha256").unwrap(), Algorithm::Sha256);
        assert_eq!(Algorithm::from_name("sha384").unwrap(), Algorithm::Sha384);
        assert_eq!(Algorithm::from_name("sha512").unwrap(), Algorithm::Sha512);
    }

    #[test]
    fn from_name_rejects_unknown_algorithm() {
        let err = Algorithm::from_name("md5").unwrap_err();
        assert!(matches!(err, ConfigError::UnsupportedAlgorithm(name) if name == "md5"));
    }

    #[test]
    fn digest_file_matches_known_vector() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"hello world").unwrap();

        let hex = Algorithm::Sha256.digest_file(file.path()).unwrap();
        assert_eq!(
            hex,
            "b94d27b9934d3e08a52e52d7da7dabfac484efe37a5380ee9088f7ace2efcde9"
        );
    }

    #[test]
    fn canonical_is_pinned_once() {
        assert_eq!(canonical(), CANONICAL_DEFAULT);
        set_canonical(Algorithm::Sha256);
        set_canonical(Algorithm::Sha512);
        assert_eq!(canonical(), Algorithm::Sha256);
    }
}
