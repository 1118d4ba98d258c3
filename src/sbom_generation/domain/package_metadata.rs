use super::license_info::LicenseInfo;

/// Hash algorithms that can appear on a component
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashAlgorithm {
    Sha256,
    Sha512,
}

impl HashAlgorithm {
    pub fn as_str(self) -> &'static str {
        match self {
            HashAlgorithm::Sha256 => "SHA-256",
            HashAlgorithm::Sha512 => "SHA-512",
        }
    }
}

/// A hash of the package artifact, content hex-encoded
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComponentHash {
    pub algorithm: HashAlgorithm,
    pub content: String,
}

/// Registry metadata for one package version.
///
/// Produced by a metadata repository; a default value is a stub that
/// carries no information beyond what the package record already has.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageMetadata {
    pub license: Option<LicenseInfo>,
    /// Raw license URL as published, kept for later resolution
    pub license_url: Option<String>,
    pub description: Option<String>,
    pub publisher: Option<String>,
    pub project_url: Option<String>,
    pub hashes: Vec<ComponentHash>,
}

impl PackageMetadata {
    pub fn stub() -> Self {
        Self::default()
    }

    pub fn is_stub(&self) -> bool {
        self == &Self::default()
    }
}
