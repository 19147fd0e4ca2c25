//! Upload classification.

use std::convert::Infallible;
use std::str::FromStr;

/// Extensions the service processes as maintenance files rather than media.
const MAINTENANCE_EXTENSIONS: &[&str] = &[
    "exe", "msi", "bat", "cmd", "com", "ps1", "sh", "bash", "py", "pl", "js", "vbs", "jar",
    "apk", "deb", "rpm", "pkg", "dmg", "bin", "zip", "tar", "gz", "tgz", "bz2", "xz", "7z",
    "rar",
];

/// Server-side category of an upload.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum UploadType {
    /// Classify by file extension.
    #[default]
    Auto,
    Media,
    Maintenance,
    /// Any other category, passed through lowercased.
    Custom(String),
}

impl UploadType {
    /// The wire value for an upload of `filename`.
    pub fn resolve(&self, filename: &str) -> String {
        match self {
            UploadType::Auto => Self::classify(filename).resolve(filename),
            UploadType::Media => "media".to_string(),
            UploadType::Maintenance => "maintenance".to_string(),
            UploadType::Custom(value) => value.to_lowercase(),
        }
    }

    /// Classify a file name by its extension.
    pub fn classify(filename: &str) -> UploadType {
        let extension = filename
            .rsplit_once('.')
            .map(|(_, ext)| ext.to_ascii_lowercase());

        match extension {
            Some(ext) if MAINTENANCE_EXTENSIONS.contains(&ext.as_str()) => UploadType::Maintenance,
            _ => UploadType::Media,
        }
    }
}

impl From<&str> for UploadType {
    fn from(s: &str) -> Self {
        let value = s.trim().to_lowercase();
        match value.as_str() {
            "" | "auto" => UploadType::Auto,
            "media" => UploadType::Media,
            "maintenance" => UploadType::Maintenance,
            _ => UploadType::Custom(value),
        }
    }
}

impl FromStr for UploadType {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::from(s))
    }
}

impl std::fmt::Display for UploadType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UploadType::Auto => f.write_str("auto"),
            UploadType::Media => f.write_str("media"),
            UploadType::Maintenance => f.write_str("maintenance"),
            UploadType::Custom(value) => f.write_str(value),
        }
    }
}
