use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DepgraphError {
    /// The registry answered with a non-success status code.
    RegistryStatus { name: String, status: u16 },
    /// The registry could not be reached or the body could not be read.
    Network { name: String, message: String },
    /// The registry answered, but the document does not have the expected shape.
    MalformedMetadata { name: String, message: String },
    ManifestError(String),
    IoError(String),
    ReportError(String),
}

impl DepgraphError {
    /// Errors that indicate a broken collaborator rather than a per-package
    /// condition. The resolver lets these escape instead of folding them into
    /// a node issue.
    #[must_use]
    pub const fn is_contract_violation(&self) -> bool {
        matches!(self, Self::MalformedMetadata { .. })
    }
}

impl fmt::Display for DepgraphError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RegistryStatus { name, status } => {
                write!(f, "Registry request for '{name}' failed with status {status}")
            }
            Self::Network { name, message } => {
                write!(f, "Network error for '{name}': {message}")
            }
            Self::MalformedMetadata { name, message } => {
                write!(f, "Malformed registry metadata for '{name}': {message}")
            }
            Self::ManifestError(msg) => {
                write!(f, "Package.json error: {msg}")
            }
            Self::IoError(msg) => {
                write!(f, "IO error: {msg}")
            }
            Self::ReportError(msg) => {
                write!(f, "Report error: {msg}")
            }
        }
    }
}

impl std::error::Error for DepgraphError {}

pub type Result<T> = std::result::Result<T, DepgraphError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_message_carries_name_and_status() {
        let err = DepgraphError::RegistryStatus {
            name: "left-pad".to_string(),
            status: 404,
        };
        let message = err.to_string();
        assert!(message.contains("left-pad"));
        assert!(message.contains("404"));
    }

    #[test]
    fn test_only_malformed_metadata_is_a_contract_violation() {
        let malformed = DepgraphError::MalformedMetadata {
            name: "react".to_string(),
            message: "versions is not an object".to_string(),
        };
        let network = DepgraphError::Network {
            name: "react".to_string(),
            message: "connection refused".to_string(),
        };
        assert!(malformed.is_contract_violation());
        assert!(!network.is_contract_violation());
        assert!(!DepgraphError::ManifestError("x".to_string()).is_contract_violation());
    }
}
