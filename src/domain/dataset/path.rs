use std::fmt;
use std::path::PathBuf;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::domain::DomainError;

/// Lowercase alphanumerics separated by single hyphens
static PATH_SEGMENT_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[a-z0-9]+(?:-[a-z0-9]+)*$").unwrap());

/// `<organization>/<dataset>` address shared by the local layout and the remote registry
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct DatasetPath {
    organization: String,
    dataset: String,
}

impl DatasetPath {
    pub fn parse(path: &str) -> Result<Self, DomainError> {
        let path = path.trim_matches('/');
        let mut parts = path.split('/');

        let (Some(organization), Some(dataset), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(DomainError::invalid_dataset_path(
                path,
                "expected the format 'organization/dataset'",
            ));
        };

        if !PATH_SEGMENT_PATTERN.is_match(organization) {
            return Err(DomainError::invalid_dataset_path(
                path,
                "organization must be lowercase and use hyphens instead of spaces",
            ));
        }

        if !PATH_SEGMENT_PATTERN.is_match(dataset) {
            return Err(DomainError::invalid_dataset_path(
                path,
                "dataset name must be lowercase and use hyphens instead of spaces",
            ));
        }

        Ok(Self {
            organization: organization.to_string(),
            dataset: dataset.to_string(),
        })
    }

    pub fn organization(&self) -> &str {
        &self.organization
    }

    pub fn dataset(&self) -> &str {
        &self.dataset
    }

    /// Relative directory holding the dataset files
    pub fn to_path_buf(&self) -> PathBuf {
        PathBuf::from(&self.organization).join(&self.dataset)
    }
}

impl fmt::Display for DatasetPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.organization, self.dataset)
    }
}
