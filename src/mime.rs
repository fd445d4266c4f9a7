//! Content types for each resource kind
//!
//! Values are sent verbatim in `Accept` and `Content-Type` headers.

use serde::{Deserialize, Serialize};
use std::fmt;

pub const DOCUMENT: &str = "application/vnd.mendeley-document.1+json";
pub const FILE: &str = "application/vnd.mendeley-file.1+json";
pub const FOLDER: &str = "application/vnd.mendeley-folder.1+json";
pub const GROUP: &str = "application/vnd.mendeley-group.1+json";
pub const ANNOTATION: &str = "application/vnd.mendeley-annotation.1+json";

/// Resource kinds exposed by the API
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    Document,
    File,
    Folder,
    Group,
    Annotation,
    Trash,
}

impl ResourceKind {
    /// Content type used for this resource
    ///
    /// Trashed entries are documents, so they share the document type.
    pub fn mime_type(self) -> &'static str {
        match self {
            ResourceKind::Document | ResourceKind::Trash => DOCUMENT,
            ResourceKind::File => FILE,
            ResourceKind::Folder => FOLDER,
            ResourceKind::Group => GROUP,
            ResourceKind::Annotation => ANNOTATION,
        }
    }

    /// Plural collection name
    pub fn name(self) -> &'static str {
        match self {
            ResourceKind::Document => "documents",
            ResourceKind::File => "files",
            ResourceKind::Folder => "folders",
            ResourceKind::Group => "groups",
            ResourceKind::Annotation => "annotations",
            ResourceKind::Trash => "trash",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_case::test_case;

    #[test_case(ResourceKind::Document, DOCUMENT)]
    #[test_case(ResourceKind::File, FILE)]
    #[test_case(ResourceKind::Folder, FOLDER)]
    #[test_case(ResourceKind::Group, GROUP)]
    #[test_case(ResourceKind::Annotation, ANNOTATION)]
    #[test_case(ResourceKind::Trash, DOCUMENT)]
    fn test_mime_type(kind: ResourceKind, expected: &str) {
        assert_eq!(kind.mime_type(), expected);
    }

    #[test]
    fn test_display() {
        assert_eq!(ResourceKind::Trash.to_string(), "trash");
        assert_eq!(ResourceKind::Folder.to_string(), "folders");
    }
}
