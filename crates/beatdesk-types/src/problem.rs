//! RFC 7807 problem details.

use serde::{Deserialize, Serialize};

/// Error payload returned by the backend on non-2xx responses.
///
/// Every field is optional; backends fill in what they have.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProblemDetails {
    /// URI identifying the problem type.
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub problem_type: Option<String>,
    /// Short summary of the problem type.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// HTTP status code.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<u16>,
    /// Explanation specific to this occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
    /// URI of the specific occurrence.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instance: Option<String>,
}

impl ProblemDetails {
    /// Returns true if none of the fields carry information.
    pub fn is_empty(&self) -> bool {
        self.problem_type.is_none()
            && self.title.is_none()
            && self.status.is_none()
            && self.detail.is_none()
            && self.instance.is_none()
    }

    /// The most specific human-readable text: `detail`, then `title`.
    pub fn message(&self) -> Option<&str> {
        self.detail
            .as_deref()
            .filter(|d| !d.trim().is_empty())
            .or_else(|| self.title.as_deref().filter(|t| !t.trim().is_empty()))
    }
}
