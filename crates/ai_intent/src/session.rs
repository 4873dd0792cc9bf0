//! Dialogflow session resource names

use std::fmt;

use domain::SessionId;

/// Fully qualified session resource name
///
/// `projects/<project>/agent/sessions/<session>` for the draft agent, or
/// `projects/<project>/agent/environments/<env>/users/-/sessions/<session>`
/// when an environment is configured.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionPath(String);

impl SessionPath {
    /// Build the resource name for a session
    #[must_use]
    pub fn new(project_id: &str, environment: Option<&str>, session_id: &SessionId) -> Self {
        let path = match environment {
            Some(env) => format!(
                "projects/{project_id}/agent/environments/{env}/users/-/sessions/{session_id}"
            ),
            None => format!("projects/{project_id}/agent/sessions/{session_id}"),
        };
        Self(path)
    }

    /// The resource name
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
