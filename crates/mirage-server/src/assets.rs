//! Static shell delivery.
//!
//! The shell is the fixed document a browser loads before any view exists.
//! It is served byte-for-byte: either a file the operator points at, or the
//! compiled-in default. Its content is opaque to the protocol.

use std::path::Path;

use tracing::warn;

/// Compiled-in shell, used when no override path is configured.
pub const DEFAULT_SHELL: &str = include_str!("../assets/shell.html");

/// Load the shell document.
///
/// Reads the override file on every request so operators can edit it
/// without a restart; an unreadable override falls back to the default.
pub async fn load_shell(path: Option<&Path>) -> String {
    match path {
        Some(p) => match tokio::fs::read_to_string(p).await {
            Ok(contents) => contents,
            Err(e) => {
                warn!(path = %p.display(), error = %e, "failed to read shell override, serving default");
                DEFAULT_SHELL.to_owned()
            }
        },
        None => DEFAULT_SHELL.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_shell_connects_to_ws_endpoint() {
        assert!(DEFAULT_SHELL.contains("/ws"));
    }

    #[test]
    fn default_shell_speaks_the_protocol() {
        assert!(DEFAULT_SHELL.contains("\"init\""));
        assert!(DEFAULT_SHELL.contains("interaction"));
        assert!(DEFAULT_SHELL.contains("data-interactive"));
    }

    #[tokio::test]
    async fn no_path_serves_default() {
        assert_eq!(load_shell(None).await, DEFAULT_SHELL);
    }

    #[tokio::test]
    async fn override_file_served_verbatim() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("index.html");
        tokio::fs::write(&path, "<html>custom</html>").await.unwrap();
        assert_eq!(load_shell(Some(&path)).await, "<html>custom</html>");
    }

    #[tokio::test]
    async fn missing_override_falls_back() {
        let path = Path::new("/nonexistent/index.html");
        assert_eq!(load_shell(Some(path)).await, DEFAULT_SHELL);
    }
}
