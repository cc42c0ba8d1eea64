//! Per-run debug artifacts for the refinement controller.

use std::path::{Path, PathBuf};

use uuid::Uuid;

/// Writes files into a fresh `<base>/<uuid>/` directory.
///
/// Failures are logged and never surface to the caller.
#[derive(Debug, Clone)]
pub struct DebugWriter {
    dir: PathBuf,
}

impl DebugWriter {
    /// Create the run directory. `None` when it cannot be created.
    pub async fn create(base: &Path) -> Option<Self> {
        let dir = base.join(Uuid::new_v4().to_string());
        match tokio::fs::create_dir_all(&dir).await {
            Ok(()) => {
                tracing::debug!(dir = %dir.display(), "debug artifacts enabled");
                Some(Self { dir })
            }
            Err(e) => {
                tracing::warn!(dir = %dir.display(), error = %e, "cannot create debug directory");
                None
            }
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub async fn write(&self, name: &str, contents: &str) {
        let path = self.dir.join(name);
        if let Err(e) = tokio::fs::write(&path, contents).await {
            tracing::warn!(path = %path.display(), error = %e, "failed to write debug artifact");
        }
    }
}

/// The `<html>…</html>` region of `text`, or all of it when there is none.
pub fn extract_html_content(text: &str) -> &str {
    let Some(start) = text.find("<html") else {
        return text;
    };
    match text[start..].rfind("</html>") {
        Some(end) => &text[start..start + end + "</html>".len()],
        None => text,
    }
}

/// Text before the first `</thinking>`, or all of it.
pub fn thinking_section(text: &str) -> &str {
    text.split("</thinking>").next().unwrap_or(text)
}
