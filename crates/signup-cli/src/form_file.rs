//! Form files: a [`FormValues`] record as JSON or YAML on disk.
//!
//! The format follows the extension (`.yaml`/`.yml` is YAML, anything else
//! is JSON). Field names are the form's camelCase names; absent fields are
//! empty.

use std::path::Path;

use anyhow::Context;
use signup_core::FormValues;

pub fn load(path: &Path) -> anyhow::Result<FormValues> {
    let raw = std::fs::read_to_string(path)
        .with_context(|| format!("reading form file {}", path.display()))?;
    let is_yaml = matches!(
        path.extension().and_then(|e| e.to_str()),
        Some("yaml" | "yml")
    );
    let values = if is_yaml {
        serde_yaml::from_str(&raw)
            .with_context(|| format!("parsing YAML form {}", path.display()))?
    } else {
        serde_json::from_str(&raw)
            .with_context(|| format!("parsing JSON form {}", path.display()))?
    };
    tracing::debug!(path = %path.display(), yaml = is_yaml, "form file loaded");
    Ok(values)
}
