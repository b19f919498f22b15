//! Clipboard functionality for copying results.

use arboard::Clipboard;
use tracing::info;

use super::format::format_clipboard;
use crate::error::{CalcError, Result};

/// Copy a value to the system clipboard in raw form (`1234.5`, no grouping).
///
/// Returns the copied text.
pub fn copy_value(value: f64) -> Result<String> {
    let text = format_clipboard(value);
    copy_to_clipboard(&text)?;
    info!(text, "copied to clipboard");
    Ok(text)
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = Clipboard::new()
        .map_err(|e| CalcError::Clipboard(format!("Failed to access clipboard: {}", e)))?;

    clipboard
        .set_text(text.to_string())
        .map_err(|e| CalcError::Clipboard(format!("Failed to copy to clipboard: {}", e)))
}
