//! Registration of TrueType files with plotters' `ab_glyph` text path.
//!
//! `ab_glyph` does not discover OS fonts, so every font path used by a scene
//! is read once and registered under its own path as the family name.

use crate::error::RenderError;
use log::debug;
use plotters::style::FontStyle;
use std::collections::HashMap;
use std::sync::{Mutex, OnceLock};

/// Outcome per path; failures keep their reason so later renders report it too.
static REGISTERED: OnceLock<Mutex<HashMap<String, Result<(), String>>>> = OnceLock::new();

/// Make `path` usable as `FontFamily::Name(path)`.
pub fn ensure_font_registered(path: &str) -> Result<(), RenderError> {
    let registry = REGISTERED.get_or_init(|| Mutex::new(HashMap::new()));
    let mut registry = match registry.lock() {
        Ok(guard) => guard,
        Err(poisoned) => poisoned.into_inner(),
    };
    let outcome = registry
        .entry(path.to_string())
        .or_insert_with(|| register(path));
    outcome.clone().map_err(|reason| RenderError::Font {
        path: path.to_string(),
        reason,
    })
}

fn register(path: &str) -> Result<(), String> {
    let bytes = std::fs::read(path).map_err(|e| e.to_string())?;
    // Registered fonts must outlive every drawing call.
    let bytes: &'static [u8] = Box::leak(bytes.into_boxed_slice());
    plotters::style::register_font(path, FontStyle::Normal, bytes)
        .map_err(|_| "not a usable TrueType font".to_string())?;
    debug!("registered font {path}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fonts_fail_every_time() {
        let path = "/nonexistent/freqplot/face.ttf";
        for _ in 0..2 {
            let err = ensure_font_registered(path).unwrap_err();
            assert!(matches!(
                err,
                RenderError::Font { ref path, .. } if path.ends_with("face.ttf")
            ));
        }
    }

    #[test]
    fn unparsable_files_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("empty.ttf");
        std::fs::write(&path, b"").unwrap();
        let err = ensure_font_registered(path.to_str().unwrap()).unwrap_err();
        assert!(err.to_string().contains("not a usable TrueType font"));
    }
}
