//! Background asset
//!
//! The dashboard can show a local image behind the page. It is read once at
//! startup and embedded as a base64 data URI. A missing or unreadable file is
//! not an error; the page falls back to a green radial gradient.

use std::path::Path;

use base64::Engine;
use tracing::debug;

/// CSS used when no background image is available
const FALLBACK_CSS: &str =
    "background: radial-gradient(1200px 600px at 20% 10%, #486a58 0%, #2e4438 40%, #1f2e27 100%);";

/// Page background
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Background {
    Image { mime: &'static str, data: String },
    Fallback,
}

impl Background {
    /// Read `path` if given; any failure degrades to [`Background::Fallback`]
    pub fn load(path: Option<&Path>) -> Self {
        let Some(path) = path else {
            return Background::Fallback;
        };

        match std::fs::read(path) {
            Ok(bytes) => Background::Image {
                mime: mime_for(path),
                data: base64::engine::general_purpose::STANDARD.encode(bytes),
            },
            Err(e) => {
                debug!("Background {:?} unavailable ({}), using gradient", path, e);
                Background::Fallback
            }
        }
    }

    pub fn is_image(&self) -> bool {
        matches!(self, Background::Image { .. })
    }

    /// CSS declarations for the page root
    pub fn css(&self) -> String {
        match self {
            Background::Image { mime, data } => format!(
                "background: url(\"data:{};base64,{}\") no-repeat center center fixed; background-size: cover;",
                mime, data
            ),
            Background::Fallback => FALLBACK_CSS.to_string(),
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Background::Fallback
    }
}

fn mime_for(path: &Path) -> &'static str {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase());

    match ext.as_deref() {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        Some("avif") => "image/avif",
        Some("svg") => "image/svg+xml",
        _ => "image/jpeg",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_falls_back() {
        let bg = Background::load(Some(Path::new("/no/such/background.avif")));
        assert_eq!(bg, Background::Fallback);
        assert!(bg.css().contains("radial-gradient"));
    }

    #[test]
    fn test_no_path_falls_back() {
        assert!(!Background::load(None).is_image());
    }

    #[test]
    fn test_image_is_embedded() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("field.PNG");
        std::fs::write(&path, b"abc").unwrap();

        let bg = Background::load(Some(&path));
        assert!(bg.is_image());
        assert_eq!(
            bg,
            Background::Image {
                mime: "image/png",
                data: "YWJj".to_string()
            }
        );
        assert!(bg.css().contains("data:image/png;base64,YWJj"));
    }

    #[test]
    fn test_unknown_extension_is_jpeg() {
        assert_eq!(mime_for(Path::new("bg.jpg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("bg")), "image/jpeg");
        assert_eq!(mime_for(Path::new("bg.avif")), "image/avif");
    }
}
