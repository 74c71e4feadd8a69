// src/icon.rs
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use log::warn;
use std::path::{Path, PathBuf};

pub const DEFAULT_ICON_FILE: &str = "default_icon.png";

/// Produces raw icon image bytes for a status reply.
///
/// The icon is cosmetic, so nothing here fails: bad input yields an empty
/// buffer and the card is drawn without an icon.
#[derive(Debug, Clone)]
pub struct IconSource {
    resource_dir: PathBuf,
}

impl IconSource {
    pub fn new(resource_dir: impl Into<PathBuf>) -> Self {
        Self { resource_dir: resource_dir.into() }
    }

    pub fn default_icon_path(&self) -> PathBuf {
        self.resource_dir.join(DEFAULT_ICON_FILE)
    }

    /// Decodes a favicon data URI, or loads the bundled icon when there is none.
    pub fn resolve_icon(&self, raw: Option<&str>) -> Vec<u8> {
        match raw {
            Some(raw) if !raw.trim().is_empty() => decode_favicon(raw),
            _ => read_default_icon(&self.default_icon_path()),
        }
    }
}

/// Strips everything up to the first comma (`data:image/png;base64,`) and
/// decodes the rest as standard base64.
pub fn decode_favicon(raw: &str) -> Vec<u8> {
    let payload = match raw.split_once(',') {
        Some((_, payload)) => payload,
        None => raw,
    };
    // Some servers wrap the payload the way MIME encoders do.
    let payload: String = payload.chars().filter(|c| !c.is_ascii_whitespace()).collect();

    match STANDARD.decode(payload.as_bytes()) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Discarding undecodable server icon ({} chars): {}", raw.len(), e);
            Vec::new()
        }
    }
}

fn read_default_icon(path: &Path) -> Vec<u8> {
    match std::fs::read(path) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!("Default icon {} unavailable: {}", path.display(), e);
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    const PNG_MAGIC: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn strips_data_uri_prefix() {
        let raw = format!("data:image/png;base64,{}", STANDARD.encode(PNG_MAGIC));
        assert_eq!(decode_favicon(&raw), PNG_MAGIC);
    }

    #[test]
    fn bare_base64_is_accepted() {
        assert_eq!(decode_favicon(&STANDARD.encode(b"icon")), b"icon");
    }

    #[test]
    fn only_first_comma_is_a_separator() {
        // Second comma lands inside the payload and makes it invalid base64.
        assert!(decode_favicon("data:x,QUJD,REVG").is_empty());
    }

    #[test]
    fn wrapped_lines_are_tolerated() {
        let raw = "data:image/png;base64,aWNv\nbg==";
        assert_eq!(decode_favicon(raw), b"icon");
    }

    #[test]
    fn corrupt_base64_yields_empty() {
        assert!(decode_favicon("data:image/png;base64,!!not base64!!").is_empty());
    }

    #[test]
    fn absent_icon_reads_default_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join(DEFAULT_ICON_FILE)).unwrap();
        file.write_all(&PNG_MAGIC).unwrap();

        let source = IconSource::new(dir.path());
        assert_eq!(source.resolve_icon(None), PNG_MAGIC);
        assert_eq!(source.resolve_icon(Some("")), PNG_MAGIC);
    }

    #[test]
    fn missing_default_file_yields_empty() {
        let dir = tempfile::tempdir().unwrap();
        let source = IconSource::new(dir.path());
        assert!(source.resolve_icon(None).is_empty());
    }

    #[test]
    fn bundled_default_icon_is_a_png() {
        let source = IconSource::new(Path::new(env!("CARGO_MANIFEST_DIR")).join("resource"));
        let bytes = source.resolve_icon(None);
        assert!(bytes.starts_with(&PNG_MAGIC));
    }
}
