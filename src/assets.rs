use std::path::{Path, PathBuf};

use anyhow::Context as _;
use base64::Engine as _;

use crate::cli::Mode;

/// Where page assets end up: inlined into the HTML, or written beside it.
pub struct AssetStore {
    mode: Mode,
    out_dir: PathBuf,
    assets_dir_name: String,
}

impl AssetStore {
    pub fn new_dir(out_dir: PathBuf, assets_dir_name: String) -> Self {
        Self {
            mode: Mode::Dir,
            out_dir,
            assets_dir_name,
        }
    }

    pub fn new_single() -> Self {
        Self {
            mode: Mode::Single,
            out_dir: PathBuf::new(),
            assets_dir_name: String::new(),
        }
    }

    /// Stores a local image and returns the `src` the page should use.
    pub fn store_image(&self, path: &Path) -> anyhow::Result<String> {
        let bytes =
            std::fs::read(path).with_context(|| format!("read image {}", path.display()))?;
        let (mime, ext) = sniff_mime_and_ext(&bytes, path);

        match self.mode {
            Mode::Single => {
                let b64 = base64::engine::general_purpose::STANDARD.encode(&bytes);
                Ok(format!("data:{};base64,{}", mime, b64))
            }
            Mode::Dir => write_asset_file(&self.out_dir, &self.assets_dir_name, &bytes, ext),
        }
    }
}

fn write_asset_file(
    out_dir: &Path,
    assets_dir_name: &str,
    bytes: &[u8],
    ext: &str,
) -> anyhow::Result<String> {
    let hash = blake3::hash(bytes).to_hex().to_string();
    let rel = format!("{}/img/{}.{}", assets_dir_name, hash, ext);
    let abs = out_dir.join(&rel);
    if let Some(parent) = abs.parent() {
        std::fs::create_dir_all(parent).with_context(|| format!("create {}", parent.display()))?;
    }
    if !abs.exists() {
        std::fs::write(&abs, bytes).with_context(|| format!("write {}", abs.display()))?;
    }
    Ok(rel)
}

fn sniff_mime_and_ext(bytes: &[u8], path: &Path) -> (&'static str, &'static str) {
    if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
        return ("image/png", "png");
    }
    if bytes.starts_with(b"\xff\xd8\xff") {
        return ("image/jpeg", "jpg");
    }
    if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
        return ("image/gif", "gif");
    }
    if bytes.starts_with(b"RIFF") && bytes.get(8..12) == Some(b"WEBP") {
        return ("image/webp", "webp");
    }

    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase)
        .unwrap_or_default();
    match ext.as_str() {
        "png" => ("image/png", "png"),
        "jpg" | "jpeg" => ("image/jpeg", "jpg"),
        "gif" => ("image/gif", "gif"),
        "webp" => ("image/webp", "webp"),
        "svg" => ("image/svg+xml", "svg"),
        _ => ("application/octet-stream", "bin"),
    }
}
