// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 标签字体加载

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use ab_glyph::FontArc;
use anyhow::{Context, Result};

pub const FONT: &str = "Arial.ttf";
const FONT_HOST: &str = "https://ultralytics.com/assets";
const MAX_FONT_BYTES: u64 = 32 * 1024 * 1024;

/// 从文件加载 TTF/OTF 字体
pub fn load_font(path: impl AsRef<Path>) -> Result<FontArc> {
    let path = path.as_ref();
    let bytes = fs::read(path).with_context(|| format!("failed to read font {}", path.display()))?;
    FontArc::try_from_vec(bytes).with_context(|| format!("invalid font file {}", path.display()))
}

/// 检查并加载字体
///
/// Looks for `name` under `<config dir>/Ultralytics/`, then in the working
/// directory, and downloads it into the config directory as a last resort.
pub fn check_font(name: &str) -> Result<FontArc> {
    let config_path = dirs::config_dir().map(|d| d.join("Ultralytics").join(name));
    let current_path = PathBuf::from(name);

    let path = match config_path {
        Some(p) if p.exists() => p,
        _ if current_path.exists() => current_path,
        Some(p) => download_font(name, p)?,
        None => download_font(name, current_path)?,
    };
    load_font(path)
}

fn download_font(name: &str, dest: PathBuf) -> Result<PathBuf> {
    let url = format!("{FONT_HOST}/{name}");
    log::info!("downloading font {url}");

    let resp = ureq::get(&url)
        .timeout(Duration::from_secs(60))
        .call()
        .with_context(|| format!("failed to download font {url}"))?;
    let mut buffer = Vec::new();
    resp.into_reader()
        .take(MAX_FONT_BYTES)
        .read_to_end(&mut buffer)?;

    if let Some(parent) = dest.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent)?;
    }
    fs::write(&dest, &buffer).with_context(|| format!("failed to save font {}", dest.display()))?;
    log::info!("font saved at {}", dest.display());
    Ok(dest)
}
