// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//! 绘制与预处理配置 - 通过JSON文件调整参数

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::utils::transform::MASK_THRESHOLD;

/// 绘制参数配置
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub mask_threshold: f32, // 掩码二值化阈值
    pub base_weight: f32,    // 原图权重
    pub overlay_weight: f32, // 掩码叠加权重
    pub box_thickness: u32,  // 边框线宽(像素)
    pub font_size: f32,      // 标签字号
    pub label_padding: u32,  // 标签内边距
    pub font: Option<String>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            mask_threshold: MASK_THRESHOLD,
            base_weight: 0.9,
            overlay_weight: 0.3,
            box_thickness: 2,
            font_size: 16.0,
            label_padding: 3,
            font: None,
        }
    }
}

/// letterbox 参数
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LetterboxConfig {
    pub width: u32,
    pub height: u32,
    pub pad_color: [u8; 3],
    pub auto_stride: bool, // 填充对齐到 stride 的倍数
    pub scale_fill: bool,  // 拉伸填满, 不保持宽高比
    pub scale_up: bool,    // 允许放大
    pub stride: u32,
}

impl Default for LetterboxConfig {
    fn default() -> Self {
        Self {
            width: 640,
            height: 640,
            pad_color: [114, 114, 114],
            auto_stride: false,
            scale_fill: false,
            scale_up: true,
            stride: 32,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub render: RenderConfig,
    pub letterbox: LetterboxConfig,
}

impl AppConfig {
    /// 从JSON文件加载配置
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let json = fs::read_to_string(path)
            .with_context(|| format!("failed to read config {}", path.display()))?;
        let config = serde_json::from_str(&json)
            .with_context(|| format!("failed to parse config {}", path.display()))?;
        log::info!("config loaded from {}", path.display());
        Ok(config)
    }

    /// Load `path`, writing the defaults there if it does not exist yet and
    /// falling back to defaults if it cannot be parsed.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            log::info!("config {} not found, creating defaults", path.display());
            let config = Self::default();
            if let Err(e) = config.save(path) {
                log::warn!("{e:#}");
            }
            return config;
        }
        Self::load(path).unwrap_or_else(|e| {
            log::warn!("{e:#}, using defaults");
            Self::default()
        })
    }

    /// 保存配置到JSON文件
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("failed to write config {}", path.display()))?;
        log::info!("config saved to {}", path.display());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cfg = AppConfig::default();
        assert_eq!(cfg.render.mask_threshold, 0.5);
        assert_eq!(cfg.render.base_weight, 0.9);
        assert_eq!(cfg.render.overlay_weight, 0.3);
        assert_eq!(cfg.letterbox.pad_color, [114, 114, 114]);
        assert!(cfg.letterbox.scale_up);
        assert_eq!(cfg.letterbox.stride, 32);
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("overlay.json");

        let mut cfg = AppConfig::default();
        cfg.render.box_thickness = 4;
        cfg.letterbox.auto_stride = true;
        cfg.save(&path).unwrap();

        assert_eq!(AppConfig::load(&path).unwrap(), cfg);
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let cfg: AppConfig =
            serde_json::from_str(r#"{ "letterbox": { "width": 320 } }"#).unwrap();
        assert_eq!(cfg.letterbox.width, 320);
        assert_eq!(cfg.letterbox.height, 640);
        assert_eq!(cfg.render, RenderConfig::default());
    }

    #[test]
    fn test_load_or_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.json");
        assert_eq!(AppConfig::load_or_default(&path), AppConfig::default());
        assert!(path.exists());

        let broken = dir.path().join("broken.json");
        fs::write(&broken, "{ not json").unwrap();
        assert_eq!(AppConfig::load_or_default(&broken), AppConfig::default());
        assert!(AppConfig::load(&broken).is_err());
    }
}
