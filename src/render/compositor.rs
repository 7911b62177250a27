// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 检测结果绘制: 检测框, 掩码叠加, 标签

use ab_glyph::FontArc;
use anyhow::Result;
use image::{GrayImage, Pixel, Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_hollow_rect_mut, draw_text_mut, text_size};
use imageproc::rect::Rect as DrawRect;
use ndarray::Array2;

use super::color::contrast_color;
use super::font::load_font;
use crate::config::RenderConfig;
use crate::detection::{BoundingBox, Detection, Rect, Size};
use crate::frame::Frame;
use crate::utils::transform::{to_absolute_bbox, to_absolute_mask_region};

/// 检测结果绘制器
///
/// Stateless between calls: [`Compositor::draw`] only reads its inputs and
/// allocates fresh buffers, so one compositor can be shared across threads.
#[derive(Clone, Default)]
pub struct Compositor {
    config: RenderConfig,
    font: Option<FontArc>,
}

impl Compositor {
    pub fn new(config: RenderConfig) -> Self {
        Self { config, font: None }
    }

    /// Build from config, loading `config.font` when one is set.
    pub fn from_config(config: RenderConfig) -> Result<Self> {
        let font = config.font.as_deref().map(load_font).transpose()?;
        Ok(Self { config, font })
    }

    pub fn with_font(mut self, font: FontArc) -> Self {
        self.font = Some(font);
        self
    }

    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    pub fn has_font(&self) -> bool {
        self.font.is_some()
    }

    /// 绘制检测结果, 返回新图像
    ///
    /// Detections are drawn in input order, later ones on top. Masks go to a
    /// separate overlay that is blended onto the copy once all detections are
    /// drawn; with no mask the copy is returned as is.
    pub fn draw(
        &self,
        frame: &Frame,
        detections: &[Detection],
        use_track_colors: bool,
        draw_labels: bool,
    ) -> RgbImage {
        let size = frame.size();
        let mut canvas = frame.image.clone();
        let mut overlay = RgbImage::new(size.width, size.height);
        let mut masked = false;

        for det in detections {
            let color = if use_track_colors {
                det.track_color()
            } else {
                det.class_color()
            };

            let rect = pixel_box(&det.bbox, size);
            let Some(visible) = rect.clamp_to(size) else {
                log::debug!("skipping detection outside the frame: {:?}", det.bbox);
                continue;
            };

            if let Some(mask) = &det.mask {
                masked |= self.paint_mask(&mut overlay, mask, rect, visible, color);
            }

            self.draw_box(&mut canvas, visible, color);

            if draw_labels {
                self.draw_label(&mut canvas, &label_text(det), visible, color);
            }
        }

        if masked {
            blend(
                &mut canvas,
                &overlay,
                self.config.base_weight,
                self.config.overlay_weight,
            );
        }
        canvas
    }

    /// Paint `color` into `overlay` where the box-sized binary mask is set.
    /// Only the `visible` part of the box is ever rasterised.
    fn paint_mask(
        &self,
        overlay: &mut RgbImage,
        mask: &Array2<f32>,
        rect: Rect,
        visible: Rect,
        color: Rgb<u8>,
    ) -> bool {
        let box_size = Size::new(rect.width as u32, rect.height as u32);
        let region = Rect::new(
            visible.x.saturating_sub(rect.x),
            visible.y.saturating_sub(rect.y),
            visible.width,
            visible.height,
        );
        let binary: GrayImage =
            to_absolute_mask_region(mask, box_size, region, self.config.mask_threshold);

        let mut painted = false;
        for (mx, my, bit) in binary.enumerate_pixels() {
            if bit[0] != 0 {
                overlay.put_pixel(visible.x as u32 + mx, visible.y as u32 + my, color);
                painted = true;
            }
        }
        painted
    }

    fn draw_box(&self, canvas: &mut RgbImage, rect: Rect, color: Rgb<u8>) {
        for i in 0..self.config.box_thickness.max(1) as i32 {
            let (w, h) = (rect.width - 2 * i, rect.height - 2 * i);
            if w <= 0 || h <= 0 {
                break;
            }
            let inner = DrawRect::at(rect.x + i, rect.y + i).of_size(w as u32, h as u32);
            draw_hollow_rect_mut(canvas, inner, color);
        }
    }

    /// Filled background just above the box (inside it when there is no
    /// room), with the text on top when a font is loaded.
    fn draw_label(&self, canvas: &mut RgbImage, text: &str, rect: Rect, color: Rgb<u8>) {
        if text.is_empty() {
            return;
        }

        let scale = self.config.font_size;
        let (tw, th) = match &self.font {
            Some(font) => text_size(scale, font, text),
            None => (
                (text.chars().count() as f32 * scale * 0.5).ceil() as u32,
                scale.ceil() as u32,
            ),
        };
        let pad = self.config.label_padding;
        let (bg_w, bg_h) = (tw + 2 * pad, th + 2 * pad);
        if bg_w == 0 || bg_h == 0 {
            return;
        }

        let x = rect.x;
        let y = if rect.y >= bg_h as i32 {
            rect.y - bg_h as i32
        } else {
            rect.y
        };
        draw_filled_rect_mut(canvas, DrawRect::at(x, y).of_size(bg_w, bg_h), color);

        let Some(font) = &self.font else {
            log::debug!("no label font loaded, drawing background only for {text:?}");
            return;
        };
        draw_text_mut(
            canvas,
            contrast_color(color),
            x + pad as i32,
            y + pad as i32,
            scale,
            font,
            text,
        );
    }
}

/// 检测框 → 像素框; absolute boxes are only truncated.
fn pixel_box(bbox: &BoundingBox, size: Size) -> Rect {
    match bbox {
        BoundingBox::Normalized(r) => to_absolute_bbox(r, size),
        BoundingBox::Absolute(r) => {
            Rect::new(r.x as i32, r.y as i32, r.width as i32, r.height as i32)
        }
    }
}

/// 标签文本: `(classId) className [trackId] NN%`
///
/// Each part is only present when its field is set (confidence: `> 0`).
pub fn label_text(det: &Detection) -> String {
    let mut parts = Vec::with_capacity(4);
    if let Some(class_id) = det.class_id {
        parts.push(format!("({class_id})"));
    }
    if !det.class_name.is_empty() {
        parts.push(det.class_name.clone());
    }
    if let Some(track_id) = det.track_id {
        parts.push(format!("[{track_id}]"));
    }
    if det.confidence > 0.0 {
        parts.push(format!("{:.0}%", det.confidence * 100.0));
    }
    parts.join(" ")
}

/// `base * a + overlay * b`, saturating. Weights need not sum to one.
fn blend(canvas: &mut RgbImage, overlay: &RgbImage, base: f32, weight: f32) {
    for (dst, src) in canvas.pixels_mut().zip(overlay.pixels()) {
        dst.apply2(src, |a, b| {
            (base * a as f32 + weight * b as f32).round().clamp(0.0, 255.0) as u8
        });
    }
}
