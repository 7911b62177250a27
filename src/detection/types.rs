// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use image::Rgb;
use ndarray::Array2;

use crate::render::color::color_for_id;

/// Sentinel written for an absent class / track / frame id.
pub const UNASSIGNED_ID: i64 = -1;

/// 图像尺寸 (width, height)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Size {
    pub width: u32,
    pub height: u32,
}

impl Size {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn area(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

/// 浮点矩形 (x, y, width, height)
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect2f {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect2f {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn xmax(&self) -> f32 {
        self.x + self.width
    }

    pub fn ymax(&self) -> f32 {
        self.y + self.height
    }

    pub fn area(&self) -> f32 {
        self.width * self.height
    }

    /// Overlapping region; a zero-sized rectangle when the two do not meet.
    pub fn intersect(&self, other: &Rect2f) -> Rect2f {
        let l = self.x.max(other.x);
        let t = self.y.max(other.y);
        let r = self.xmax().min(other.xmax());
        let b = self.ymax().min(other.ymax());
        if r <= l || b <= t {
            return Rect2f::default();
        }
        Rect2f::new(l, t, r - l, b - t)
    }
}

/// 像素矩形 (integer pixel rectangle)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rect {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

impl Rect {
    pub fn new(x: i32, y: i32, width: i32, height: i32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0 || self.height <= 0
    }

    /// Clip to `[0, size)` on both axes. `None` when nothing is left.
    pub fn clamp_to(&self, size: Size) -> Option<Rect> {
        let x1 = self.x.clamp(0, size.width as i32);
        let y1 = self.y.clamp(0, size.height as i32);
        let x2 = self.x.saturating_add(self.width).clamp(0, size.width as i32);
        let y2 = self.y.saturating_add(self.height).clamp(0, size.height as i32);
        let clipped = Rect::new(x1, y1, x2 - x1, y2 - y1);
        (!clipped.is_empty()).then_some(clipped)
    }
}

/// 检测框坐标空间
///
/// A box is either relative to its frame (`[0, 1]` on both axes) or already in
/// pixels. The tag travels with the rectangle so a box is never converted twice.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BoundingBox {
    Normalized(Rect2f),
    Absolute(Rect2f),
}

impl Default for BoundingBox {
    fn default() -> Self {
        BoundingBox::Normalized(Rect2f::default())
    }
}

impl BoundingBox {
    pub fn rect(&self) -> &Rect2f {
        match self {
            BoundingBox::Normalized(r) | BoundingBox::Absolute(r) => r,
        }
    }

    pub fn is_normalized(&self) -> bool {
        matches!(self, BoundingBox::Normalized(_))
    }

    /// 像素坐标 (float); normalized boxes are scaled by `size`, absolute ones
    /// pass through untouched.
    pub fn to_absolute(&self, size: Size) -> Rect2f {
        match *self {
            BoundingBox::Normalized(r) => {
                let (w, h) = (size.width as f32, size.height as f32);
                Rect2f::new(r.x * w, r.y * h, r.width * w, r.height * h)
            }
            BoundingBox::Absolute(r) => r,
        }
    }
}

/// 单个检测目标 (One object observation)
#[derive(Debug, Clone, PartialEq)]
pub struct Detection {
    pub class_id: Option<u32>,
    /// Detector score; `<= 0` hides the confidence in labels.
    pub confidence: f32,
    pub bbox: BoundingBox,
    pub class_name: String,
    /// Soft mask in the box's normalized frame, `(rows, cols)`.
    pub mask: Option<Array2<f32>>,

    // MOT
    pub frame: Option<u32>,
    pub track_id: Option<u32>,
    pub position: [f32; 3],

    // ReID
    pub features: Option<Vec<f32>>,
}

impl Default for Detection {
    fn default() -> Self {
        Self {
            class_id: None,
            confidence: 0.0,
            bbox: BoundingBox::default(),
            class_name: String::new(),
            mask: None,
            frame: None,
            track_id: None,
            position: [0.0; 3],
            features: None,
        }
    }
}

impl Detection {
    pub fn new(bbox: BoundingBox, class_id: Option<u32>, confidence: f32) -> Self {
        Self {
            bbox,
            class_id,
            confidence,
            ..Default::default()
        }
    }

    pub fn with_class_name(mut self, name: impl Into<String>) -> Self {
        self.class_name = name.into();
        self
    }

    pub fn with_track_id(mut self, id: u32) -> Self {
        self.track_id = Some(id);
        self
    }

    pub fn with_mask(mut self, mask: Array2<f32>) -> Self {
        self.mask = Some(mask);
        self
    }

    pub fn with_features(mut self, features: Vec<f32>) -> Self {
        self.features = Some(features);
        self
    }

    /// 按类别着色
    pub fn class_color(&self) -> Rgb<u8> {
        color_for_id(self.class_id.map_or(UNASSIGNED_ID, i64::from))
    }

    /// 按跟踪ID着色
    pub fn track_color(&self) -> Rgb<u8> {
        color_for_id(self.track_id.map_or(UNASSIGNED_ID, i64::from))
    }
}
