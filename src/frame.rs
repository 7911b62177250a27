// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{DateTime, Utc};
use image::RgbImage;

use crate::detection::{Detection, Size};
use crate::render::Compositor;

static NEXT_FRAME_ID: AtomicU64 = AtomicU64::new(1);

/// 单帧图像 (One captured image with its metadata)
///
/// The size is always read from the image itself, so it cannot drift from the
/// pixel buffer.
#[derive(Clone, Debug)]
pub struct Frame {
    pub id: u64,
    pub image: RgbImage,
    pub source: String,
    pub timestamp: DateTime<Utc>,
    pub metadata: serde_json::Value,
}

impl Frame {
    pub fn new(image: RgbImage, source: impl Into<String>) -> Self {
        Self {
            id: NEXT_FRAME_ID.fetch_add(1, Ordering::Relaxed),
            image,
            source: source.into(),
            timestamp: Utc::now(),
            metadata: serde_json::Value::Null,
        }
    }

    pub fn size(&self) -> Size {
        let (width, height) = self.image.dimensions();
        Size::new(width, height)
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Milliseconds since the Unix epoch.
    pub fn timestamp_ms(&self) -> i64 {
        self.timestamp.timestamp_millis()
    }

    /// Render `detections` with the default style, without a label font.
    ///
    /// With no font loaded, labels show only their filled background; use a
    /// [`Compositor`] with a font for readable text.
    pub fn draw(
        &self,
        detections: &[Detection],
        use_track_colors: bool,
        draw_labels: bool,
    ) -> RgbImage {
        Compositor::default().draw(self, detections, use_track_colors, draw_labels)
    }
}
