// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

use image::Rgb;
use rand::{rngs::StdRng, Rng, SeedableRng};

/// 根据ID生成颜色
///
/// A fresh generator is seeded with the id on every call, so the colour is a
/// pure function of the id and safe to call from any thread.
pub fn color_for_id(id: i64) -> Rgb<u8> {
    let mut rng = StdRng::seed_from_u64(id as u64);
    Rgb([rng.gen(), rng.gen(), rng.gen()])
}

/// Black or white, whichever reads better on `background`.
pub fn contrast_color(background: Rgb<u8>) -> Rgb<u8> {
    let [r, g, b] = background.0;
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 140.0 {
        Rgb([0, 0, 0])
    } else {
        Rgb([255, 255, 255])
    }
}
