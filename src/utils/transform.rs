// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 坐标变换: 归一化坐标 → 像素坐标, letterbox 缩放填充

use image::{imageops, imageops::FilterType, GrayImage, ImageBuffer, Luma, Rgb, RgbImage};
use ndarray::Array2;

use crate::config::LetterboxConfig;
use crate::detection::{Rect, Rect2f, Size};

/// Default binarisation threshold for soft masks.
pub const MASK_THRESHOLD: f32 = 0.5;

/// 归一化框 → 像素框
///
/// Every component is scaled by the frame size and truncated toward zero.
/// Apply exactly once: the input must be a normalized box.
pub fn to_absolute_bbox(rel: &Rect2f, size: Size) -> Rect {
    let (w, h) = (size.width as f32, size.height as f32);
    Rect::new(
        (rel.x * w) as i32,
        (rel.y * h) as i32,
        (rel.width * w) as i32,
        (rel.height * h) as i32,
    )
}

/// 软掩码 → 二值掩码
///
/// Resizes `mask` (rows × cols) to `size` with linear interpolation and
/// binarises it: `>= threshold` becomes `1`, everything else `0`. An empty mask
/// gives an empty (0 × 0) image whatever the target size.
pub fn to_absolute_mask(mask: &Array2<f32>, size: Size, threshold: f32) -> GrayImage {
    if mask.is_empty() {
        return GrayImage::new(0, 0);
    }
    if size.is_empty() {
        return GrayImage::new(size.width, size.height);
    }

    let (rows, cols) = mask.dim();
    let soft: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(cols as u32, rows as u32, |x, y| {
            Luma([mask[[y as usize, x as usize]]])
        });
    let resized = imageops::resize(&soft, size.width, size.height, FilterType::Triangle);

    GrayImage::from_fn(size.width, size.height, |x, y| {
        Luma([u8::from(resized.get_pixel(x, y)[0] >= threshold)])
    })
}

/// 局部掩码
///
/// The `region` window (in box pixel coordinates) of the box-sized binary
/// mask. Only the region is allocated, so a box reaching far outside the frame
/// costs no more than its visible part. Samples bilinearly at pixel centres.
pub fn to_absolute_mask_region(
    mask: &Array2<f32>,
    box_size: Size,
    region: Rect,
    threshold: f32,
) -> GrayImage {
    if mask.is_empty() || box_size.is_empty() || region.is_empty() {
        return GrayImage::new(0, 0);
    }

    let (rows, cols) = mask.dim();
    let sx = cols as f64 / box_size.width as f64;
    let sy = rows as f64 / box_size.height as f64;

    GrayImage::from_fn(region.width as u32, region.height as u32, |x, y| {
        let u = ((region.x as f64 + x as f64) + 0.5) * sx - 0.5;
        let v = ((region.y as f64 + y as f64) + 0.5) * sy - 0.5;
        Luma([u8::from(sample_bilinear(mask, u, v) >= threshold)])
    })
}

fn sample_bilinear(mask: &Array2<f32>, u: f64, v: f64) -> f32 {
    let (rows, cols) = mask.dim();
    let u = u.clamp(0.0, (cols - 1) as f64);
    let v = v.clamp(0.0, (rows - 1) as f64);
    let (x0, y0) = (u.floor() as usize, v.floor() as usize);
    let (x1, y1) = ((x0 + 1).min(cols - 1), (y0 + 1).min(rows - 1));
    let (fx, fy) = ((u - x0 as f64) as f32, (v - y0 as f64) as f32);

    let top = mask[[y0, x0]] * (1.0 - fx) + mask[[y0, x1]] * fx;
    let bottom = mask[[y1, x0]] * (1.0 - fx) + mask[[y1, x1]] * fx;
    top * (1.0 - fy) + bottom * fy
}

/// letterbox 结果
#[derive(Debug, Clone)]
pub struct LetterboxResult {
    pub image: RgbImage,
    /// Applied (width, height) scale.
    pub ratio: (f32, f32),
    /// Left and top padding in pixels.
    pub pad: (u32, u32),
}

/// 等比缩放并填充到目标尺寸
///
/// `scale_up = false` never enlarges the source. With `auto_stride` the
/// padding is reduced modulo `stride`, giving the smallest stride-aligned
/// canvas instead of the full target; it takes precedence over `scale_fill`,
/// which stretches to the exact target without padding. Padding is split
/// with `round(pad/2 - 0.1)` on the top/left and `round(pad/2 + 0.1)` on the
/// bottom/right, so an odd total puts the extra pixel bottom/right.
pub fn letterbox(input: &RgbImage, cfg: &LetterboxConfig) -> LetterboxResult {
    let (tw, th) = (cfg.width, cfg.height);
    let color = Rgb(cfg.pad_color);
    let (sw, sh) = input.dimensions();

    if sw == 0 || sh == 0 {
        return LetterboxResult {
            image: RgbImage::from_pixel(tw, th, color),
            ratio: (1.0, 1.0),
            pad: (0, 0),
        };
    }

    let mut r = (th as f32 / sh as f32).min(tw as f32 / sw as f32);
    if !cfg.scale_up {
        r = r.min(1.0);
    }

    let mut ratio = (r, r);
    let mut new_w = (sw as f32 * r).round() as u32;
    let mut new_h = (sh as f32 * r).round() as u32;
    let mut dw = tw.saturating_sub(new_w) as f32;
    let mut dh = th.saturating_sub(new_h) as f32;

    if cfg.auto_stride && cfg.stride > 0 {
        dw %= cfg.stride as f32;
        dh %= cfg.stride as f32;
    } else if cfg.scale_fill {
        dw = 0.0;
        dh = 0.0;
        new_w = tw;
        new_h = th;
        ratio = (tw as f32 / sw as f32, th as f32 / sh as f32);
    }

    dw /= 2.0;
    dh /= 2.0;

    let resized = if (new_w, new_h) == (sw, sh) {
        input.clone()
    } else {
        imageops::resize(input, new_w, new_h, FilterType::Triangle)
    };

    let top = (dh - 0.1).round() as u32;
    let bottom = (dh + 0.1).round() as u32;
    let left = (dw - 0.1).round() as u32;
    let right = (dw + 0.1).round() as u32;

    let mut canvas = RgbImage::from_pixel(new_w + left + right, new_h + top + bottom, color);
    imageops::replace(&mut canvas, &resized, left as i64, top as i64);

    LetterboxResult {
        image: canvas,
        ratio,
        pad: (left, top),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::array;

    fn cfg(width: u32, height: u32) -> LetterboxConfig {
        LetterboxConfig {
            width,
            height,
            ..Default::default()
        }
    }

    #[test]
    fn test_absolute_bbox() {
        let rel = Rect2f::new(0.25, 0.25, 0.5, 0.5);
        assert_eq!(
            to_absolute_bbox(&rel, Size::new(400, 300)),
            Rect::new(100, 75, 200, 150)
        );
        // truncation, not rounding
        let rel = Rect2f::new(0.999, 0.0, 0.999, 0.5);
        assert_eq!(
            to_absolute_bbox(&rel, Size::new(10, 3)),
            Rect::new(9, 0, 9, 1)
        );
    }

    #[test]
    fn test_absolute_mask() {
        let rel = array![[0.1, 0.6, 0.1], [0.6, 0.9, 0.6], [0.1, 0.6, 0.1]];
        let abs = to_absolute_mask(&rel, Size::new(4, 4), MASK_THRESHOLD);
        assert_eq!(abs.dimensions(), (4, 4));
        assert!(abs.pixels().all(|p| p[0] == 0 || p[0] == 1));
        assert!(abs.pixels().any(|p| p[0] == 1));
    }

    #[test]
    fn test_absolute_mask_threshold_is_inclusive() {
        let zeros = Array2::<f32>::zeros((3, 3));
        let abs = to_absolute_mask(&zeros, Size::new(5, 5), 0.0);
        assert!(abs.pixels().all(|p| p[0] == 1));

        let rel = Array2::from_elem((2, 2), 0.7f32);
        let abs = to_absolute_mask(&rel, Size::new(4, 4), 0.5);
        assert!(abs.pixels().all(|p| p[0] == 1));
        let abs = to_absolute_mask(&rel, Size::new(4, 4), 0.75);
        assert!(abs.pixels().all(|p| p[0] == 0));
    }

    #[test]
    fn test_absolute_mask_empty() {
        let empty = Array2::<f32>::zeros((0, 0));
        let abs = to_absolute_mask(&empty, Size::new(4, 4), MASK_THRESHOLD);
        assert_eq!(abs.dimensions(), (0, 0));
        let abs = to_absolute_mask(&empty, Size::new(64, 32), 0.1);
        assert_eq!(abs.dimensions(), (0, 0));
    }

    #[test]
    fn test_mask_region_follows_box_coordinates() {
        // left column off, right column on
        let split = array![[0.0f32, 1.0]];
        let box_size = Size::new(100, 10);

        let full = to_absolute_mask_region(&split, box_size, Rect::new(0, 0, 100, 10), 0.5);
        assert_eq!(full.dimensions(), (100, 10));
        assert_eq!(full.get_pixel(49, 5)[0], 0);
        assert_eq!(full.get_pixel(50, 5)[0], 1);

        let right = to_absolute_mask_region(&split, box_size, Rect::new(60, 0, 10, 10), 0.5);
        assert_eq!(right.dimensions(), (10, 10));
        assert!(right.pixels().all(|p| p[0] == 1));
    }

    #[test]
    fn test_mask_region_of_huge_box_stays_small() {
        let ones = Array2::ones((2, 2));
        let region = Rect::new(50_000, 50_000, 10, 10);
        let out = to_absolute_mask_region(&ones, Size::new(100_000, 100_000), region, 0.5);
        assert_eq!(out.dimensions(), (10, 10));
        assert!(out.pixels().all(|p| p[0] == 1));

        let empty = Array2::<f32>::zeros((0, 0));
        let out = to_absolute_mask_region(&empty, Size::new(10, 10), region, 0.5);
        assert_eq!(out.dimensions(), (0, 0));
    }

    #[test]
    fn test_letterbox_basic() {
        let input = RgbImage::from_pixel(200, 100, Rgb([1, 1, 1]));
        let out = letterbox(&input, &cfg(300, 300));
        assert_eq!(out.image.dimensions(), (300, 300));
        assert_eq!(out.ratio, (1.5, 1.5));
        assert_eq!(out.pad, (0, 75));
        assert_eq!(*out.image.get_pixel(150, 10), Rgb([114, 114, 114]));
        assert_eq!(*out.image.get_pixel(150, 150), Rgb([1, 1, 1]));
    }

    #[test]
    fn test_letterbox_scale_up_and_down() {
        let small = RgbImage::from_pixel(100, 100, Rgb([1, 1, 1]));
        assert_eq!(
            letterbox(&small, &cfg(200, 200)).image.dimensions(),
            (200, 200)
        );

        let big = RgbImage::from_pixel(300, 300, Rgb([1, 1, 1]));
        let no_up = LetterboxConfig {
            scale_up: false,
            ..cfg(200, 200)
        };
        assert_eq!(letterbox(&big, &no_up).image.dimensions(), (200, 200));

        let out = letterbox(&small, &no_up);
        assert_eq!(out.image.dimensions(), (200, 200));
        assert_eq!(out.ratio, (1.0, 1.0));
        assert_eq!(out.pad, (50, 50));
    }

    #[test]
    fn test_letterbox_scale_fill() {
        let input = RgbImage::from_pixel(200, 100, Rgb([1, 1, 1]));
        let fill = LetterboxConfig {
            scale_fill: true,
            ..cfg(300, 300)
        };
        let out = letterbox(&input, &fill);
        assert_eq!(out.image.dimensions(), (300, 300));
        assert_eq!(out.ratio, (1.5, 3.0));
        assert_eq!(out.pad, (0, 0));
    }

    #[test]
    fn test_letterbox_odd_padding_goes_bottom_right() {
        let input = RgbImage::from_pixel(100, 100, Rgb([1, 1, 1]));
        let out = letterbox(&input, &cfg(201, 200));
        assert_eq!(out.image.dimensions(), (201, 200));
        assert_eq!(out.pad, (0, 0));
        assert_eq!(*out.image.get_pixel(200, 100), Rgb([114, 114, 114]));
        assert_eq!(*out.image.get_pixel(0, 100), Rgb([1, 1, 1]));
    }

    #[test]
    fn test_letterbox_auto_stride() {
        let input = RgbImage::from_pixel(200, 100, Rgb([1, 1, 1]));
        let auto = LetterboxConfig {
            auto_stride: true,
            ..cfg(640, 640)
        };
        let out = letterbox(&input, &auto);
        assert_eq!(out.image.dimensions(), (640, 320));
        assert_eq!(out.image.height() % 32, 0);
    }
}
