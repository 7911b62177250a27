// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 几何度量: IOU 与余弦相似度

use crate::detection::Rect2f;
use crate::utils::vector_ops::{self, Result};

pub const EPSILON: f32 = 1e-6;

/// 计算两个矩形的IOU (Intersection over Union)
///
/// Returns `0` when the union is below [`EPSILON`], so degenerate boxes never
/// divide by (near) zero.
pub fn iou(a: &Rect2f, b: &Rect2f) -> f32 {
    let inter = a.intersect(b).area();
    let union = a.area() + b.area() - inter;
    if union < EPSILON {
        return 0.0;
    }
    inter / union
}

/// 余弦相似度, 映射到 `[0, 1]`
///
/// `(1 + cos) / 2`: orthogonal vectors give `0.5`, identical directions `1`,
/// opposite directions `0`. A (near) zero vector yields `0`.
pub fn cosine_similarity(u: &[f32], v: &[f32]) -> Result<f32> {
    let dot = vector_ops::dot(u, v)?;
    let norm_u = vector_ops::dot(u, u)?.sqrt();
    let norm_v = vector_ops::dot(v, v)?.sqrt();

    let norms = norm_u * norm_v;
    if norms < EPSILON * EPSILON {
        return Ok(0.0);
    }
    Ok((1.0 + dot / norms) / 2.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VectorError;

    const RECT1: Rect2f = Rect2f {
        x: 0.0,
        y: 0.0,
        width: 2.0,
        height: 2.0,
    };
    const RECT2: Rect2f = Rect2f {
        x: 1.0,
        y: 1.0,
        width: 2.0,
        height: 2.0,
    };
    const RECT3: Rect2f = Rect2f {
        x: 3.0,
        y: 3.0,
        width: 2.0,
        height: 2.0,
    };

    #[test]
    fn test_iou_overlapping() {
        assert!((iou(&RECT1, &RECT2) - 1.0 / 7.0).abs() < EPSILON);
        assert_eq!(iou(&RECT1, &RECT2), iou(&RECT2, &RECT1));
    }

    #[test]
    fn test_iou_disjoint_same_and_degenerate() {
        assert_eq!(iou(&RECT1, &RECT3), 0.0);
        assert_eq!(iou(&RECT1, &RECT1), 1.0);
        assert_eq!(iou(&RECT1, &Rect2f::default()), 0.0);
        assert_eq!(iou(&Rect2f::default(), &Rect2f::default()), 0.0);
    }

    #[test]
    fn test_cosine_similarity() {
        let x = [1.0, 0.0];
        let y = [0.0, 1.0];
        assert_eq!(cosine_similarity(&x, &y).unwrap(), 0.5);
        assert_eq!(cosine_similarity(&x, &x).unwrap(), 1.0);
        assert_eq!(cosine_similarity(&x, &[-1.0, 0.0]).unwrap(), 0.0);

        let diag = cosine_similarity(&x, &[1.0, 1.0]).unwrap();
        assert!((diag - 0.853553).abs() < EPSILON);
    }

    #[test]
    fn test_cosine_similarity_degenerate() {
        assert_eq!(cosine_similarity(&[1.0, 0.0], &[0.0, 0.0]).unwrap(), 0.0);
        assert_eq!(cosine_similarity(&[], &[]).unwrap(), 0.0);
        assert_eq!(
            cosine_similarity(&[1.0, 0.0], &[1.0]),
            Err(VectorError::DimensionMismatch { left: 2, right: 1 })
        );
    }
}
