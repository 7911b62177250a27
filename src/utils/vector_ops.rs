// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
//
// 向量运算工具
// Element-wise helpers used by re-identification and association code.
//
// Binary operations never truncate or pad: operands of unequal length fail
// with `VectorError::DimensionMismatch` before any output is produced.

use crate::error::VectorError;

pub type Result<T> = std::result::Result<T, VectorError>;

fn check_dims(a: &[f32], b: &[f32]) -> Result<()> {
    if a.len() != b.len() {
        return Err(VectorError::DimensionMismatch {
            left: a.len(),
            right: b.len(),
        });
    }
    Ok(())
}

/// 逐元素相加 (Element-wise addition)
pub fn add(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x + y).collect())
}

/// 标量相加
pub fn add_scalar(v: &[f32], scalar: f32) -> Vec<f32> {
    v.iter().map(|x| x + scalar).collect()
}

/// 逐元素相乘 (Element-wise multiplication)
pub fn mul(a: &[f32], b: &[f32]) -> Result<Vec<f32>> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).collect())
}

/// 标量相乘
pub fn mul_scalar(v: &[f32], scalar: f32) -> Vec<f32> {
    v.iter().map(|x| x * scalar).collect()
}

/// 点积 (Dot product)
pub fn dot(a: &[f32], b: &[f32]) -> Result<f32> {
    check_dims(a, b)?;
    Ok(a.iter().zip(b).map(|(x, y)| x * y).sum())
}

/// L2 归一化
///
/// The caller guarantees `v` is non-zero: a zero vector yields NaN entries.
pub fn normalize(v: &[f32]) -> Vec<f32> {
    let norm = v.iter().map(|x| x * x).sum::<f32>().sqrt();
    mul_scalar(v, 1.0 / norm)
}

/// 加权融合: `alpha * a + (1 - alpha) * b`
///
/// Used as an exponential moving average when fusing appearance embeddings
/// of one track across frames.
pub fn compose(a: &[f32], b: &[f32], alpha: f32) -> Result<Vec<f32>> {
    check_dims(a, b)?;
    let complement = 1.0 - alpha;
    Ok(a.iter()
        .zip(b)
        .map(|(x, y)| alpha * x + complement * y)
        .collect())
}

/// Sum of all elements, `0` for an empty slice.
pub fn sum(v: &[f32]) -> f32 {
    v.iter().sum()
}

/// Arithmetic mean, `0` for an empty slice.
pub fn mean(v: &[f32]) -> f32 {
    if v.is_empty() {
        return 0.0;
    }
    sum(v) / v.len() as f32
}

pub fn max(v: &[f32]) -> Result<f32> {
    v.iter()
        .copied()
        .reduce(f32::max)
        .ok_or(VectorError::EmptyInput("max"))
}

/// Index of the largest element. Ties resolve to the first occurrence.
pub fn argmax(v: &[f32]) -> Result<usize> {
    v.iter()
        .enumerate()
        .reduce(|best, x| if x.1 > best.1 { x } else { best })
        .map(|(idx, _)| idx)
        .ok_or(VectorError::EmptyInput("argmax"))
}

pub fn exp(v: &[f32]) -> Vec<f32> {
    v.iter().map(|x| x.exp()).collect()
}

/// 切片 `[start, end)`
pub fn slice(v: &[f32], start: usize, end: usize) -> Result<Vec<f32>> {
    v.get(start..end)
        .map(<[f32]>::to_vec)
        .ok_or(VectorError::InvalidRange {
            start,
            end,
            len: v.len(),
        })
}

/// Element-wise logistic function. Empty input gives empty output.
pub fn sigmoid(logits: &[f32]) -> Vec<f32> {
    logits.iter().map(|x| 1.0 / (1.0 + (-x).exp())).collect()
}

/// 数值稳定的 softmax
///
/// Subtracts the maximum logit before exponentiating. Empty input gives an
/// empty output and a single logit always maps to `[1.0]`.
pub fn softmax(logits: &[f32]) -> Vec<f32> {
    match logits.len() {
        0 => Vec::new(),
        1 => vec![1.0],
        _ => {
            let max_logit = logits.iter().copied().fold(f32::NEG_INFINITY, f32::max);
            let exps = exp(&add_scalar(logits, -max_logit));
            let total = sum(&exps);
            mul_scalar(&exps, 1.0 / total)
        }
    }
}
