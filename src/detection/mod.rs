// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 检测数据 (Detection data)
///
/// - types: 检测框, 坐标空间, 检测目标
/// - mot:   MOT 文本格式读写
pub mod mot;
pub mod types;

pub use mot::{read_mot, write_mot};
pub use types::{BoundingBox, Detection, Rect, Rect2f, Size, UNASSIGNED_ID};
