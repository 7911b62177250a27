// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
pub mod config; // 绘制与预处理配置
pub mod detection; // 检测数据与 MOT 读写
pub mod error; // 错误类型
pub mod frame; // 帧
pub mod render; // 检测结果绘制
pub mod utils; // 向量运算, 几何度量, 坐标变换

pub use crate::config::{AppConfig, LetterboxConfig, RenderConfig};
pub use crate::detection::{BoundingBox, Detection, Rect, Rect2f, Size};
pub use crate::error::{MotParseError, VectorError};
pub use crate::frame::Frame;
pub use crate::render::Compositor;
pub use crate::utils::geometry::{cosine_similarity, iou};
pub use crate::utils::transform::{letterbox, to_absolute_bbox, to_absolute_mask, LetterboxResult};
