// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license
/// 绘制系统 (Rendering)
///
/// - compositor: 检测框 / 掩码 / 标签绘制
/// - color:      按ID着色
/// - font:       标签字体加载
pub mod color;
pub mod compositor;
pub mod font;

pub use color::color_for_id;
pub use compositor::{label_text, Compositor};
pub use font::{check_font, load_font};
