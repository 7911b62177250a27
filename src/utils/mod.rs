/// 工具模块
/// Utility modules
pub mod geometry;
pub mod transform;
pub mod vector_ops;
