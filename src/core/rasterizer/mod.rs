//! # 三角形光栅化模块
//!
//! 基于逆矩阵的齐次边方程光栅化：三角形建立、全帧覆盖扫描、
//! 透视校正插值、深度测试与纹理着色

pub mod pixel_processor;
pub mod texture_sampler;
pub mod triangle_data;

// 重新导出主要类型和函数
pub use pixel_processor::rasterize_triangle;
pub use triangle_data::TriangleSetup;
