// geometry/mod.rs
// 导出相机与变换模块
pub mod camera;
pub mod transform;
