// utils/mod.rs
// 导出结果保存相关模块
pub mod save_utils;
