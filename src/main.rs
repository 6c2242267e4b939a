use log::{debug, error, info};
use std::time::Instant;

mod core;
mod error;
mod geometry;
mod io;
mod material_system;
mod utils;

use crate::core::renderer::Renderer;
use crate::error::Result;
use crate::geometry::camera::Camera;
use crate::io::obj_loader::load_obj_model;
use crate::io::simple_cli::SimpleCli;
use crate::utils::save_utils::save_frame;

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(e) = run() {
        error!("{}", e);
        std::process::exit(1);
    }
}

/// 加载 → 建立相机 → 渲染 → 保存；任一步失败都不会写出图像
fn run() -> Result<()> {
    let start_time = Instant::now();
    let settings = SimpleCli::process()?;

    let load_start = Instant::now();
    let scene = load_obj_model(&settings.obj)?;
    info!("模型加载耗时 {:?}", load_start.elapsed());

    let camera = Camera::from_settings(&settings)?;
    debug!("视图矩阵: {}", camera.view_matrix());
    let mut renderer = Renderer::new(settings.width, settings.height);
    renderer.render(
        &scene.model,
        &scene.textures,
        &camera.view_projection_matrix(),
    )?;

    save_frame(&settings.output, &renderer.frame_buffer)?;
    info!("总耗时 {:?}", start_time.elapsed());
    Ok(())
}
