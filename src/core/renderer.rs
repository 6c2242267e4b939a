use crate::core::frame_buffer::FrameBuffer;
use crate::core::geometry_processor::GeometryProcessor;
use crate::core::rasterizer::{TriangleSetup, rasterize_triangle};
use crate::error::Result;
use crate::geometry::transform::Viewport;
use crate::material_system::materials::{Mesh, ModelData};
use crate::material_system::texture::{Texture, TextureRegistry};
use log::{debug, info};
use nalgebra::Matrix4;
use std::time::Instant;

/// 单次渲染的统计信息
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RenderStats {
    pub meshes: usize,
    pub triangles: usize,
    /// 行列式 >= 0（背面或退化）被剔除的三角形
    pub culled: usize,
    /// 通过深度测试并写入的片元
    pub fragments: usize,
}

/// 渲染器：持有帧缓冲区与视口，按网格、三角形顺序逐个光栅化
pub struct Renderer {
    pub frame_buffer: FrameBuffer,
    viewport: Viewport,
}

impl Renderer {
    pub fn new(width: usize, height: usize) -> Self {
        Renderer {
            frame_buffer: FrameBuffer::new(width, height),
            viewport: Viewport::new(width, height),
        }
    }

    /// 渲染整个模型。
    ///
    /// 绘制前先校验缓冲区并把每个网格的纹理名解析为引用，
    /// 任何失败都发生在第一个三角形写入之前。
    pub fn render(
        &mut self,
        model: &ModelData,
        textures: &TextureRegistry,
        view_projection: &Matrix4<f32>,
    ) -> Result<RenderStats> {
        model.validate()?;
        let bindings = Self::bind_textures(&model.meshes, textures)?;

        let start = Instant::now();
        let mut stats = RenderStats {
            meshes: model.meshes.len(),
            ..Default::default()
        };

        for (mesh, texture) in model.meshes.iter().zip(bindings) {
            let before = stats;
            self.draw_mesh(model, mesh, texture, view_projection, &mut stats);
            debug!(
                "网格 '{}': {} 个三角形, 剔除 {}, 写入 {} 个片元",
                mesh.name,
                stats.triangles - before.triangles,
                stats.culled - before.culled,
                stats.fragments - before.fragments
            );
        }

        info!(
            "渲染完成: {} 个网格, {} 个三角形 (剔除 {}), {} 个片元, 耗时 {:?}",
            stats.meshes,
            stats.triangles,
            stats.culled,
            stats.fragments,
            start.elapsed()
        );
        Ok(stats)
    }

    /// 名称查找只在这里发生一次，渲染循环只持有纹理引用
    fn bind_textures<'a>(meshes: &[Mesh], textures: &'a TextureRegistry) -> Result<Vec<&'a Texture>> {
        meshes
            .iter()
            .map(|mesh| {
                textures
                    .resolve(&mesh.texture_name)
                    .map(|id| textures.get(id))
            })
            .collect()
    }

    fn draw_mesh(
        &mut self,
        model: &ModelData,
        mesh: &Mesh,
        texture: &Texture,
        view_projection: &Matrix4<f32>,
        stats: &mut RenderStats,
    ) {
        for triangle in mesh.indices(&model.indices).chunks_exact(3) {
            let vertices = [0, 1, 2].map(|k| &model.vertices[triangle[k] as usize]);
            let raster =
                GeometryProcessor::transform_triangle(vertices, view_projection, &self.viewport);

            stats.triangles += 1;
            match TriangleSetup::new(&raster) {
                Some(setup) => {
                    stats.fragments += rasterize_triangle(&setup, texture, &mut self.frame_buffer);
                }
                None => stats.culled += 1,
            }
        }
    }
}
