use crate::geometry::transform::{Viewport, model_to_clip};
use crate::material_system::materials::Vertex;
use nalgebra::{Matrix4, Vector2, Vector3, Vector4};

/// 顶点着色器输出（透视除法之前）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClipVertex {
    pub position: Vector4<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

/// 视口映射后的顶点：x、y 为像素单位乘以 w，z 与 w 仍为齐次分量
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RasterVertex {
    pub position: Vector4<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

/// 顶点阶段：位置乘以视图投影矩阵，纹理坐标与法线原样传递。
///
/// NOTE: 法线没有经过法线矩阵变换，保持模型空间；这是既有行为，
/// 目前着色也不使用法线，改动前需要确认。
pub fn vertex_shader(vertex: &Vertex, view_projection: &Matrix4<f32>) -> ClipVertex {
    ClipVertex {
        position: model_to_clip(&vertex.position, view_projection),
        normal: vertex.normal,
        texcoord: vertex.texcoord,
    }
}

impl ClipVertex {
    pub fn to_raster(&self, viewport: &Viewport) -> RasterVertex {
        RasterVertex {
            position: viewport.to_raster(&self.position),
            normal: self.normal,
            texcoord: self.texcoord,
        }
    }
}

/// 几何处理器：一个三角形的顶点阶段加视口映射
pub struct GeometryProcessor;

impl GeometryProcessor {
    pub fn transform_triangle(
        vertices: [&Vertex; 3],
        view_projection: &Matrix4<f32>,
        viewport: &Viewport,
    ) -> [RasterVertex; 3] {
        vertices.map(|vertex| vertex_shader(vertex, view_projection).to_raster(viewport))
    }
}
