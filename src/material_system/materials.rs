use crate::error::{RasterError, Result};
use nalgebra::{Point3, Vector2, Vector3};

/// 表示带有位置、法线和纹理坐标的顶点（模型空间）
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Vertex {
    pub position: Point3<f32>,
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

impl Vertex {
    pub fn new(position: Point3<f32>, normal: Vector3<f32>, texcoord: Vector2<f32>) -> Self {
        Vertex {
            position,
            normal,
            texcoord,
        }
    }
}

/// 全局索引缓冲区中的一段三角形，整段绑定同一张漫反射纹理
#[derive(Debug, Clone, PartialEq)]
pub struct Mesh {
    pub name: String,
    /// 在全局索引缓冲区中的起始位置
    pub index_offset: usize,
    /// 索引数量，三角形数 = index_count / 3
    pub index_count: usize,
    pub texture_name: String,
}

impl Mesh {
    pub fn triangle_count(&self) -> usize {
        self.index_count / 3
    }

    pub fn indices<'a>(&self, index_buffer: &'a [u32]) -> &'a [u32] {
        &index_buffer[self.index_offset..self.index_offset + self.index_count]
    }
}

/// 加载完成后的不可变场景缓冲区
#[derive(Debug, Clone, Default)]
pub struct ModelData {
    pub name: String,
    pub vertices: Vec<Vertex>,
    pub indices: Vec<u32>,
    pub meshes: Vec<Mesh>,
}

impl ModelData {
    pub fn triangle_count(&self) -> usize {
        self.meshes.iter().map(Mesh::triangle_count).sum()
    }

    /// 检查索引数量是3的倍数、索引范围落在缓冲区内、每个索引都指向已有顶点
    pub fn validate(&self) -> Result<()> {
        for (mesh_idx, mesh) in self.meshes.iter().enumerate() {
            if mesh.index_count % 3 != 0 {
                return Err(RasterError::InvalidIndexCount {
                    mesh: mesh_idx,
                    count: mesh.index_count,
                });
            }
            let end = mesh.index_offset.checked_add(mesh.index_count);
            if end.is_none_or(|end| end > self.indices.len()) {
                return Err(RasterError::MeshRangeOutOfBounds { mesh: mesh_idx });
            }
        }

        let vertex_count = self.vertices.len();
        if let Some(&index) = self
            .indices
            .iter()
            .find(|&&index| index as usize >= vertex_count)
        {
            return Err(RasterError::IndexOutOfRange {
                index,
                vertex_count,
            });
        }
        Ok(())
    }
}
