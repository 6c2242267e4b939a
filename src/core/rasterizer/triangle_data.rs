use super::texture_sampler::FragmentInput;
use crate::core::geometry_processor::RasterVertex;
use nalgebra::{Matrix3, Vector2, Vector3};

/// 边方程 `a*x + b*y + c`，在三角形内侧为正
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeFunction {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

impl EdgeFunction {
    pub fn new(a: f32, b: f32, c: f32) -> Self {
        EdgeFunction { a, b, c }
    }

    /// 除以 `|a| + |b|`，符号不变，只为数值稳定
    pub fn normalized(self) -> Self {
        let scale = self.a.abs() + self.b.abs();
        if scale > 0.0 {
            EdgeFunction::new(self.a / scale, self.b / scale, self.c / scale)
        } else {
            self
        }
    }

    #[inline]
    pub fn evaluate(&self, sample: &Vector3<f32>) -> f32 {
        self.a * sample.x + self.b * sample.y + self.c
    }

    /// 采样点是否在这条边的内侧。
    ///
    /// 恰好落在边上时按系数决定归属：`a > 0`，或 `a == 0 && b < 0` 视为内侧。
    /// 共享边的两个三角形系数互为相反数，因此边上的采样点只归其中一个。
    #[inline]
    pub fn covers(&self, sample: &Vector3<f32>) -> bool {
        let value = self.evaluate(sample);
        if value > 0.0 {
            true
        } else if value < 0.0 {
            false
        } else {
            self.a > 0.0 || (self.a == 0.0 && self.b < 0.0)
        }
    }
}

/// 三角形建立阶段的结果，只在该三角形的覆盖扫描期间存在。
///
/// 每个插值向量 `v` 在采样点 `s = (x, y, 1)` 处求 `v · s`，
/// 再乘以 `W = 1 / (one_over_w · s)` 得到透视校正后的属性值。
#[derive(Debug, Clone, PartialEq)]
pub struct TriangleSetup {
    pub edges: [EdgeFunction; 3],
    pub one_over_w: Vector3<f32>,
    pub depth: Vector3<f32>,
    pub normal: [Vector3<f32>; 3],
    pub texcoord: [Vector3<f32>; 2],
}

impl TriangleSetup {
    /// 以三个顶点的 (x, y, w) 为列构建矩阵并求逆。
    ///
    /// 行列式 `>= 0` 表示背面或退化三角形，返回 `None`；这是唯一的剔除，没有裁剪。
    pub fn new(vertices: &[RasterVertex; 3]) -> Option<Self> {
        let m = Matrix3::from_columns(&vertices.map(|v| {
            Vector3::new(v.position.x, v.position.y, v.position.w)
        }));

        // det == 0 会导致求逆除零，det > 0 为背面
        let det = m.determinant();
        if !(det < 0.0) {
            return None;
        }
        let inverse = m.try_inverse()?;

        // 逆矩阵第 i 行在顶点 j 处取值 δ_ij，即顶点 i 对边的边方程
        let edges = [0, 1, 2].map(|i| {
            EdgeFunction::new(inverse[(i, 0)], inverse[(i, 1)], inverse[(i, 2)]).normalized()
        });

        // 逐顶点属性三元组 → 插值向量：各行按属性加权求和
        let weights = inverse.transpose();
        let interpolant = |attribute: Vector3<f32>| weights * attribute;

        let one_over_w = interpolant(Vector3::new(1.0, 1.0, 1.0));
        let depth = interpolant(vertices.map(|v| v.position.z).into());
        let normal = [0, 1, 2].map(|axis| interpolant(vertices.map(|v| v.normal[axis]).into()));
        let texcoord = [0, 1].map(|axis| interpolant(vertices.map(|v| v.texcoord[axis]).into()));

        Some(TriangleSetup {
            edges,
            one_over_w,
            depth,
            normal,
            texcoord,
        })
    }

    #[inline]
    pub fn covers(&self, sample: &Vector3<f32>) -> bool {
        self.edges.iter().all(|edge| edge.covers(sample))
    }

    /// 采样点处插值得到的 w
    #[inline]
    pub fn w_at(&self, sample: &Vector3<f32>) -> f32 {
        1.0 / self.one_over_w.dot(sample)
    }

    #[inline]
    pub fn depth_at(&self, sample: &Vector3<f32>, w: f32) -> f32 {
        self.depth.dot(sample) * w
    }

    /// 透视校正后的法线与纹理坐标
    pub fn fragment_at(&self, sample: &Vector3<f32>, w: f32) -> FragmentInput {
        FragmentInput {
            normal: Vector3::from(self.normal.map(|n| n.dot(sample))) * w,
            texcoord: Vector2::from(self.texcoord.map(|t| t.dot(sample))) * w,
        }
    }
}
