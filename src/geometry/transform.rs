use nalgebra::{Matrix4, Point3, Unit, Vector3, Vector4};

/// 变换矩阵工厂，提供创建各种变换矩阵的静态方法
pub struct TransformFactory;

impl TransformFactory {
    /// 创建绕Y轴旋转的变换矩阵
    pub fn rotation_y(angle_rad: f32) -> Matrix4<f32> {
        Matrix4::from_euler_angles(0.0, angle_rad, 0.0)
    }

    /// 创建视图矩阵 (lookAt，右手坐标系)
    pub fn view(eye: &Point3<f32>, target: &Point3<f32>, up: &Vector3<f32>) -> Matrix4<f32> {
        Matrix4::look_at_rh(eye, target, &Unit::new_normalize(*up))
    }

    /// 创建透视投影矩阵，深度映射到 [-1, 1]
    pub fn perspective(aspect_ratio: f32, fov_y_rad: f32, near: f32, far: f32) -> Matrix4<f32> {
        Matrix4::new_perspective(aspect_ratio, fov_y_rad, near, far)
    }
}

/// 将模型空间点变换到裁剪空间（齐次坐标，w = 1 输入）
pub fn model_to_clip(position: &Point3<f32>, view_projection: &Matrix4<f32>) -> Vector4<f32> {
    view_projection * position.to_homogeneous()
}

/// 视口：裁剪空间到光栅空间的映射
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Viewport {
    pub width: usize,
    pub height: usize,
}

impl Viewport {
    pub fn new(width: usize, height: usize) -> Self {
        Viewport { width, height }
    }

    /// `x' = W(x+w)/2, y' = H(w-y)/2`，z 与 w 保持不变。
    /// 不做透视除法，三角形建立阶段需要齐次形式来恢复透视校正系数。
    pub fn to_raster(&self, clip: &Vector4<f32>) -> Vector4<f32> {
        let width = self.width as f32;
        let height = self.height as f32;
        Vector4::new(
            width * (clip.x + clip.w) / 2.0,
            height * (clip.w - clip.y) / 2.0,
            clip.z,
            clip.w,
        )
    }
}
