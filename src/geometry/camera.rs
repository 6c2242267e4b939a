use crate::error::{RasterError, Result};
use crate::geometry::transform::TransformFactory;
use crate::io::render_settings::{RenderSettings, parse_point3, parse_vec3};
use nalgebra::{Matrix4, Point3, Vector3};

/// 相机类，负责管理视角和投影变换
#[derive(Debug, Clone)]
pub struct Camera {
    /// 相机位置（眼睛位置）
    pub position: Point3<f32>,
    /// 相机观察点（目标位置）
    pub target: Point3<f32>,
    /// 相机上方向
    pub up: Vector3<f32>,
    /// 垂直视场角（度）
    pub fov_y_degrees: f32,
    /// 宽高比（渲染宽度/高度）
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
    /// lookAt 之后额外绕 +Y 轴的旋转（度）
    pub yaw_degrees: f32,
    view_matrix: Matrix4<f32>,
    view_projection_matrix: Matrix4<f32>,
}

impl Camera {
    /// 创建一个新的透视投影相机
    #[allow(clippy::too_many_arguments)]
    pub fn new_perspective(
        position: Point3<f32>,
        target: Point3<f32>,
        up: Vector3<f32>,
        fov_y_degrees: f32,
        aspect_ratio: f32,
        near: f32,
        far: f32,
        yaw_degrees: f32,
    ) -> Self {
        let mut camera = Camera {
            position,
            target,
            up,
            fov_y_degrees,
            aspect_ratio,
            near,
            far,
            yaw_degrees,
            view_matrix: Matrix4::identity(),
            view_projection_matrix: Matrix4::identity(),
        };
        camera.update_matrices();
        camera
    }

    /// 根据渲染设置构建相机，宽高比取自输出分辨率
    pub fn from_settings(settings: &RenderSettings) -> Result<Self> {
        let position = parse_point3(&settings.camera_from)
            .map_err(|e| RasterError::Config(format!("无效的相机位置: {}", e)))?;
        let target = parse_point3(&settings.camera_at)
            .map_err(|e| RasterError::Config(format!("无效的相机目标: {}", e)))?;
        let up = parse_vec3(&settings.camera_up)
            .map_err(|e| RasterError::Config(format!("无效的相机上方向: {}", e)))?;

        Ok(Self::new_perspective(
            position,
            target,
            up,
            settings.camera_fov,
            settings.aspect_ratio(),
            settings.camera_near,
            settings.camera_far,
            settings.camera_yaw,
        ))
    }

    /// 更新所有相机矩阵
    pub fn update_matrices(&mut self) {
        self.view_matrix = TransformFactory::view(&self.position, &self.target, &self.up)
            * TransformFactory::rotation_y(self.yaw_degrees.to_radians());
        let projection = TransformFactory::perspective(
            self.aspect_ratio,
            self.fov_y_degrees.to_radians(),
            self.near,
            self.far,
        );
        self.view_projection_matrix = projection * self.view_matrix;
    }

    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.view_matrix
    }

    pub fn view_projection_matrix(&self) -> Matrix4<f32> {
        self.view_projection_matrix
    }
}
