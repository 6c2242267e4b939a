use crate::error::{RasterError, Result};
use nalgebra::{Point3, Vector3};

/// 所有可通过TOML配置的渲染参数
#[derive(Debug, Clone, PartialEq)]
pub struct RenderSettings {
    // ===== 文件路径设置 =====
    /// 输入OBJ文件的路径，MTL与纹理相对其所在目录解析
    pub obj: String,
    /// 输出图像路径，扩展名为 .ppm 时写纯文本PPM
    pub output: String,

    // ===== 渲染基础设置 =====
    /// 输出图像的宽度
    pub width: usize,
    /// 输出图像的高度
    pub height: usize,

    // ===== 相机参数 =====
    /// 相机位置（视点），格式为"x,y,z"
    pub camera_from: String,
    /// 相机目标（观察点），格式为"x,y,z"
    pub camera_at: String,
    /// 相机世界坐标系上方向，格式为"x,y,z"
    pub camera_up: String,
    /// 相机垂直视场角（度）
    pub camera_fov: f32,
    /// 近平面距离
    pub camera_near: f32,
    /// 远平面距离
    pub camera_far: f32,
    /// lookAt 之后绕Y轴的附加旋转（度）
    pub camera_yaw: f32,
}

/// 辅助函数用于解析逗号分隔的浮点数
pub fn parse_vec3(s: &str) -> std::result::Result<Vector3<f32>, String> {
    let parts: Vec<&str> = s.split(',').collect();
    if parts.len() != 3 {
        return Err(format!("需要3个逗号分隔的值，实际为 '{}'", s));
    }
    let mut values = [0.0f32; 3];
    for (value, part) in values.iter_mut().zip(&parts) {
        *value = part
            .trim()
            .parse::<f32>()
            .map_err(|e| format!("无效数字 '{}': {}", part, e))?;
    }
    Ok(Vector3::from(values))
}

pub fn parse_point3(s: &str) -> std::result::Result<Point3<f32>, String> {
    parse_vec3(s).map(Point3::from)
}

impl RenderSettings {
    pub fn aspect_ratio(&self) -> f32 {
        self.width as f32 / self.height as f32
    }

    /// 渲染前检查分辨率、投影参数与向量格式
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(RasterError::Config(format!(
                "分辨率必须为正数，实际为 {}x{}",
                self.width, self.height
            )));
        }
        if !(self.camera_fov > 0.0 && self.camera_fov < 180.0) {
            return Err(RasterError::Config(format!(
                "视场角必须在 (0, 180) 之间，实际为 {}",
                self.camera_fov
            )));
        }
        if !(self.camera_near > 0.0) || !(self.camera_far > self.camera_near) {
            return Err(RasterError::Config(format!(
                "需要 0 < near < far，实际为 near={}, far={}",
                self.camera_near, self.camera_far
            )));
        }
        for (label, value) in [
            ("from", &self.camera_from),
            ("at", &self.camera_at),
            ("up", &self.camera_up),
        ] {
            parse_vec3(value)
                .map_err(|e| RasterError::Config(format!("camera.{}: {}", label, e)))?;
        }
        Ok(())
    }
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            obj: "assets/sponza.obj".to_string(),
            output: "render_output.ppm".to_string(),

            width: 960,
            height: 540,

            camera_from: "0,-8.5,-5".to_string(),
            camera_at: "20,5,1".to_string(),
            camera_up: "0,1,0".to_string(),
            camera_fov: 60.0,
            camera_near: 0.125,
            camera_far: 5000.0,
            camera_yaw: -30.0,
        }
    }
}
