use crate::error::{RasterError, Result};
use crate::io::render_settings::RenderSettings;
use log::{debug, warn};
use std::path::Path;
use toml::Value;

/// TOML配置管理器 - 统一处理所有配置的读写
pub struct TomlConfigLoader;

impl TomlConfigLoader {
    /// 从TOML文件加载完整配置
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<RenderSettings> {
        let content = std::fs::read_to_string(path.as_ref())?;
        debug!("读取配置文件: {:?}", path.as_ref());
        Self::load_from_content(&content)
    }

    /// 从TOML内容字符串加载配置
    pub fn load_from_content(content: &str) -> Result<RenderSettings> {
        let toml_value: Value = toml::from_str(content)?;
        Self::parse_toml_to_settings(&toml_value)
    }

    /// 保存配置到TOML文件
    pub fn save_to_file<P: AsRef<Path>>(settings: &RenderSettings, path: P) -> Result<()> {
        std::fs::write(path, Self::settings_to_toml(settings))?;
        Ok(())
    }

    /// 以默认设置生成示例配置文件
    pub fn create_example_config<P: AsRef<Path>>(path: P) -> Result<()> {
        Self::save_to_file(&RenderSettings::default(), path)
    }

    // ===== TOML -> RenderSettings 转换 =====

    fn parse_toml_to_settings(toml: &Value) -> Result<RenderSettings> {
        let mut settings = RenderSettings::default();

        // [files] 部分
        if let Some(files) = toml.get("files").and_then(|v| v.as_table()) {
            Self::parse_files_section(&mut settings, files);
        }

        // [render] 部分
        if let Some(render) = toml.get("render").and_then(|v| v.as_table()) {
            Self::parse_render_section(&mut settings, render)?;
        }

        // [camera] 部分
        if let Some(camera) = toml.get("camera").and_then(|v| v.as_table()) {
            Self::parse_camera_section(&mut settings, camera);
        }

        Ok(settings)
    }

    fn parse_files_section(settings: &mut RenderSettings, files: &toml::Table) {
        if let Some(obj) = files.get("obj").and_then(|v| v.as_str()) {
            settings.obj = obj.to_string();
        }
        if let Some(output) = files.get("output").and_then(|v| v.as_str()) {
            settings.output = output.to_string();
        }
    }

    fn parse_render_section(settings: &mut RenderSettings, render: &toml::Table) -> Result<()> {
        if let Some(width) = render.get("width").and_then(|v| v.as_integer()) {
            settings.width = Self::dimension("width", width)?;
        }
        if let Some(height) = render.get("height").and_then(|v| v.as_integer()) {
            settings.height = Self::dimension("height", height)?;
        }
        Ok(())
    }

    fn parse_camera_section(settings: &mut RenderSettings, camera: &toml::Table) {
        if let Some(from) = camera.get("from").and_then(|v| v.as_str()) {
            settings.camera_from = from.to_string();
        }
        if let Some(at) = camera.get("at").and_then(|v| v.as_str()) {
            settings.camera_at = at.to_string();
        }
        if let Some(up) = camera.get("up").and_then(|v| v.as_str()) {
            settings.camera_up = up.to_string();
        }
        if let Some(fov) = Self::number(camera, "fov") {
            settings.camera_fov = fov;
        }
        if let Some(near) = Self::number(camera, "near") {
            settings.camera_near = near;
        }
        if let Some(far) = Self::number(camera, "far") {
            settings.camera_far = far;
        }
        if let Some(yaw) = Self::number(camera, "yaw") {
            settings.camera_yaw = yaw;
        }
    }

    /// 浮点与整数写法都接受
    fn number(table: &toml::Table, key: &str) -> Option<f32> {
        match table.get(key)? {
            Value::Float(f) => Some(*f as f32),
            Value::Integer(i) => Some(*i as f32),
            other => {
                warn!("忽略配置项 '{}'：期望数字，实际为 {}", key, other.type_str());
                None
            }
        }
    }

    fn dimension(key: &str, value: i64) -> Result<usize> {
        usize::try_from(value)
            .ok()
            .filter(|&v| v > 0)
            .ok_or_else(|| RasterError::Config(format!("render.{} 必须为正整数，实际为 {}", key, value)))
    }

    // ===== RenderSettings -> TOML 转换 =====

    fn settings_to_toml(settings: &RenderSettings) -> String {
        let mut content = String::new();

        // 文件头注释
        content.push_str("# 软件光栅化器配置文件\n\n");

        // [files] 部分
        content.push_str("[files]\n");
        content.push_str(&format!("obj = {}\n", Value::from(settings.obj.as_str())));
        content.push_str(&format!("output = {}\n", Value::from(settings.output.as_str())));
        content.push('\n');

        // [render] 部分
        content.push_str("[render]\n");
        content.push_str(&format!("width = {}\n", settings.width));
        content.push_str(&format!("height = {}\n", settings.height));
        content.push('\n');

        // [camera] 部分
        content.push_str("[camera]\n");
        content.push_str(&format!("from = \"{}\"\n", settings.camera_from));
        content.push_str(&format!("at = \"{}\"\n", settings.camera_at));
        content.push_str(&format!("up = \"{}\"\n", settings.camera_up));
        content.push_str(&format!("fov = {}\n", Value::from(settings.camera_fov as f64)));
        content.push_str(&format!("near = {}\n", Value::from(settings.camera_near as f64)));
        content.push_str(&format!("far = {}\n", Value::from(settings.camera_far as f64)));
        content.push_str(&format!("yaw = {}\n", Value::from(settings.camera_yaw as f64)));

        content
    }
}
