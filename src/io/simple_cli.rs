use crate::error::Result;
use crate::io::config_loader::TomlConfigLoader;
use crate::io::render_settings::RenderSettings;
use clap::Parser;
use log::info;

const EXAMPLE_CONFIG_PATH: &str = "example_config.toml";

/// 命令行参数：配置文件加少量覆盖项
#[derive(Parser, Debug)]
#[command(name = "soft_raster")]
#[command(about = "单线程软件光栅化渲染器")]
pub struct SimpleCli {
    /// 配置文件路径（TOML格式）
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<String>,

    /// 覆盖输入OBJ文件
    #[arg(long, value_name = "FILE")]
    pub obj: Option<String>,

    /// 覆盖输出图像路径
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<String>,

    /// 覆盖输出宽度
    #[arg(long)]
    pub width: Option<usize>,

    /// 覆盖输出高度
    #[arg(long)]
    pub height: Option<usize>,

    /// 写出示例配置并加载它
    #[arg(long)]
    pub use_example_config: bool,
}

impl SimpleCli {
    /// 处理CLI参数并返回最终的RenderSettings
    pub fn process() -> Result<RenderSettings> {
        Self::parse().into_settings()
    }

    pub fn into_settings(self) -> Result<RenderSettings> {
        let mut settings = if self.use_example_config {
            TomlConfigLoader::create_example_config(EXAMPLE_CONFIG_PATH)?;
            info!("已创建示例配置: {}", EXAMPLE_CONFIG_PATH);
            TomlConfigLoader::load_from_file(EXAMPLE_CONFIG_PATH)?
        } else if let Some(config_path) = &self.config {
            info!("加载配置文件: {}", config_path);
            TomlConfigLoader::load_from_file(config_path)?
        } else {
            info!("使用默认设置");
            RenderSettings::default()
        };

        if let Some(obj) = self.obj {
            settings.obj = obj;
        }
        if let Some(output) = self.output {
            settings.output = output;
        }
        if let Some(width) = self.width {
            settings.width = width;
        }
        if let Some(height) = self.height {
            settings.height = height;
        }

        settings.validate()?;
        Ok(settings)
    }
}
