use std::path::PathBuf;
use thiserror::Error;

/// 光栅化器统一错误类型
#[derive(Error, Debug)]
pub enum RasterError {
    #[error("加载 OBJ 文件 {path:?} 失败: {source}")]
    ObjLoad {
        path: PathBuf,
        #[source]
        source: tobj::LoadError,
    },
    #[error("加载纹理 {path:?} 失败: {source}")]
    TextureLoad {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
    #[error("无效的纹理数据: {0}")]
    InvalidTexture(String),
    #[error("网格 '{0}' 没有材质")]
    MeshWithoutMaterial(String),
    #[error("纹理 '{0}' 未注册")]
    MissingTexture(String),
    #[error("网格 {mesh} 的索引数量 {count} 不是3的倍数")]
    InvalidIndexCount { mesh: usize, count: usize },
    #[error("索引 {index} 越界（顶点数 {vertex_count}）")]
    IndexOutOfRange { index: u32, vertex_count: usize },
    #[error("网格 {mesh} 的索引范围超出索引缓冲区")]
    MeshRangeOutOfBounds { mesh: usize },
    #[error("配置无效: {0}")]
    Config(String),
    #[error("解析TOML失败: {0}")]
    TomlParse(#[from] toml::de::Error),
    #[error("I/O 错误: {0}")]
    Io(#[from] std::io::Error),
    #[error("保存图像失败: {0}")]
    ImageSave(#[from] image::ImageError),
}

pub type Result<T> = std::result::Result<T, RasterError>;
