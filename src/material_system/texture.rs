use crate::error::{RasterError, Result};
use crate::material_system::color::Color;
use image::DynamicImage;
use log::debug;
use std::collections::HashMap;
use std::path::Path;

/// 原始纹素缓冲区，行优先存储，每个纹素 `channels` 个字节（前三个为RGB）
#[derive(Debug, Clone)]
pub struct Texture {
    data: Vec<u8>,
    pub width: u32,
    pub height: u32,
    pub channels: u32,
}

impl Texture {
    pub fn from_raw(width: u32, height: u32, channels: u32, data: Vec<u8>) -> Result<Self> {
        if width == 0 || height == 0 {
            return Err(RasterError::InvalidTexture(format!(
                "尺寸 {}x{} 不能为零",
                width, height
            )));
        }
        if channels < 3 {
            return Err(RasterError::InvalidTexture(format!(
                "需要至少3个通道，实际为 {}",
                channels
            )));
        }
        let expected = width as usize * height as usize * channels as usize;
        if data.len() != expected {
            return Err(RasterError::InvalidTexture(format!(
                "数据长度 {} 与 {}x{}x{} 不匹配",
                data.len(),
                width,
                height,
                channels
            )));
        }
        Ok(Texture {
            data,
            width,
            height,
            channels,
        })
    }

    /// 单纹素纯色纹理
    #[cfg(test)]
    pub fn solid(rgb: [u8; 3]) -> Self {
        Texture {
            data: rgb.to_vec(),
            width: 1,
            height: 1,
            channels: 3,
        }
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let img = image::open(path).map_err(|source| RasterError::TextureLoad {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_image(img)
    }

    /// 灰度图扩展为RGB；带Alpha的图像保留4通道
    pub fn from_image(img: DynamicImage) -> Result<Self> {
        let (width, height) = (img.width(), img.height());
        let (channels, data) = if img.color().has_alpha() {
            (4, img.into_rgba8().into_raw())
        } else {
            (3, img.into_rgb8().into_raw())
        };
        Self::from_raw(width, height, channels, data)
    }

    /// 读取 (x, y) 处纹素的RGB，归一化到 [0, 1]
    pub fn texel(&self, x: u32, y: u32) -> Color {
        let offset = texel_offset(x, y, self.width, self.channels);
        let rgb = &self.data[offset..offset + 3];
        Color::new(
            rgb[0] as f32 / 255.0,
            rgb[1] as f32 / 255.0,
            rgb[2] as f32 / 255.0,
        )
    }

    /// 最近邻采样，重复寻址
    pub fn sample_nearest(&self, s: f32, t: f32) -> Color {
        let x = texel_index(s, self.width);
        let y = texel_index(t, self.height);
        self.texel(x, y)
    }
}

/// 坐标到纹素下标：只取小数部分（按截断语义），再做 `floor(frac * dim - 0.5)`。
///
/// NOTE: `-0.5` 偏移沿用既有渲染结果，是否为有意设计尚未确认，不要擅自修改。
/// 结果截断到 `[0, dim - 1]`，负小数与偏移产生的 -1 都落在 0。
pub fn texel_index(coord: f32, dim: u32) -> u32 {
    let frac = coord.fract();
    let index = (frac * dim as f32 - 0.5).floor();
    if index.is_nan() || index <= 0.0 {
        0
    } else {
        (index as u32).min(dim - 1)
    }
}

/// 纹素首字节在行优先缓冲区中的偏移，全程用 usize 计算
#[inline]
fn texel_offset(x: u32, y: u32, width: u32, channels: u32) -> usize {
    (y as usize * width as usize + x as usize) * channels as usize
}

/// 纹理句柄，加载阶段由名称解析而来
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TextureId(usize);

/// 渲染期间持有全部纹理的注册表
#[derive(Debug, Default)]
pub struct TextureRegistry {
    textures: Vec<Texture>,
    names: HashMap<String, TextureId>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// 注册纹理；同名纹理会被替换，句柄保持不变
    pub fn insert(&mut self, name: impl Into<String>, texture: Texture) -> TextureId {
        let name = name.into();
        if let Some(&id) = self.names.get(&name) {
            self.textures[id.0] = texture;
            return id;
        }
        let id = TextureId(self.textures.len());
        debug!(
            "注册纹理 '{}': {}x{}, {} 通道",
            name, texture.width, texture.height, texture.channels
        );
        self.textures.push(texture);
        self.names.insert(name, id);
        id
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    pub fn resolve(&self, name: &str) -> Result<TextureId> {
        self.names
            .get(name)
            .copied()
            .ok_or_else(|| RasterError::MissingTexture(name.to_string()))
    }

    pub fn get(&self, id: TextureId) -> &Texture {
        &self.textures[id.0]
    }

    pub fn len(&self) -> usize {
        self.textures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.textures.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 4x4 纹理，每个纹素颜色编码自身坐标
    fn coordinate_texture() -> Texture {
        let mut data = Vec::new();
        for y in 0..4u8 {
            for x in 0..4u8 {
                data.extend_from_slice(&[x * 60, y * 60, 255]);
            }
        }
        Texture::from_raw(4, 4, 3, data).unwrap()
    }

    #[test]
    fn index_applies_half_texel_bias() {
        // 0.5 * 4 - 0.5 = 1.5 -> 1
        assert_eq!(texel_index(0.5, 4), 1);
        // 0.9 * 4 - 0.5 = 3.1 -> 3
        assert_eq!(texel_index(0.9, 4), 3);
        // 0.1 * 4 - 0.5 = -0.1 -> floor -1 -> 截断到 0
        assert_eq!(texel_index(0.1, 4), 0);
    }

    #[test]
    fn index_stays_in_bounds() {
        assert_eq!(texel_index(0.999_999, 4), 3);
        assert_eq!(texel_index(-0.75, 4), 0);
        assert_eq!(texel_index(f32::NAN, 4), 0);
        assert_eq!(texel_index(0.7, 1), 0);
    }

    #[test]
    fn sampling_wraps_on_both_axes() {
        let texture = coordinate_texture();
        assert_eq!(
            texture.sample_nearest(1.5, 0.5),
            texture.sample_nearest(0.5, 0.5)
        );
        assert_eq!(
            texture.sample_nearest(0.5, 1.5),
            texture.sample_nearest(0.5, 0.5)
        );
        assert_eq!(
            texture.sample_nearest(1.5, 1.5),
            texture.sample_nearest(0.5, 0.5)
        );
        assert_eq!(
            texture.sample_nearest(0.5, 0.5),
            Color::new(60.0 / 255.0, 60.0 / 255.0, 1.0)
        );
    }

    #[test]
    fn texel_offset_does_not_wrap_for_large_textures() {
        assert_eq!(texel_offset(1, 2, 4, 3), 27);
        // 40000 * 40000 * 4 超出 u32 范围
        assert_eq!(texel_offset(39_999, 39_999, 40_000, 4), 6_399_999_996);
    }

    #[test]
    fn four_channel_texels_skip_alpha() {
        let data = vec![10, 20, 30, 40, 50, 60, 70, 80];
        let texture = Texture::from_raw(2, 1, 4, data).unwrap();
        assert_eq!(
            texture.texel(1, 0),
            Color::new(50.0 / 255.0, 60.0 / 255.0, 70.0 / 255.0)
        );
    }

    #[test]
    fn from_raw_rejects_mismatched_buffers() {
        assert!(matches!(
            Texture::from_raw(2, 2, 3, vec![0; 11]),
            Err(RasterError::InvalidTexture(_))
        ));
        assert!(matches!(
            Texture::from_raw(1, 1, 1, vec![0]),
            Err(RasterError::InvalidTexture(_))
        ));
        assert!(matches!(
            Texture::from_raw(0, 1, 3, vec![]),
            Err(RasterError::InvalidTexture(_))
        ));
    }

    #[test]
    fn from_image_expands_grayscale() {
        let img = DynamicImage::ImageLuma8(image::GrayImage::from_pixel(
            2,
            2,
            image::Luma([128]),
        ));
        let texture = Texture::from_image(img).unwrap();
        assert_eq!(texture.channels, 3);
        let gray = 128.0 / 255.0;
        assert_eq!(texture.texel(1, 1), Color::new(gray, gray, gray));
    }

    #[test]
    fn registry_resolves_names_once() {
        let mut registry = TextureRegistry::new();
        let brick = registry.insert("brick.png", Texture::solid([200, 0, 0]));
        let stone = registry.insert("stone.png", Texture::solid([0, 0, 200]));
        assert_ne!(brick, stone);
        assert_eq!(registry.resolve("brick.png").unwrap(), brick);
        assert_eq!(registry.get(stone).texel(0, 0), Color::new(0.0, 0.0, 200.0 / 255.0));
        assert_eq!(registry.len(), 2);

        let replaced = registry.insert("brick.png", Texture::solid([0, 255, 0]));
        assert_eq!(replaced, brick);
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn registry_reports_missing_texture() {
        let registry = TextureRegistry::new();
        match registry.resolve("missing.png") {
            Err(RasterError::MissingTexture(name)) => assert_eq!(name, "missing.png"),
            other => panic!("unexpected result: {:?}", other.map(|_| ())),
        }
    }
}
