use crate::material_system::color::Color;
use crate::material_system::texture::Texture;
use nalgebra::{Vector2, Vector3};

/// 片元着色器输入：透视校正插值后的法线与纹理坐标
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentInput {
    pub normal: Vector3<f32>,
    pub texcoord: Vector2<f32>,
}

/// 片元着色：重复寻址的最近邻纹理采样，不做光照，法线不参与计算
pub fn shade_fragment(input: &FragmentInput, texture: &Texture) -> Color {
    texture.sample_nearest(input.texcoord.x, input.texcoord.y)
}
