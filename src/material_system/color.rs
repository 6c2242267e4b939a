use nalgebra::Vector3;

/// 线性RGB颜色，各分量范围 [0, 1]
pub type Color = Vector3<f32>;

/// 将浮点颜色量化为字节：先截断到 [0, 1]，再乘以255并向零取整
pub fn color_to_u8(color: &Color) -> [u8; 3] {
    [
        channel_to_u8(color.x),
        channel_to_u8(color.y),
        channel_to_u8(color.z),
    ]
}

#[inline]
fn channel_to_u8(value: f32) -> u8 {
    (255.0 * value.clamp(0.0, 1.0)) as u8
}
