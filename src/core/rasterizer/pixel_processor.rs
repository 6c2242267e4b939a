use super::texture_sampler::shade_fragment;
use super::triangle_data::TriangleSetup;
use crate::core::frame_buffer::FrameBuffer;
use crate::material_system::texture::Texture;
use nalgebra::Vector3;

/// 光栅化单个已建立的三角形，返回写入的片元数。
///
/// 对整帧逐像素测试（不做包围盒裁剪），采样点位于像素中心。
pub fn rasterize_triangle(
    setup: &TriangleSetup,
    texture: &Texture,
    frame_buffer: &mut FrameBuffer,
) -> usize {
    let mut written = 0;

    for y in 0..frame_buffer.height {
        for x in 0..frame_buffer.width {
            let sample = Vector3::new(x as f32 + 0.5, y as f32 + 0.5, 1.0);
            if !setup.covers(&sample) {
                continue;
            }

            let pixel_index = frame_buffer.index(x, y);
            if process_pixel(setup, &sample, pixel_index, texture, frame_buffer) {
                written += 1;
            }
        }
    }

    written
}

/// 深度测试通过后才插值其余属性并着色
#[inline]
fn process_pixel(
    setup: &TriangleSetup,
    sample: &Vector3<f32>,
    pixel_index: usize,
    texture: &Texture,
    frame_buffer: &mut FrameBuffer,
) -> bool {
    let w = setup.w_at(sample);
    let depth = setup.depth_at(sample, w);

    if !frame_buffer.passes_depth_test(pixel_index, depth) {
        return false;
    }

    let fragment = setup.fragment_at(sample, w);
    let color = shade_fragment(&fragment, texture);
    frame_buffer.write_fragment(pixel_index, depth, color);
    true
}
