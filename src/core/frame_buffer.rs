use crate::material_system::color::{Color, color_to_u8};

/// 帧缓冲区实现，存储渲染结果
///
/// 颜色与深度尺寸一致，且只通过 [`FrameBuffer::write_fragment`] 同时更新。
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    /// 深度值，数值越小表示越近；一次渲染内每个像素只减不增
    depth_buffer: Vec<f32>,
    /// 线性RGB颜色，默认黑色
    color_buffer: Vec<Color>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        let num_pixels = width * height;
        FrameBuffer {
            width,
            height,
            depth_buffer: vec![f32::MAX; num_pixels],
            color_buffer: vec![Color::zeros(); num_pixels],
        }
    }

    #[inline]
    pub fn index(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// `<=` 比较：深度相同时后提交的片元胜出；NaN 永远不通过
    #[inline]
    pub fn passes_depth_test(&self, index: usize, depth: f32) -> bool {
        depth <= self.depth_buffer[index]
    }

    /// 同时写入深度与颜色，调用方须先通过深度测试
    #[inline]
    pub fn write_fragment(&mut self, index: usize, depth: f32, color: Color) {
        debug_assert!(self.passes_depth_test(index, depth));
        self.depth_buffer[index] = depth;
        self.color_buffer[index] = color;
    }

    pub fn color_buffer(&self) -> &[Color] {
        &self.color_buffer
    }

    /// 获取颜色缓冲区的RGB8字节数据（行优先）
    pub fn get_color_buffer_bytes(&self) -> Vec<u8> {
        self.color_buffer.iter().flat_map(color_to_u8).collect()
    }
}

#[cfg(test)]
impl FrameBuffer {
    pub fn color_at(&self, x: usize, y: usize) -> Color {
        self.color_buffer[self.index(x, y)]
    }

    pub fn depth_at(&self, x: usize, y: usize) -> f32 {
        self.depth_buffer[self.index(x, y)]
    }

    pub fn depth_buffer(&self) -> &[f32] {
        &self.depth_buffer
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_buffer_is_black_and_far() {
        let fb = FrameBuffer::new(4, 3);
        assert_eq!(fb.color_buffer().len(), 12);
        assert_eq!(fb.depth_buffer().len(), 12);
        assert!(fb.color_buffer().iter().all(|c| *c == Color::zeros()));
        assert!(fb.depth_buffer().iter().all(|&d| d == f32::MAX));
    }

    #[test]
    fn depth_test_accepts_equal_depth() {
        let mut fb = FrameBuffer::new(2, 2);
        let index = fb.index(1, 1);
        fb.write_fragment(index, 0.5, Color::new(1.0, 0.0, 0.0));
        assert!(fb.passes_depth_test(index, 0.5));
        assert!(fb.passes_depth_test(index, 0.25));
        assert!(!fb.passes_depth_test(index, 0.75));
        assert!(!fb.passes_depth_test(index, f32::NAN));
    }

    #[test]
    fn write_updates_depth_and_color_together() {
        let mut fb = FrameBuffer::new(3, 2);
        let index = fb.index(2, 1);
        assert_eq!(index, 5);
        fb.write_fragment(index, 0.3, Color::new(0.0, 1.0, 0.0));
        assert_eq!(fb.depth_at(2, 1), 0.3);
        assert_eq!(fb.color_at(2, 1), Color::new(0.0, 1.0, 0.0));
        assert_eq!(fb.depth_at(1, 1), f32::MAX);
    }

    #[test]
    fn bytes_are_row_major_rgb() {
        let mut fb = FrameBuffer::new(2, 1);
        let index = fb.index(1, 0);
        fb.write_fragment(index, 0.0, Color::new(1.0, 0.5, 0.0));
        assert_eq!(fb.get_color_buffer_bytes(), vec![0, 0, 0, 255, 127, 0]);
    }
}
