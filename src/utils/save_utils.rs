use crate::core::frame_buffer::FrameBuffer;
use crate::error::Result;
use crate::material_system::color::color_to_u8;
use image::ColorType;
use log::info;
use std::fs;
use std::path::Path;

/// 将颜色缓冲编码为纯文本 PPM (P3)
///
/// 头部 `P3\n<宽> <高>\n255\n`，之后每个像素一行 `r g b`，行优先。
pub fn encode_ppm(frame_buffer: &FrameBuffer) -> String {
    let pixels = frame_buffer.color_buffer();
    // 每行最多 "255 255 255\n"
    let mut out = String::with_capacity(32 + pixels.len() * 12);
    out.push_str(&format!(
        "P3\n{} {}\n255\n",
        frame_buffer.width, frame_buffer.height
    ));
    for color in pixels {
        let [r, g, b] = color_to_u8(color);
        out.push_str(&format!("{} {} {}\n", r, g, b));
    }
    out
}

pub fn write_ppm<P: AsRef<Path>>(path: P, frame_buffer: &FrameBuffer) -> Result<()> {
    fs::write(path, encode_ppm(frame_buffer))?;
    Ok(())
}

/// 保存RGB8图像数据，格式由扩展名决定
pub fn save_image<P: AsRef<Path>>(path: P, data: &[u8], width: u32, height: u32) -> Result<()> {
    image::save_buffer(path, data, width, height, ColorType::Rgb8)?;
    Ok(())
}

/// 保存帧缓冲区：`.ppm` 走纯文本编码，其余扩展名交给 `image`
pub fn save_frame<P: AsRef<Path>>(path: P, frame_buffer: &FrameBuffer) -> Result<()> {
    let path = path.as_ref();
    let is_ppm = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("ppm"));

    if is_ppm {
        write_ppm(path, frame_buffer)?;
    } else {
        save_image(
            path,
            &frame_buffer.get_color_buffer_bytes(),
            frame_buffer.width as u32,
            frame_buffer.height as u32,
        )?;
    }

    info!(
        "图像已保存到 {} ({}x{})",
        path.display(),
        frame_buffer.width,
        frame_buffer.height
    );
    Ok(())
}
