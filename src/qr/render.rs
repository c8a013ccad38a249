//! QR 图像渲染
//!
//! 纠错等级 L，版本自动选择，黑码白底。带标签的版本在二维码下方
//! 追加白色文字区，用 8x8 点阵字体写入活动名、投放地点和 token。

use font8x8::{BASIC_FONTS, HIRAGANA_FONTS, LATIN_FONTS, UnicodeFonts};
use image::{GrayImage, Luma};
use qrcode::types::Color;
use qrcode::{EcLevel, QrCode};

use crate::config::QrConfig;
use crate::errors::{PrintlinkerError, Result};

const BLACK: Luma<u8> = Luma([0]);
const WHITE: Luma<u8> = Luma([255]);
const GLYPH_SIZE: u32 = 8;
/// 无法渲染的字符用 `?` 代替
const FALLBACK_GLYPH: char = '?';

/// 标签文字
#[derive(Debug, Clone)]
pub struct QrLabel<'a> {
    pub campaign_name: &'a str,
    pub location: &'a str,
    pub token: &'a str,
}

impl QrLabel<'_> {
    fn lines(&self) -> Vec<String> {
        vec![
            self.campaign_name.to_string(),
            self.location.to_string(),
            format!("ID: {}", self.token),
        ]
    }
}

/// Encode `url` into a bare black-on-white QR image.
pub fn render_bare(url: &str, config: &QrConfig) -> Result<GrayImage> {
    let code = QrCode::with_error_correction_level(url.as_bytes(), EcLevel::L)?;
    let width = code.width() as u32;
    let colors = code.to_colors();

    let module = config.module_size.max(1);
    let side = config
        .border
        .checked_mul(2)
        .and_then(|b| b.checked_add(width))
        .and_then(|n| n.checked_mul(module))
        .ok_or_else(|| PrintlinkerError::image_render("QR image dimensions overflow"))?;

    let mut img = GrayImage::from_pixel(side, side, WHITE);
    for (idx, color) in colors.iter().enumerate() {
        if *color != Color::Dark {
            continue;
        }
        let x = (idx as u32 % width + config.border) * module;
        let y = (idx as u32 / width + config.border) * module;
        fill_rect(&mut img, x, y, module, module);
    }
    Ok(img)
}

/// Encode `url` and append the text block below the code.
pub fn render_labeled(url: &str, label: &QrLabel<'_>, config: &QrConfig) -> Result<GrayImage> {
    let code_img = render_bare(url, config)?;
    let side = code_img.width();

    // 模块 10px 时字形放大 2 倍
    let scale = (config.module_size / 5).max(1);
    let glyph = GLYPH_SIZE * scale;
    let padding = glyph;
    let line_height = glyph + glyph / 2;
    let chars_per_line = (side.saturating_sub(2 * padding) / glyph).max(1) as usize;

    let lines: Vec<String> = label
        .lines()
        .iter()
        .flat_map(|line| wrap(line, chars_per_line))
        .collect();
    let label_height = padding * 2 + line_height * lines.len() as u32;

    let mut img = GrayImage::from_pixel(side, side + label_height, WHITE);
    image::imageops::replace(&mut img, &code_img, 0, 0);

    for (i, line) in lines.iter().enumerate() {
        let text_width = line.chars().count() as u32 * glyph;
        let x = side.saturating_sub(text_width) / 2;
        let y = side + padding + i as u32 * line_height;
        draw_text(&mut img, line, x, y, scale);
    }
    Ok(img)
}

/// 根据配置选择是否带标签
pub fn render(
    url: &str,
    campaign_name: &str,
    token: &str,
    location: &str,
    config: &QrConfig,
) -> Result<GrayImage> {
    if config.label {
        let label = QrLabel {
            campaign_name,
            location,
            token,
        };
        render_labeled(url, &label, config)
    } else {
        render_bare(url, config)
    }
}

fn fill_rect(img: &mut GrayImage, x: u32, y: u32, w: u32, h: u32) {
    for dy in 0..h {
        for dx in 0..w {
            if x + dx < img.width() && y + dy < img.height() {
                img.put_pixel(x + dx, y + dy, BLACK);
            }
        }
    }
}

fn glyph_for(c: char) -> [u8; 8] {
    BASIC_FONTS
        .get(c)
        .or_else(|| LATIN_FONTS.get(c))
        .or_else(|| HIRAGANA_FONTS.get(c))
        .or_else(|| BASIC_FONTS.get(FALLBACK_GLYPH))
        .unwrap_or([0; 8])
}

fn draw_text(img: &mut GrayImage, text: &str, x: u32, y: u32, scale: u32) {
    for (i, c) in text.chars().enumerate() {
        let origin_x = x + i as u32 * GLYPH_SIZE * scale;
        for (row, bits) in glyph_for(c).iter().enumerate() {
            for col in 0..GLYPH_SIZE {
                // bit 0 是最左侧像素
                if bits & (1 << col) != 0 {
                    fill_rect(
                        img,
                        origin_x + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                    );
                }
            }
        }
    }
}

/// 按字符数折行
fn wrap(line: &str, width: usize) -> Vec<String> {
    let chars: Vec<char> = line.chars().collect();
    if chars.is_empty() {
        return vec![String::new()];
    }
    chars.chunks(width).map(|c| c.iter().collect()).collect()
}
