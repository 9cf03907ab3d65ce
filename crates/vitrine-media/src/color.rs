use std::fmt;

use image::imageops::FilterType;
use image::DynamicImage;
use serde::{Serialize, Serializer};

use crate::error::MediaError;

/// Side length of the thumbnail the dominant color is computed from.
const SAMPLE_SIZE: u32 = 32;
const MIN_ALPHA: u8 = 128;
const MIN_VALUE: f64 = 0.2;
const MAX_VALUE: f64 = 0.95;
const MIN_SATURATION: f64 = 0.15;
/// Luma above which dark text reads better than white.
const LIGHT_LUMA: f64 = 180.0;

pub const DARK_TEXT: &str = "#0b0f14";
pub const LIGHT_TEXT: &str = "#ffffff";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parses `#rrggbb` or `rrggbb`, case-insensitive.
    #[must_use]
    pub fn from_hex(raw: &str) -> Option<Self> {
        let hex = raw.strip_prefix('#').unwrap_or(raw);
        if hex.len() != 6 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
        Some(Self::new(channel(0)?, channel(2)?, channel(4)?))
    }

    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }

    /// Approximate relative luminance on a 0-255 scale.
    #[must_use]
    pub fn luma(self) -> f64 {
        0.2126 * f64::from(self.r) + 0.7152 * f64::from(self.g) + 0.0722 * f64::from(self.b)
    }

    /// Foreground color readable on top of this one.
    #[must_use]
    pub fn contrast(self) -> &'static str {
        if self.luma() > LIGHT_LUMA {
            DARK_TEXT
        } else {
            LIGHT_TEXT
        }
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

/// Foreground color for text on `hex`. Malformed input yields white.
#[must_use]
pub fn contrast_color(hex: &str) -> &'static str {
    Rgb::from_hex(hex).map_or(LIGHT_TEXT, Rgb::contrast)
}

#[derive(Default)]
struct Accumulator {
    r: u32,
    g: u32,
    b: u32,
    count: u32,
}

impl Accumulator {
    fn add(&mut self, r: u8, g: u8, b: u8) {
        self.r += u32::from(r);
        self.g += u32::from(g);
        self.b += u32::from(b);
        self.count += 1;
    }

    fn average(&self) -> Option<Rgb> {
        if self.count == 0 {
            return None;
        }
        // round half up
        let avg = |sum: u32| {
            u8::try_from((sum * 2 + self.count) / (self.count * 2)).unwrap_or(u8::MAX)
        };
        Some(Rgb::new(avg(self.r), avg(self.g), avg(self.b)))
    }
}

/// Average color of the vivid pixels of `image`.
///
/// The image is downscaled to 32x32. Pixels with alpha below 128 are ignored,
/// as are pixels that are too dark, too bright or too grey. When nothing
/// qualifies, every pixel is averaged instead.
#[must_use]
pub fn dominant_color(image: &DynamicImage) -> Rgb {
    let thumb = image
        .resize_exact(SAMPLE_SIZE, SAMPLE_SIZE, FilterType::Triangle)
        .to_rgba8();

    let mut vivid = Accumulator::default();
    let mut all = Accumulator::default();
    for px in thumb.pixels() {
        let [r, g, b, a] = px.0;
        all.add(r, g, b);
        if a < MIN_ALPHA {
            continue;
        }
        let max = r.max(g).max(b);
        let min = r.min(g).min(b);
        let value = f64::from(max) / 255.0;
        let saturation = if max == 0 {
            0.0
        } else {
            f64::from(max - min) / f64::from(max)
        };
        if (MIN_VALUE..=MAX_VALUE).contains(&value) && saturation >= MIN_SATURATION {
            vivid.add(r, g, b);
        }
    }

    vivid
        .average()
        .or_else(|| all.average())
        .unwrap_or(Rgb::new(0, 0, 0))
}

/// Decodes `bytes` (PNG, GIF or JPEG) and computes its dominant color.
///
/// # Errors
///
/// Returns [`MediaError::Decode`] if the bytes are not a supported image.
pub fn dominant_color_from_bytes(bytes: &[u8]) -> Result<Rgb, MediaError> {
    let image = image::load_from_memory(bytes)?;
    Ok(dominant_color(&image))
}
