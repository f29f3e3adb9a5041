use crate::error::ProductibleError;
use image::{DynamicImage, Rgb, RgbImage};

/// A decoded logo, flattened onto white as 8-bit RGB samples.
#[derive(Debug, Clone)]
pub struct Logo {
    pub width: u32,
    pub height: u32,
    pub rgb: Vec<u8>,
}

impl Logo {
    /// Decode a JPEG or PNG logo.
    pub fn from_bytes(bytes: &[u8]) -> Result<Logo, ProductibleError> {
        let decoded = image::load_from_memory(bytes).map_err(|e| {
            ProductibleError::InvalidInput(format!("logo could not be decoded: {e}"))
        })?;
        let rgb = flatten_on_white(decoded);
        log::debug!("logo decoded at {}x{}", rgb.width(), rgb.height());
        Ok(Logo {
            width: rgb.width(),
            height: rgb.height(),
            rgb: rgb.into_raw(),
        })
    }
}

/// Blend any alpha channel against a white page.
fn flatten_on_white(image: DynamicImage) -> RgbImage {
    if !image.color().has_alpha() {
        return image.to_rgb8();
    }
    let rgba = image.to_rgba8();
    RgbImage::from_fn(rgba.width(), rgba.height(), |x, y| {
        let [r, g, b, a] = rgba.get_pixel(x, y).0;
        let blend = |c: u8| {
            let c = u16::from(c) * u16::from(a) + 255 * (255 - u16::from(a));
            (c / 255) as u8
        };
        Rgb([blend(r), blend(g), blend(b)])
    })
}
