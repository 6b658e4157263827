//! UPI payment QR rendering.
//!
//! ```text
//! upi://pay?pa=...  ──► QR (EC level M) ──► 8 px modules
//!                                           + 2-module white border
//!                                           ──► PNG ──► data:image/png;base64,...
//! ```

use std::io::Cursor;

use base64::{engine::general_purpose::STANDARD, Engine};
use image::{imageops, DynamicImage, ImageBuffer, ImageFormat, Luma};
use qrcode::{EcLevel, QrCode};

use crate::error::ApiError;

/// Pixels per QR module.
pub const MODULE_PX: u32 = 8;

/// Border width in modules.
pub const BORDER_MODULES: u32 = 2;

#[derive(Debug, thiserror::Error)]
pub enum QrRenderError {
    #[error("Payment link too long for a QR code: {0}")]
    Encode(String),

    #[error("PNG encoding failed: {0}")]
    Image(#[from] image::ImageError),
}

impl From<QrRenderError> for ApiError {
    fn from(error: QrRenderError) -> Self {
        match error {
            QrRenderError::Encode(_) => ApiError::bad_request("PAYLOAD_TOO_LONG", error.to_string()),
            QrRenderError::Image(e) => ApiError::Persistence(e.to_string()),
        }
    }
}

/// Renders `data` as a PNG QR code.
pub fn render_png(data: &str) -> Result<Vec<u8>, QrRenderError> {
    let code = QrCode::with_error_correction_level(data.as_bytes(), EcLevel::M)
        .map_err(|e| QrRenderError::Encode(e.to_string()))?;

    let modules = code
        .render::<Luma<u8>>()
        .quiet_zone(false)
        .module_dimensions(MODULE_PX, MODULE_PX)
        .build();

    let border = BORDER_MODULES * MODULE_PX;
    let mut canvas = ImageBuffer::from_pixel(
        modules.width() + 2 * border,
        modules.height() + 2 * border,
        Luma([255u8]),
    );
    imageops::overlay(&mut canvas, &modules, i64::from(border), i64::from(border));

    let mut png = Vec::new();
    DynamicImage::ImageLuma8(canvas).write_to(&mut Cursor::new(&mut png), ImageFormat::Png)?;
    Ok(png)
}

/// Renders `data` as a QR code and wraps the PNG in a data URL.
pub fn render_data_url(data: &str) -> Result<String, QrRenderError> {
    let png = render_png(data)?;
    Ok(format!("data:image/png;base64,{}", STANDARD.encode(png)))
}
