// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Stamp rasters: decode PNG/JPEG/etc. into colour samples plus an optional
// alpha mask, the shape both the page writer and the compositor consume.

use std::path::Path;

use image::DynamicImage;
use sealdoc_core::error::{Result, SealdocError};
use tracing::{debug, instrument};

/// A decoded raster split into 8-bit RGB samples and an optional 8-bit
/// alpha mask.
///
/// Any source with an alpha channel (RGBA, LA, or a palette PNG with a
/// transparency entry, which the decoder expands to RGBA) keeps its mask;
/// everything else is treated as fully opaque.
#[derive(Clone)]
pub struct StampRaster {
    width: u32,
    height: u32,
    rgb: Vec<u8>,
    alpha: Option<Vec<u8>>,
}

impl StampRaster {
    /// Decode a raster from encoded bytes.
    #[instrument(skip(data), fields(data_len = data.len()))]
    pub fn decode(data: &[u8]) -> Result<Self> {
        let img = image::load_from_memory(data)
            .map_err(|err| SealdocError::ImageDecode(format!("failed to decode image: {}", err)))?;
        Ok(Self::from_dynamic(img))
    }

    /// Read and decode a raster file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let img = image::open(path.as_ref()).map_err(|err| {
            SealdocError::ImageDecode(format!(
                "failed to open {}: {}",
                path.as_ref().display(),
                err
            ))
        })?;
        Ok(Self::from_dynamic(img))
    }

    /// Split an already-decoded image.
    pub fn from_dynamic(img: DynamicImage) -> Self {
        let (width, height) = (img.width(), img.height());

        let raster = if img.color().has_alpha() {
            let rgba = img.to_rgba8();
            let pixel_count = (width as usize) * (height as usize);
            let mut rgb = Vec::with_capacity(pixel_count * 3);
            let mut alpha = Vec::with_capacity(pixel_count);
            for pixel in rgba.pixels() {
                let image::Rgba([r, g, b, a]) = *pixel;
                rgb.extend_from_slice(&[r, g, b]);
                alpha.push(a);
            }
            Self {
                width,
                height,
                rgb,
                alpha: Some(alpha),
            }
        } else {
            Self {
                width,
                height,
                rgb: img.to_rgb8().into_raw(),
                alpha: None,
            }
        };

        debug!(
            width,
            height,
            has_alpha = raster.alpha.is_some(),
            "Stamp raster decoded"
        );
        raster
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn has_alpha(&self) -> bool {
        self.alpha.is_some()
    }

    /// Row-major RGB samples, three bytes per pixel.
    pub fn rgb(&self) -> &[u8] {
        &self.rgb
    }

    /// Row-major alpha samples, one byte per pixel, if the source had any.
    pub fn alpha(&self) -> Option<&[u8]> {
        self.alpha.as_deref()
    }

    /// Interleaved RGBA samples; opaque rasters get alpha 255 everywhere.
    pub fn to_rgba(&self) -> Vec<u8> {
        let mut rgba = Vec::with_capacity(self.rgb.len() / 3 * 4);
        for (index, rgb) in self.rgb.chunks_exact(3).enumerate() {
            rgba.extend_from_slice(rgb);
            rgba.push(self.alpha.as_ref().map_or(255, |alpha| alpha[index]));
        }
        rgba
    }
}

impl std::fmt::Debug for StampRaster {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StampRaster")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("has_alpha", &self.has_alpha())
            .finish()
    }
}
