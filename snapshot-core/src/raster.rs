use png::{BitDepth, ColorType, Encoder};

use crate::error::SnapshotError;

/// RGBA8 pixels read back from the renderer's canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Raster {
    width: u32,
    height: u32,
    rgba: Vec<u8>,
}

impl Raster {
    pub fn new(width: u32, height: u32, rgba: Vec<u8>) -> Result<Self, SnapshotError> {
        if width == 0 || height == 0 {
            return Err(SnapshotError::EmptyRaster { width, height });
        }
        let expected = width as usize * height as usize * 4;
        if rgba.len() != expected {
            return Err(SnapshotError::BufferSize {
                expected,
                actual: rgba.len(),
            });
        }
        Ok(Raster { width, height, rgba })
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Encode as PNG. Same pixels always give the same bytes.
    pub fn encode_png(&self) -> Result<Vec<u8>, SnapshotError> {
        let mut buf = Vec::new();
        {
            let mut enc = Encoder::new(&mut buf, self.width, self.height);
            enc.set_color(ColorType::Rgba);
            enc.set_depth(BitDepth::Eight);
            let mut writer = enc.write_header()?;
            writer.write_image_data(&self.rgba)?;
            writer.finish()?;
        }
        Ok(buf)
    }
}
