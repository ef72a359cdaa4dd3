/// Motion-capture importer (VMD bone frames)
///
/// Layout, little-endian:
/// - 25-byte magic, 5 padding bytes, 20-byte model name
/// - u32 frame count
/// - per frame: 15-byte bone name, u32 frame index, 3 x f32 position,
///   4 x f32 rotation, 4 x 16-byte interpolation blocks
///
/// Positions flip Z and rotations negate X/Y to convert handedness.

use glam::{Quat, Vec3};
use crate::error::{Error, Result};
use crate::math::Bezier;
use crate::animation::{Animation, Bone, BoneInterpolation};

/// File magic
pub const VMD_MAGIC: &[u8; 25] = b"Vocaloid Motion Data 0002";

const HEADER_PADDING: usize = 5;
const MODEL_NAME_SIZE: usize = 20;
const BONE_NAME_SIZE: usize = 15;
const INTERPOLATION_BLOCK_SIZE: usize = 16;

/// Bytes per bone frame record
pub const VMD_FRAME_SIZE: usize = BONE_NAME_SIZE + 4 + 4 * 7 + INTERPOLATION_BLOCK_SIZE * 4;

/// Import settings
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnimationImportConfig {
    /// Engine time units per motion frame
    pub ticks_per_frame: u32,
}

impl Default for AnimationImportConfig {
    fn default() -> Self {
        Self { ticks_per_frame: 60 }
    }
}

struct ByteReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> ByteReader<'a> {
    fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    fn remaining(&self) -> usize {
        self.data.len() - self.offset
    }

    fn take(&mut self, count: usize) -> Result<&'a [u8]> {
        if self.remaining() < count {
            return Err(Error::InvalidFormat(format!(
                "unexpected end of data at offset {} (need {} bytes)", self.offset, count)));
        }
        let bytes = &self.data[self.offset..self.offset + count];
        self.offset += count;
        Ok(bytes)
    }

    fn skip(&mut self, count: usize) -> Result<()> {
        self.take(count).map(|_| ())
    }

    fn read_u32(&mut self) -> Result<u32> {
        let b = self.take(4)?;
        Ok(u32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_f32(&mut self) -> Result<f32> {
        let b = self.take(4)?;
        Ok(f32::from_le_bytes([b[0], b[1], b[2], b[3]]))
    }

    fn read_bezier(&mut self) -> Result<Bezier> {
        let b = self.take(INTERPOLATION_BLOCK_SIZE)?;
        let c = |byte: u8| (byte as i8) as f32 / 128.0;
        Ok(Bezier::new(c(b[0]), c(b[4]), c(b[8]), c(b[12])))
    }
}

/// Fixed-width name, cut at the first NUL
///
/// Names that are not UTF-8 (Shift-JIS exports) map each byte to a char so
/// distinct names stay distinct.
fn bone_name(raw: &[u8]) -> String {
    let end = raw.iter().position(|&b| b == 0).unwrap_or(raw.len());
    let raw = &raw[..end];
    match std::str::from_utf8(raw) {
        Ok(name) => name.to_string(),
        Err(_) => raw.iter().map(|&b| b as char).collect(),
    }
}

/// Parse a VMD motion into an `Animation`
///
/// The whole frame table is size-checked before any frame is read.
pub fn load_vmd(data: &[u8], config: &AnimationImportConfig) -> Result<Animation> {
    let mut reader = ByteReader::new(data);

    if reader.take(VMD_MAGIC.len()).ok() != Some(&VMD_MAGIC[..]) {
        return Err(Error::InvalidFormat("not a VMD motion (bad magic)".to_string()));
    }
    reader.skip(HEADER_PADDING + MODEL_NAME_SIZE)?;

    let frames_count = reader.read_u32()? as usize;
    let required = frames_count.checked_mul(VMD_FRAME_SIZE).ok_or_else(|| {
        Error::InvalidFormat(format!("frame count {} overflows", frames_count))
    })?;
    if reader.remaining() < required {
        return Err(Error::InvalidFormat(format!(
            "{} frames need {} bytes, only {} left", frames_count, required, reader.remaining())));
    }

    let mut animation = Animation::new();
    for _ in 0..frames_count {
        let name = bone_name(reader.take(BONE_NAME_SIZE)?);
        let frame = reader.read_u32()?;

        let x = reader.read_f32()?;
        let y = reader.read_f32()?;
        let z = reader.read_f32()?;
        let pos = Vec3::new(x, y, -z);

        let rx = reader.read_f32()?;
        let ry = reader.read_f32()?;
        let rz = reader.read_f32()?;
        let rw = reader.read_f32()?;
        let rot = Quat::from_xyzw(-rx, -ry, rz, rw);

        let interpolation = BoneInterpolation {
            pos_x: reader.read_bezier()?,
            pos_y: reader.read_bezier()?,
            pos_z: reader.read_bezier()?,
            rot: reader.read_bezier()?,
        };

        let idx = animation.add_bone(&name);
        let time = frame.saturating_mul(config.ticks_per_frame);
        animation.add_bone_frame_with_interpolation(idx, time, Bone { pos, rot }, interpolation);
    }

    crate::engine_debug!("lumen3d::AnimationLoader",
        "Loaded VMD motion: {} frames, {} bones, duration {}",
        frames_count, animation.bones_count(), animation.duration());

    Ok(animation)
}

#[cfg(test)]
#[path = "vmd_tests.rs"]
mod tests;
