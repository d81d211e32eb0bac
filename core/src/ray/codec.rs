//! Ray Codec
//!
//! Compressed records drop the intersection result entirely and narrow the
//! pixel/sample/depth bookkeeping to the smallest integers the supported
//! image sizes allow. Every field read downstream survives a round trip
//! unchanged.

use super::*;
use byteorder::{ByteOrder, LittleEndian, WriteBytesExt};
use std::io::{self, Write};

/// Largest pixel coordinate, sample index or depth a compressed record can
/// store.
pub const MAX_COMPRESSED_INDEX: u32 = u16::MAX as u32;

/// Largest bounce depth a compressed record can store.
pub const MAX_COMPRESSED_DEPTH: u32 = u8::MAX as u32;

/// The persisted form of a ray.
#[derive(Copy, Clone, Debug, Default, PartialEq)]
pub struct CompressedRay {
    /// Origin.
    pub origin: [f32; 3],

    /// Direction.
    pub direction: [f32; 3],

    /// Start of the parametric interval.
    pub t_min: f32,

    /// End of the parametric interval.
    pub t_max: f32,

    /// Accumulated path weight.
    pub throughput: [f32; 3],

    /// Owning pixel (x, y).
    pub pixel: [u16; 2],

    /// Sample index within the pixel.
    pub sample: u16,

    /// Bounce depth.
    pub depth: u8,

    /// Bits of `RayFlags`.
    pub flags: u8,
}

impl CompressedRay {
    /// Size in bytes of one record in a batch file.
    pub const SIZE: usize = 4 * 3 + 4 * 3 + 4 + 4 + 4 * 3 + 2 * 2 + 2 + 1 + 1;

    /// Write the record in little endian byte order.
    ///
    /// * `w` - The writer.
    pub fn write<W: Write>(&self, w: &mut W) -> io::Result<()> {
        for v in self.origin.iter().chain(self.direction.iter()) {
            w.write_f32::<LittleEndian>(*v)?;
        }
        w.write_f32::<LittleEndian>(self.t_min)?;
        w.write_f32::<LittleEndian>(self.t_max)?;
        for v in self.throughput.iter() {
            w.write_f32::<LittleEndian>(*v)?;
        }
        w.write_u16::<LittleEndian>(self.pixel[0])?;
        w.write_u16::<LittleEndian>(self.pixel[1])?;
        w.write_u16::<LittleEndian>(self.sample)?;
        w.write_u8(self.depth)?;
        w.write_u8(self.flags)
    }

    /// Read a record from exactly `SIZE` bytes.
    ///
    /// * `bytes` - The record bytes.
    pub fn read(bytes: &[u8]) -> Self {
        assert_eq!(bytes.len(), Self::SIZE, "compressed ray record has wrong size");
        let f = |i: usize| LittleEndian::read_f32(&bytes[4 * i..4 * i + 4]);
        Self {
            origin: [f(0), f(1), f(2)],
            direction: [f(3), f(4), f(5)],
            t_min: f(6),
            t_max: f(7),
            throughput: [f(8), f(9), f(10)],
            pixel: [
                LittleEndian::read_u16(&bytes[44..46]),
                LittleEndian::read_u16(&bytes[46..48]),
            ],
            sample: LittleEndian::read_u16(&bytes[48..50]),
            depth: bytes[50],
            flags: bytes[51],
        }
    }
}

impl From<&Ray> for CompressedRay {
    /// Encode a working ray. The hit result is not persisted.
    ///
    /// * `ray` - The ray.
    fn from(ray: &Ray) -> Self {
        assert!(
            ray.pixel_x <= MAX_COMPRESSED_INDEX
                && ray.pixel_y <= MAX_COMPRESSED_INDEX
                && ray.sample <= MAX_COMPRESSED_INDEX
                && ray.depth <= MAX_COMPRESSED_DEPTH,
            "{ray} exceeds the compressed record range"
        );
        Self {
            origin: ray.o.to_array(),
            direction: ray.d.to_array(),
            t_min: ray.t_min,
            t_max: ray.t_max,
            throughput: ray.throughput.to_rgb(),
            pixel: [ray.pixel_x as u16, ray.pixel_y as u16],
            sample: ray.sample as u16,
            depth: ray.depth as u8,
            flags: ray.flags.bits(),
        }
    }
}

impl From<&CompressedRay> for Ray {
    /// Decode a persisted record into a working ray awaiting intersection.
    ///
    /// * `c` - The compressed record.
    fn from(c: &CompressedRay) -> Self {
        Self {
            o: Point3f::from(c.origin),
            d: Vector3f::from(c.direction),
            t_min: c.t_min,
            t_max: c.t_max,
            throughput: Spectrum::from(c.throughput),
            pixel_x: c.pixel[0] as u32,
            pixel_y: c.pixel[1] as u32,
            sample: c.sample as u32,
            depth: c.depth as u32,
            flags: RayFlags::from_bits_truncate(c.flags),
            hit: None,
        }
    }
}

/// Encode a working ray into its persisted form.
///
/// * `ray` - The ray.
#[inline]
pub fn encode(ray: &Ray) -> CompressedRay {
    CompressedRay::from(ray)
}

/// Decode a persisted ray into its working form.
///
/// * `c` - The compressed record.
#[inline]
pub fn decode(c: &CompressedRay) -> Ray {
    Ray::from(c)
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------
