//! Image I/O

use crate::common::*;
use crate::geometry::*;
use crate::spectrum::*;
use byteorder::{BigEndian, LittleEndian, ReadBytesExt, WriteBytesExt};
use exr::prelude as exrs;
use exr::prelude::*;
use image::{ImageBuffer, ImageFormat, Rgb, RgbImage};
use regex::Regex;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use std::result::Result;
use std::sync::OnceLock;

/// Stores RGB image data in row-major order, top row first.
#[derive(Clone, Debug)]
pub struct RGBImage {
    /// The pixels.
    pub pixels: Vec<Spectrum>,

    /// Image resolution.
    pub resolution: Point2<usize>,
}

impl RGBImage {
    /// Creates a new `RGBImage` from pixel data.
    ///
    /// * `pixels` - RGB pixel data.
    /// * `width`  - Width of image.
    /// * `height` - Height of image.
    pub fn new(pixels: Vec<Spectrum>, width: usize, height: usize) -> Self {
        assert_eq!(width * height, pixels.len());
        Self {
            pixels,
            resolution: Point2::new(width, height),
        }
    }

    /// Returns the pixel at (`x`, `y`), wrapping coordinates outside the
    /// image.
    ///
    /// * `x` - Column.
    /// * `y` - Row.
    pub fn texel(&self, x: isize, y: isize) -> Spectrum {
        let w = self.resolution.x as isize;
        let h = self.resolution.y as isize;
        let (x, y) = (x.rem_euclid(w), y.rem_euclid(h));
        self.pixels[(y * w + x) as usize]
    }
}

/// Read an image.
///
/// * `path` - Input file path.
pub fn read_image(path: &Path) -> Result<RGBImage, String> {
    let name = path.to_string_lossy();
    match get_extension_from_filename(&name) {
        Some(".exr") => read_exr(path),
        Some(".pfm") => read_pfm(path),
        Some(_extension) => read_8_bit(path),
        None => Err(format!("Can't determine file type from suffix of filename {name}.")),
    }
}

/// Read a single layer OpenEXR file.
///
/// * `path` - Input file path.
fn read_exr(path: &Path) -> Result<RGBImage, String> {
    let reader = exrs::read()
        .no_deep_data()
        .largest_resolution_level()
        .rgba_channels(
            |resolution, _channels| {
                let width = resolution.width();
                let height = resolution.height();
                RGBImage::new(vec![Spectrum::ZERO; width * height], width, height)
            },
            |img, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                let offset = position.y() * img.resolution.x + position.x();
                img.pixels[offset] = Spectrum::rgb(r, g, b);
            },
        )
        .first_valid_layer()
        .all_attributes();

    match reader.from_file(path) {
        Ok(image) => {
            let pixels = image.layer_data.channel_data.pixels;
            info!(
                "Read EXR image {} ({} x {})",
                path.display(),
                pixels.resolution.x,
                pixels.resolution.y,
            );
            Ok(pixels)
        }
        Err(err) => Err(format!("read_exr(): error reading '{}': {err}", path.display())),
    }
}

// Reads a whitespace terminated "word" of at most `len` bytes.
//
// * `r`   - Reader.
// * `len` - Maximum number of bytes to read.
fn read_pfm_word<R: Read>(r: &mut R, len: usize) -> Result<String, String> {
    let mut s = String::new();
    loop {
        let c = r.read_u8().map_err(|e| format!("read_pfm_word(): {e}"))? as char;
        if c == ' ' || c == '\n' || c == '\t' {
            return Ok(s);
        }
        if s.len() == len {
            return Err("read_pfm_word(): filled buffer before finding whitespace.".to_string());
        }
        s.push(c);
    }
}

/// Read a PFM (Portable FloatMap) file.
///
/// * `path` - Input file path.
fn read_pfm(path: &Path) -> Result<RGBImage, String> {
    let file = File::open(path).map_err(|e| format!("read_pfm(): error reading '{}': {e}", path.display()))?;
    let mut r = BufReader::new(file);

    let n_channels = match read_pfm_word(&mut r, 2)?.as_str() {
        "Pf" => 1,
        "PF" => 3,
        s => return Err(format!("read_pfm(): invalid PFM type '{s}'")),
    };

    let width = read_pfm_word(&mut r, 80)?
        .parse::<usize>()
        .map_err(|e| format!("read_pfm(): error parsing width: {e}"))?;
    let height = read_pfm_word(&mut r, 80)?
        .parse::<usize>()
        .map_err(|e| format!("read_pfm(): error parsing height: {e}"))?;
    let scale = read_pfm_word(&mut r, 80)?
        .parse::<f32>()
        .map_err(|e| format!("read_pfm(): error parsing scale: {e}"))?;

    // Negative scale means little endian data.
    let little_endian = scale < 0.0;
    let scale = scale.abs();

    // Rows are stored bottom to top.
    let mut data = vec![0.0_f32; n_channels * width * height];
    for y in (0..height).rev() {
        let row = &mut data[y * width * n_channels..(y + 1) * width * n_channels];
        if little_endian {
            r.read_f32_into::<LittleEndian>(row)
        } else {
            r.read_f32_into::<BigEndian>(row)
        }
        .map_err(|e| format!("read_pfm(): error reading pixel data row {y}: {e}"))?;
    }

    let pixels = (0..width * height)
        .map(|i| {
            if n_channels == 1 {
                Spectrum::new(data[i] * scale)
            } else {
                Spectrum::rgb(data[3 * i], data[3 * i + 1], data[3 * i + 2]) * scale
            }
        })
        .collect();

    info!("Read PFM image {} ({width} x {height} x {n_channels})", path.display());
    Ok(RGBImage::new(pixels, width, height))
}

/// Read an 8-bit image format, converting sRGB values to linear.
///
/// * `path` - Input file path.
fn read_8_bit(path: &Path) -> Result<RGBImage, String> {
    let img: RgbImage = image::open(path)
        .map_err(|e| format!("read_8_bit(): error reading '{}': {e}", path.display()))?
        .into_rgb8();

    let width = img.width() as usize;
    let height = img.height() as usize;
    let pixels = img
        .pixels()
        .map(|p| {
            Spectrum::rgb(
                inv_gamma_correct(p[0] as Float / 255.0),
                inv_gamma_correct(p[1] as Float / 255.0),
                inv_gamma_correct(p[2] as Float / 255.0),
            )
        })
        .collect();

    info!("Read 8-bit image {} ({width} x {height})", path.display());
    Ok(RGBImage::new(pixels, width, height))
}

/// Write interleaved RGB data to the given path. The format is chosen from the
/// file extension: `.exr`, `.pfm`, `.png` or `.tga`.
///
/// * `path`   - Output file path.
/// * `rgb`    - Floating point RGB pixel data, top row first.
/// * `width`  - Width of the image.
/// * `height` - Height of the image.
pub fn write_image(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<(), String> {
    assert_eq!(rgb.len(), 3 * width * height);

    match get_extension_from_filename(path) {
        Some(".exr") => write_exr(path, rgb, width, height),
        Some(".tga") => write_8_bit(path, rgb, width, height, ImageFormat::Tga),
        Some(".png") => write_8_bit(path, rgb, width, height, ImageFormat::Png),
        Some(".pfm") => write_pfm(path, rgb, width, height),
        Some(extension) => Err(format!("Extension {extension} is not supported")),
        None => Err(format!("Can't determine file type from suffix of filename {path}")),
    }
}

/// Returns regular expression for extracting the file extension. This will
/// match the last occurrence of a period followed by no periods or slashes.
fn regex_file_ext() -> &'static Regex {
    static DATA: OnceLock<Regex> = OnceLock::new();
    DATA.get_or_init(|| Regex::new(r"(\.[^./\\]+)$").expect("valid extension regex"))
}

/// Retrieve the extension from a file path.
///
/// * `path` - The file path.
fn get_extension_from_filename(path: &str) -> Option<&str> {
    regex_file_ext().captures(path).and_then(|c| c.get(1)).map(|m| m.as_str())
}

/// Writes the image in OpenEXR format.
///
/// * `path`   - Output file path.
/// * `rgb`    - Floating point RGB pixel data.
/// * `width`  - Width of the image.
/// * `height` - Height of the image.
fn write_exr(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let size = Vec2(width, height);
    let layer = Layer::new(
        size,
        LayerAttributes::named("render"),
        Encoding::SMALL_LOSSLESS,
        SpecificChannels::rgb(|pos: Vec2<usize>| {
            let offset = 3 * (pos.1 * width + pos.0);
            (rgb[offset], rgb[offset + 1], rgb[offset + 2])
        }),
    );

    let attributes = ImageAttributes::new(IntegerBounds::from_dimensions(size));
    Image::empty(attributes)
        .with_layer(layer)
        .write()
        .to_file(path)
        .map_err(|e| format!("Error saving output image {path}: {e}"))
}

/// Writes the image in an 8-bit image format.
///
/// * `path`         - Output file path.
/// * `rgb`          - Floating point RGB pixel data.
/// * `width`        - Width of the image.
/// * `height`       - Height of the image.
/// * `image_format` - Image format.
fn write_8_bit(path: &str, rgb: &[Float], width: usize, height: usize, image_format: ImageFormat) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let imgbuf = ImageBuffer::from_fn(width as u32, height as u32, |x, y| {
        let offset = 3 * (y as usize * width + x as usize);
        Rgb([
            clamp_byte(rgb[offset]),
            clamp_byte(rgb[offset + 1]),
            clamp_byte(rgb[offset + 2]),
        ])
    });

    imgbuf
        .save_with_format(path, image_format)
        .map_err(|e| format!("Error saving output image {path}: {e}."))
}

/// Writes the image in PFM (Portable FloatMap) format.
///
/// * `path`   - Output file path.
/// * `rgb`    - Floating point RGB pixel data.
/// * `width`  - Width of the image.
/// * `height` - Height of the image.
fn write_pfm(path: &str, rgb: &[Float], width: usize, height: usize) -> Result<(), String> {
    info!("Writing image {path} with resolution {width}x{height}");

    let file = File::create(path).map_err(|e| format!("write_pfm(): error writing '{path}': {e}"))?;
    let mut w = BufWriter::new(file);

    // Three channels; a negative scale marks little endian data.
    write!(w, "PF\n{width} {height}\n-1\n").map_err(|e| format!("write_pfm(): error writing '{path}': {e}"))?;

    // Rows are written bottom to top.
    for y in (0..height).rev() {
        for v in &rgb[3 * y * width..3 * (y + 1) * width] {
            w.write_f32::<LittleEndian>(*v)
                .map_err(|e| format!("write_pfm(): error writing pixels '{path}': {e}"))?;
        }
    }

    w.flush().map_err(|e| format!("write_pfm(): error writing '{path}': {e}"))
}

/// Clamp a gamma corrected floating point value to 8-bit range [0, 255].
///
/// * `v` - Value to clamp.
#[inline]
fn clamp_byte(v: Float) -> u8 {
    clamp(255.0 * gamma_correct(v) + 0.5, 0.0, 255.0) as u8
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extensions() {
        assert_eq!(get_extension_from_filename("a/b.c/image.png"), Some(".png"));
        assert_eq!(get_extension_from_filename("image.tar.exr"), Some(".exr"));
        assert_eq!(get_extension_from_filename("a.b/image"), None);
    }

    #[test]
    fn unsupported_extension() {
        assert!(write_image("out.bmpx", &[0.0; 3], 1, 1).is_err());
    }

    #[test]
    fn pfm_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.pfm");
        let rgb: Vec<Float> = (0..18).map(|i| i as Float * 0.25).collect();
        write_image(path.to_str().unwrap(), &rgb, 3, 2).unwrap();

        let img = read_image(&path).unwrap();
        assert_eq!(img.resolution, Point2::new(3, 2));
        assert_eq!(img.pixels[4], Spectrum::rgb(3.0, 3.25, 3.5));
        assert_eq!(img.texel(-2, 3), img.pixels[4]);
    }

    #[test]
    fn png_write_and_read() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("img.png");
        let rgb = [1.0, 0.0, 0.0, 0.0, 0.0, 1.0];
        write_image(path.to_str().unwrap(), &rgb, 2, 1).unwrap();

        let img = read_image(&path).unwrap();
        let close = |a: Spectrum, b: Spectrum| (0..3).all(|i| (a[i] - b[i]).abs() < 1e-4);
        assert!(close(img.pixels[0], Spectrum::rgb(1.0, 0.0, 0.0)));
        assert!(close(img.pixels[1], Spectrum::rgb(0.0, 0.0, 1.0)));
    }
}
