//! Textures

mod system;

use crate::common::*;
use crate::geometry::*;
use crate::spectrum::*;
use std::path::PathBuf;

// Re-export
pub use system::*;

/// Spectrum valued texture evaluated at surface parameters.
#[derive(Clone, Debug, PartialEq)]
pub enum Texture {
    /// A single colour.
    Constant(Spectrum),

    /// Alternating squares of two colours with `scale` squares per unit of
    /// each surface parameter.
    Checkerboard {
        even: Spectrum,
        odd: Spectrum,
        scale: Float,
    },

    /// An image file, relative paths resolved against the asset root. The
    /// image is wrapped over [0, 1]^2 with v = 0 at the bottom row.
    Image(PathBuf),
}

impl Texture {
    /// Evaluate the texture.
    ///
    /// * `uv`       - Surface parameters.
    /// * `textures` - The calling worker's texture handle.
    pub fn evaluate(&self, uv: &Point2f, textures: &mut TextureHandle) -> Result<Spectrum, String> {
        match self {
            Texture::Constant(c) => Ok(*c),
            Texture::Checkerboard { even, odd, scale } => {
                let s = (uv.x * scale).floor() as i64;
                let t = (uv.y * scale).floor() as i64;
                Ok(if (s + t).rem_euclid(2) == 0 { *even } else { *odd })
            }
            Texture::Image(path) => {
                let img = textures.image(path)?;
                let x = (uv.x * img.resolution.x as Float).floor() as isize;
                let y = ((1.0 - uv.y) * img.resolution.y as Float).floor() as isize;
                Ok(img.texel(x, y))
            }
        }
    }
}

// ----------------------------------------------------------------------------
// Tests
// ----------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::image_io::*;
    use std::sync::Arc;

    #[test]
    fn checkerboard_alternates() {
        let system = Arc::new(TextureSystem::new("."));
        let mut handle = system.handle();
        let tex = Texture::Checkerboard {
            even: Spectrum::new(1.0),
            odd: Spectrum::ZERO,
            scale: 4.0,
        };
        let at = |u, v, h: &mut TextureHandle| tex.evaluate(&Point2f::new(u, v), h).unwrap();
        assert_eq!(at(0.1, 0.1, &mut handle), Spectrum::new(1.0));
        assert_eq!(at(0.3, 0.1, &mut handle), Spectrum::ZERO);
        assert_eq!(at(0.3, 0.3, &mut handle), Spectrum::new(1.0));
        assert_eq!(at(-0.1, 0.1, &mut handle), Spectrum::ZERO);
    }

    #[test]
    fn image_texture_resolves_relative_to_root() {
        let dir = tempfile::tempdir().unwrap();
        let rgb = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        write_image(dir.path().join("tex.pfm").to_str().unwrap(), &rgb, 1, 2).unwrap();

        let system = Arc::new(TextureSystem::new(dir.path()));
        let mut handle = system.handle();
        let tex = Texture::Image(PathBuf::from("tex.pfm"));
        assert_eq!(
            tex.evaluate(&Point2f::new(0.5, 0.75), &mut handle).unwrap(),
            Spectrum::rgb(1.0, 2.0, 3.0)
        );
        assert_eq!(
            tex.evaluate(&Point2f::new(0.5, 0.25), &mut handle).unwrap(),
            Spectrum::rgb(4.0, 5.0, 6.0)
        );

        let missing = Texture::Image(PathBuf::from("missing.png"));
        assert!(missing.evaluate(&Point2f::zero(), &mut handle).is_err());
    }
}
