//! Colour helpers and 32-bit pixel packing.

use lumen_math::Vec3;

/// Colour type alias (RGB values in 0-1)
pub type Colour = Vec3;

/// Fully opaque alpha channel of a packed pixel.
pub const OPAQUE: u32 = 0xFF00_0000;

/// Grey substituted for materials that could not be resolved.
pub const DEFAULT_GREY: Colour = Vec3::splat(180.0 / 255.0);

/// White used for point-cloud and wireframe drawing.
pub const WHITE: Colour = Vec3::ONE;

/// Pack a colour into `0xFF_RR_GG_BB`, clamping each channel to 0-1.
pub fn pack_colour(colour: Colour) -> u32 {
    let [r, g, b] = colour
        .to_array()
        .map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u32);
    OPAQUE | (r << 16) | (g << 8) | b
}

/// Unpack a `0xAA_RR_GG_BB` pixel into a colour, ignoring alpha.
pub fn unpack_colour(packed: u32) -> Colour {
    let r = (packed >> 16) & 0xFF;
    let g = (packed >> 8) & 0xFF;
    let b = packed & 0xFF;
    Colour::new(r as f32, g as f32, b as f32) / 255.0
}

/// Build a colour from 8-bit channels.
pub fn rgb8(r: u8, g: u8, b: u8) -> Colour {
    Colour::new(r as f32, g as f32, b as f32) / 255.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pack_channels() {
        assert_eq!(pack_colour(Colour::new(1.0, 0.0, 0.0)), 0xFFFF_0000);
        assert_eq!(pack_colour(Colour::new(0.0, 1.0, 0.0)), 0xFF00_FF00);
        assert_eq!(pack_colour(Colour::new(0.0, 0.0, 1.0)), 0xFF00_00FF);
        assert_eq!(pack_colour(Colour::ZERO), OPAQUE);
    }

    #[test]
    fn test_pack_clamps_out_of_range() {
        assert_eq!(pack_colour(Colour::new(2.0, -1.0, 0.5)), 0xFFFF_0080);
    }

    #[test]
    fn test_unpack_matches_rgb8() {
        let packed = 0xFF12_3456;
        let colour = unpack_colour(packed);
        assert!((colour - rgb8(0x12, 0x34, 0x56)).length() < 1e-6);
        assert_eq!(pack_colour(colour), packed);
    }
}
