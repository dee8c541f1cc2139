//! Structure-type color table.

use serde::{Deserialize, Serialize};
use swcvox_core::SwcType;

/// 8-bit RGB color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(missing_docs)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

#[allow(missing_docs)]
impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const MAGENTA: Rgb = Rgb::new(255, 0, 255);
    pub const GREEN: Rgb = Rgb::new(0, 255, 0);
    pub const CYAN: Rgb = Rgb::new(0, 255, 255);
    pub const BLUE: Rgb = Rgb::new(0, 0, 255);
    pub const PINK: Rgb = Rgb::new(255, 175, 175);
    pub const YELLOW: Rgb = Rgb::new(255, 255, 0);

    /// Creates a color from its components.
    #[must_use]
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Returns the color as a `#rrggbb` string.
    #[must_use]
    pub fn to_hex(self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Display color of a structure type.
#[must_use]
pub fn swc_color(swc_type: SwcType) -> Rgb {
    match swc_type {
        SwcType::Soma | SwcType::ForkPoint => Rgb::MAGENTA,
        SwcType::Dendrite => Rgb::GREEN,
        SwcType::ApicalDendrite => Rgb::CYAN,
        SwcType::Axon => Rgb::BLUE,
        SwcType::EndPoint => Rgb::PINK,
        SwcType::Custom => Rgb::YELLOW,
        SwcType::Undefined => Rgb::WHITE,
    }
}
