//! Geometry and color types shared by the planner and the renderer

use serde::{Deserialize, Serialize};

/// Rectangle in top-left page coordinates (y grows downwards)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }
}

/// Color representation (components in 0.0-1.0)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub const fn rgb(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    /// Build a color from a packed `0xRRGGBB` value
    pub const fn from_rgb24(rgb: u32) -> Self {
        Self {
            r: ((rgb >> 16) & 0xFF) as f64 / 255.0,
            g: ((rgb >> 8) & 0xFF) as f64 / 255.0,
            b: (rgb & 0xFF) as f64 / 255.0,
        }
    }

    pub const fn black() -> Self {
        Self::rgb(0.0, 0.0, 0.0)
    }
}

/// Page orientation chosen by the planner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    Portrait,
    Landscape,
}

/// Page dimensions in points
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageSize {
    pub width: f64,
    pub height: f64,
}

impl PageSize {
    /// US Letter, the only sheet the report template uses
    pub const LETTER: PageSize = PageSize {
        width: 612.0,
        height: 792.0,
    };

    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Letter sheet in the given orientation (landscape swaps the sides)
    pub fn for_orientation(orientation: Orientation) -> Self {
        match orientation {
            Orientation::Portrait => Self::LETTER,
            Orientation::Landscape => Self::new(Self::LETTER.height, Self::LETTER.width),
        }
    }

    pub fn is_landscape(&self) -> bool {
        self.width > self.height
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landscape_swaps_sides() {
        let page = PageSize::for_orientation(Orientation::Landscape);
        assert_eq!(page.width, 792.0);
        assert_eq!(page.height, 612.0);
        assert!(page.is_landscape());
        assert!(!PageSize::for_orientation(Orientation::Portrait).is_landscape());
    }

    #[test]
    fn test_packed_rgb_components() {
        let green = Color::from_rgb24(0x00A651);
        assert_eq!(green.r, 0.0);
        assert_eq!(green.g, 166.0 / 255.0);
        assert_eq!(green.b, 81.0 / 255.0);
    }
}
