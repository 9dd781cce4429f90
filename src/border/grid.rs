//! Grayscale intensity grid consumed by the edge scanner

use image::{DynamicImage, GrayImage, RgbImage};

use super::types::{BorderError, Edge, Result};

/// ITU-R BT.601 luma weights scaled by 1000
const LUMA_R: u32 = 299;
const LUMA_G: u32 = 587;
const LUMA_B: u32 = 114;
const LUMA_SCALE: u32 = 1000;

/// Row-major `height x width` grid of 8-bit brightness samples
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntensityGrid {
    width: u32,
    height: u32,
    data: Vec<u8>,
}

impl IntensityGrid {
    /// Wrap raw row-major samples
    pub fn from_raw(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let expected = width as usize * height as usize;
        if data.len() != expected {
            return Err(BorderError::InvalidGrid(format!(
                "expected {} samples for {}x{}, got {}",
                expected,
                width,
                height,
                data.len()
            )));
        }
        Ok(Self {
            width,
            height,
            data,
        })
    }

    /// Copy samples out of a grayscale image
    pub fn from_gray(gray: &GrayImage) -> Self {
        let (width, height) = gray.dimensions();
        Self {
            width,
            height,
            data: gray.as_raw().clone(),
        }
    }

    /// Convert an RGB image with BT.601 weights
    pub fn from_rgb(rgb: &RgbImage) -> Self {
        let (width, height) = rgb.dimensions();
        let data = rgb
            .pixels()
            .map(|p| {
                let [r, g, b] = p.0;
                let luma = LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32;
                ((luma + LUMA_SCALE / 2) / LUMA_SCALE) as u8
            })
            .collect();
        Self {
            width,
            height,
            data,
        }
    }

    /// Derive the grid from any decoded image.
    ///
    /// Grayscale inputs are taken as-is; everything else goes through
    /// [`IntensityGrid::from_rgb`], dropping alpha.
    pub fn from_image(img: &DynamicImage) -> Self {
        match img {
            DynamicImage::ImageLuma8(gray) => Self::from_gray(gray),
            other => Self::from_rgb(&other.to_rgb8()),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// True when either dimension is zero
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Sample at column `x`, row `y`
    pub fn get(&self, x: u32, y: u32) -> u8 {
        self.data[y as usize * self.width as usize + x as usize]
    }

    /// Borrow one row
    pub fn row(&self, y: u32) -> &[u8] {
        let w = self.width as usize;
        let start = y as usize * w;
        &self.data[start..start + w]
    }

    /// Number of lines scanned from `edge` (rows for top/bottom, columns otherwise)
    pub fn extent(&self, edge: Edge) -> u32 {
        if edge.is_horizontal() {
            self.height
        } else {
            self.width
        }
    }

    /// Population standard deviation of row `y`
    pub fn row_std(&self, y: u32) -> f64 {
        population_std(self.row(y).iter().copied())
    }

    /// Population standard deviation of column `x`
    pub fn column_std(&self, x: u32) -> f64 {
        let w = self.width as usize;
        population_std(self.data.iter().skip(x as usize).step_by(w).copied())
    }

    /// Standard deviation of the line `offset` steps in from `edge`
    pub(crate) fn line_std(&self, edge: Edge, offset: u32) -> f64 {
        let extent = self.extent(edge);
        let index = if edge.is_leading() {
            offset
        } else {
            extent - 1 - offset
        };
        if edge.is_horizontal() {
            self.row_std(index)
        } else {
            self.column_std(index)
        }
    }
}

/// Two-pass population standard deviation; 0.0 for an empty line
fn population_std(samples: impl Iterator<Item = u8> + Clone) -> f64 {
    let (count, sum) = samples
        .clone()
        .fold((0usize, 0f64), |(n, s), v| (n + 1, s + v as f64));
    if count == 0 {
        return 0.0;
    }
    let mean = sum / count as f64;
    let var = samples
        .map(|v| {
            let d = v as f64 - mean;
            d * d
        })
        .sum::<f64>()
        / count as f64;
    var.sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Luma, Rgb};

    #[test]
    fn test_from_raw_length_mismatch() {
        let result = IntensityGrid::from_raw(3, 2, vec![0; 5]);
        assert!(matches!(result, Err(BorderError::InvalidGrid(_))));
    }

    #[test]
    fn test_row_and_column_access() {
        let grid = IntensityGrid::from_raw(3, 2, vec![1, 2, 3, 4, 5, 6]).unwrap();
        assert_eq!(grid.row(1), &[4, 5, 6]);
        assert_eq!(grid.get(2, 0), 3);
        assert_eq!(grid.extent(Edge::Top), 2);
        assert_eq!(grid.extent(Edge::Left), 3);
    }

    #[test]
    fn test_std_uniform_line_is_zero() {
        let grid = IntensityGrid::from_raw(4, 1, vec![128; 4]).unwrap();
        assert_eq!(grid.row_std(0), 0.0);
    }

    #[test]
    fn test_std_matches_population_formula() {
        // values 0 and 255 alternating: mean 127.5, std 127.5
        let grid = IntensityGrid::from_raw(4, 1, vec![0, 255, 0, 255]).unwrap();
        assert!((grid.row_std(0) - 127.5).abs() < 1e-9);

        // 2, 4, 4, 4, 5, 5, 7, 9 -> population std 2
        let grid = IntensityGrid::from_raw(1, 8, vec![2, 4, 4, 4, 5, 5, 7, 9]).unwrap();
        assert!((grid.column_std(0) - 2.0).abs() < 1e-9);
    }

    #[test]
    fn test_line_std_trailing_edges() {
        // bottom row varies, top row uniform
        let grid = IntensityGrid::from_raw(2, 2, vec![9, 9, 0, 100]).unwrap();
        assert_eq!(grid.line_std(Edge::Top, 0), 0.0);
        assert!(grid.line_std(Edge::Bottom, 0) > 0.0);
        // right column is [9, 100], left column is [9, 0]
        assert!((grid.line_std(Edge::Right, 0) - 45.5).abs() < 1e-9);
        assert!((grid.line_std(Edge::Left, 0) - 4.5).abs() < 1e-9);
    }

    #[test]
    fn test_from_gray_copies_samples() {
        let gray = GrayImage::from_fn(3, 2, |x, y| Luma([(x + 10 * y) as u8]));
        let grid = IntensityGrid::from_gray(&gray);
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(1, 1), 11);
    }

    #[test]
    fn test_from_rgb_uses_bt601_weights() {
        let rgb = RgbImage::from_fn(3, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            _ => Rgb([0, 0, 255]),
        });
        let grid = IntensityGrid::from_rgb(&rgb);
        assert_eq!(grid.row(0), &[76, 150, 29]);
    }

    #[test]
    fn test_empty_grid() {
        let grid = IntensityGrid::from_raw(0, 5, Vec::new()).unwrap();
        assert!(grid.is_empty());
    }
}
