//! Edge border scanner
//!
//! Finds the boundary between a uniform border and image content on each
//! of the four edges.
//!
//! # Algorithm
//!
//! 1. Walk rows (top/bottom) or columns (left/right) from the edge inward
//! 2. Compute the population standard deviation of each line
//! 3. Stop at the first line that satisfies the stop predicate
//! 4. Subtract the retained margin from the number of lines passed
//!
//! Detection stops at the first line with `std >= threshold` and reports
//! the full extent when no such line exists. Removal stops at the first
//! line with `std > threshold` and removes nothing when no such line
//! exists. The removal boundary is `max(0, i - margin)` on the leading
//! edges and `min(extent, i + margin)` (exclusive) on the trailing edges,
//! where `i` is the first content line found from that edge.

use tracing::debug;

use super::grid::IntensityGrid;
use super::types::{CropRectangle, Edge, EdgeDepths};
use super::ScanOptions;

/// Uniform-border scanner over an [`IntensityGrid`]
#[derive(Debug, Clone, Default)]
pub struct EdgeBorderScanner {
    options: ScanOptions,
}

impl EdgeBorderScanner {
    pub fn new(options: ScanOptions) -> Self {
        Self { options }
    }

    pub fn options(&self) -> &ScanOptions {
        &self.options
    }

    /// Walk from `edge` inward until `stop` accepts a line's standard deviation.
    ///
    /// Returns the number of lines before the stopping line, reduced by
    /// `margin` (saturating), or `None` when no line stops the walk.
    pub fn scan_edge<F>(grid: &IntensityGrid, edge: Edge, stop: F, margin: u32) -> Option<u32>
    where
        F: Fn(f64) -> bool,
    {
        if grid.is_empty() {
            return None;
        }
        (0..grid.extent(edge))
            .find(|&offset| stop(grid.line_std(edge, offset)))
            .map(|offset| offset.saturating_sub(margin))
    }

    /// Count consecutive uniform lines from `edge` (detection variant)
    pub fn measure_uniform_depth(&self, grid: &IntensityGrid, edge: Edge) -> u32 {
        if grid.is_empty() {
            return 0;
        }
        let threshold = self.options.uniformity_threshold;
        let depth = Self::scan_edge(grid, edge, |std| std >= threshold, 0)
            .unwrap_or_else(|| grid.extent(edge));
        debug!(edge = %edge, depth, "uniform depth");
        depth
    }

    /// Lines to remove from `edge`, keeping the crop margin next to content
    /// (removal variant)
    pub fn measure_removal_depth(&self, grid: &IntensityGrid, edge: Edge) -> u32 {
        let threshold = self.options.uniformity_threshold;
        let margin = self.options.crop_margin;
        let content = |std: f64| std > threshold;
        let removed = if edge.is_leading() {
            Self::scan_edge(grid, edge, content, margin)
        } else {
            // exclusive end index: the content line itself counts toward the margin
            Self::scan_edge(grid, edge, content, 0)
                .map(|offset| (offset + 1).saturating_sub(margin))
        }
        .unwrap_or(0);
        debug!(edge = %edge, removed, "removal depth");
        removed
    }

    /// Uniform depth of all four edges
    pub fn detect(&self, grid: &IntensityGrid) -> EdgeDepths {
        EdgeDepths::from_fn(|edge| self.measure_uniform_depth(grid, edge))
    }

    /// Removed amount for all four edges
    pub fn removal_depths(&self, grid: &IntensityGrid) -> EdgeDepths {
        EdgeDepths::from_fn(|edge| self.measure_removal_depth(grid, edge))
    }

    /// Sides whose depth is strictly greater than the significance threshold
    pub fn classify(&self, depths: &EdgeDepths) -> Vec<Edge> {
        Edge::all()
            .into_iter()
            .filter(|&edge| depths.get(edge) > self.options.significance_threshold)
            .collect()
    }

    /// Turn removed amounts into a crop rectangle.
    ///
    /// The result is not reconciled and may be degenerate; see
    /// [`CropRectangle::reconciled`].
    pub fn to_crop_rectangle(removed: &EdgeDepths, height: u32, width: u32) -> CropRectangle {
        CropRectangle {
            top: removed.top,
            bottom: height.saturating_sub(removed.bottom),
            left: removed.left,
            right: width.saturating_sub(removed.right),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Alternating 0/255 checkerboard: every line has std 127.5
    fn noise(x: u32, y: u32) -> u8 {
        if (x + y) % 2 == 0 {
            0
        } else {
            255
        }
    }

    fn grid_from_fn(width: u32, height: u32, f: impl Fn(u32, u32) -> u8) -> IntensityGrid {
        let data = (0..height)
            .flat_map(|y| (0..width).map(move |x| (x, y)))
            .map(|(x, y)| f(x, y))
            .collect();
        IntensityGrid::from_raw(width, height, data).unwrap()
    }

    /// `rows` uniform gray rows on top of checkerboard content
    fn top_border_grid(width: u32, height: u32, rows: u32) -> IntensityGrid {
        grid_from_fn(width, height, |x, y| if y < rows { 128 } else { noise(x, y) })
    }

    fn scanner() -> EdgeBorderScanner {
        EdgeBorderScanner::default()
    }

    #[test]
    fn test_no_border_anywhere() {
        let grid = grid_from_fn(16, 12, noise);
        let depths = scanner().detect(&grid);
        assert_eq!(depths, EdgeDepths::default());
        assert!(scanner().classify(&depths).is_empty());
    }

    #[test]
    fn test_top_depth_counts_uniform_rows() {
        for k in [1, 3, 7, 10] {
            let grid = top_border_grid(12, 20, k);
            let depths = scanner().detect(&grid);
            assert_eq!(depths.top, k, "k = {}", k);
            assert_eq!(depths.bottom, 0);
        }
    }

    #[test]
    fn test_fully_uniform_grid_reports_full_extent() {
        let grid = grid_from_fn(9, 7, |_, _| 200);
        let depths = scanner().detect(&grid);
        assert_eq!(depths.top, 7);
        assert_eq!(depths.bottom, 7);
        assert_eq!(depths.left, 9);
        assert_eq!(depths.right, 9);
        assert_eq!(scanner().classify(&depths), Edge::all().to_vec());
    }

    #[test]
    fn test_classify_threshold_is_strict() {
        let depths = EdgeDepths {
            top: 5,
            bottom: 6,
            left: 0,
            right: 100,
        };
        assert_eq!(scanner().classify(&depths), vec![Edge::Bottom, Edge::Right]);
    }

    #[test]
    fn test_classify_canonical_order() {
        let depths = EdgeDepths::uniform(9);
        let sides = scanner().classify(&depths);
        assert_eq!(sides, vec![Edge::Top, Edge::Bottom, Edge::Left, Edge::Right]);
    }

    #[test]
    fn test_std_equal_to_threshold_polarity() {
        // rows alternate 0/20 across columns: std exactly 10
        let grid = grid_from_fn(4, 6, |x, y| {
            if y < 2 {
                if x % 2 == 0 {
                    0
                } else {
                    20
                }
            } else {
                noise(x, y)
            }
        });
        assert!((grid.row_std(0) - 10.0).abs() < 1e-12);

        // detection: std 10 is not uniform, stop immediately
        assert_eq!(scanner().measure_uniform_depth(&grid, Edge::Top), 0);

        // removal: std 10 is not content, first content row is 2
        let options = ScanOptions::builder().crop_margin(0).build();
        let removal = EdgeBorderScanner::new(options);
        assert_eq!(removal.measure_removal_depth(&grid, Edge::Top), 2);
    }

    #[test]
    fn test_removal_keeps_margin_small_border() {
        // 3 uniform rows, first content row 3: boundary max(0, 3 - 5) = 0
        let grid = top_border_grid(10, 8, 3);
        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed.top, 0);
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, 8, 10);
        assert_eq!(rect.top, 0);
        assert_eq!(rect, CropRectangle::full(8, 10));
    }

    #[test]
    fn test_removal_keeps_margin_large_border() {
        let grid = top_border_grid(10, 40, 12);
        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed.top, 7);
        assert_eq!(removed.bottom, 0);
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, 40, 10);
        assert_eq!(rect.top, 7);
        assert_eq!(rect.bottom, 40);
    }

    #[test]
    fn test_removal_right_edge_boundary() {
        // 15 uniform columns on the right, 2 on the left; last content column 24
        let grid = grid_from_fn(40, 10, |x, y| {
            if x >= 25 || x < 2 {
                50
            } else {
                noise(x, y)
            }
        });
        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed.right, 11);
        assert_eq!(removed.left, 0);
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, 10, 40);
        assert_eq!(rect.right, 29);
        assert_eq!(rect.width(), 29);
    }

    #[test]
    fn test_removal_bottom_edge_boundary() {
        // content rows 0..=9, uniform rows 10..=19: crop end is min(20, 9 + 5)
        let grid = grid_from_fn(10, 20, |x, y| if y <= 9 { noise(x, y) } else { 77 });
        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed.bottom, 6);
        assert_eq!(removed.top, 0);
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, 20, 10);
        assert_eq!(rect.bottom, 14);
        assert_eq!(rect.height(), 14);
    }

    #[test]
    fn test_removal_trailing_content_near_edge_crops_nothing() {
        // last content row 16 of 20: min(20, 16 + 5) = 20
        let grid = grid_from_fn(10, 20, |x, y| if y <= 16 { noise(x, y) } else { 77 });
        assert_eq!(scanner().measure_removal_depth(&grid, Edge::Bottom), 0);
        // last content row 14: end 19, one row removed
        let grid = grid_from_fn(10, 20, |x, y| if y <= 14 { noise(x, y) } else { 77 });
        assert_eq!(scanner().measure_removal_depth(&grid, Edge::Bottom), 1);
    }

    #[test]
    fn test_removal_without_content_crops_nothing() {
        let grid = grid_from_fn(12, 12, |_, _| 30);
        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed, EdgeDepths::default());
        let rect = EdgeBorderScanner::to_crop_rectangle(&removed, 12, 12);
        assert_eq!(rect, CropRectangle::full(12, 12));
    }

    #[test]
    fn test_twenty_pixel_scenario() {
        let grid = top_border_grid(20, 20, 5);

        let depths = scanner().detect(&grid);
        assert_eq!(depths.top, 5);
        assert_eq!(depths.bottom, 0);
        assert_eq!(depths.left, 0);
        assert_eq!(depths.right, 0);
        // depth 5 is not above the significance threshold
        assert!(scanner().classify(&depths).is_empty());

        let removed = scanner().removal_depths(&grid);
        assert_eq!(removed.top, 0);
    }

    #[test]
    fn test_six_row_border_is_significant() {
        let grid = top_border_grid(20, 20, 6);
        let depths = scanner().detect(&grid);
        assert_eq!(scanner().classify(&depths), vec![Edge::Top]);
    }

    #[test]
    fn test_empty_grid_yields_zero_depths() {
        for (w, h) in [(0, 0), (0, 5), (5, 0)] {
            let grid = IntensityGrid::from_raw(w, h, Vec::new()).unwrap();
            assert_eq!(scanner().detect(&grid), EdgeDepths::default());
            assert_eq!(scanner().removal_depths(&grid), EdgeDepths::default());
        }
    }

    #[test]
    fn test_edges_scanned_independently() {
        // left border 8 columns, top border 3 rows: neither affects the other
        let grid = grid_from_fn(30, 30, |x, y| {
            if x < 8 || y < 3 {
                90
            } else {
                noise(x, y)
            }
        });
        let depths = scanner().detect(&grid);
        assert_eq!(depths.left, 8);
        assert_eq!(depths.top, 3);
        assert_eq!(scanner().classify(&depths), vec![Edge::Left]);
    }

    #[test]
    fn test_scan_edge_custom_predicate() {
        let grid = top_border_grid(10, 10, 4);
        let hit = EdgeBorderScanner::scan_edge(&grid, Edge::Top, |std| std > 50.0, 1);
        assert_eq!(hit, Some(3));
        let miss = EdgeBorderScanner::scan_edge(&grid, Edge::Top, |std| std > 1000.0, 0);
        assert_eq!(miss, None);
    }

    #[test]
    fn test_custom_threshold_options() {
        // rows with std 127.5 count as uniform under a loose threshold
        let options = ScanOptions::builder().uniformity_threshold(200.0).build();
        let grid = grid_from_fn(6, 4, noise);
        let depths = EdgeBorderScanner::new(options).detect(&grid);
        assert_eq!(depths.top, 4);
    }

    #[test]
    fn test_overlapping_depths_reconcile() {
        let grid = grid_from_fn(10, 10, |_, _| 0);
        let depths = scanner().detect(&grid);
        let rect = EdgeBorderScanner::to_crop_rectangle(&depths, 10, 10);
        assert!(rect.is_degenerate());
        assert_eq!(rect.reconciled(10, 10), CropRectangle::full(10, 10));
    }
}
