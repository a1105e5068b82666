use nalgebra::{Point2, Vector2};

use crate::grid::Point;

fn is_usable(size: Vector2<f32>) -> bool {
    size.x.is_finite() && size.y.is_finite() && size.x > 0.0 && size.y > 0.0
}

/// Places some content of a native size inside an available display area,
/// keeping the aspect ratio and centering it.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportMapping {
    /// offset of the displayed content inside the available area
    pub origin: Vector2<f32>,
    /// display pixels per native pixel
    pub scale: f32,
    pub display: Vector2<f32>,
    pub native: Vector2<f32>,
}

impl ViewportMapping {
    /// Returns `None` as long as either size is unknown or empty
    pub fn fit(native: Vector2<f32>, available: Vector2<f32>) -> Option<Self> {
        if !is_usable(native) || !is_usable(available) {
            return None;
        }

        let scale = (available.x / native.x).min(available.y / native.y);
        let display = native * scale;
        let origin = (available - display) / 2.0;

        Some(Self {
            origin,
            scale,
            display,
            native,
        })
    }

    /// Converts a position relative to the available area into a position
    /// relative to the displayed content. Positions outside the content give `None`.
    pub fn to_local(&self, pos: Point2<f32>) -> Option<Point2<f32>> {
        let local = pos - self.origin;
        if local.x < 0.0 || local.y < 0.0 || local.x > self.display.x || local.y > self.display.y
        {
            return None;
        }
        Some(local)
    }

    pub fn mapper(&self, rows: usize, columns: usize) -> Option<CoordinateMapper> {
        CoordinateMapper::new(self.display, rows, columns)
    }
}

/// Converts between display-local pixels and grid cells.
///
/// Both display and native image space share the same fractional coordinates,
/// so only the display size and the grid dimensions are needed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoordinateMapper {
    display: Vector2<f32>,
    rows: usize,
    columns: usize,
}

impl CoordinateMapper {
    /// Degenerate inputs (no display area, empty grid) have no mapping
    pub fn new(display: Vector2<f32>, rows: usize, columns: usize) -> Option<Self> {
        if !is_usable(display) || rows == 0 || columns == 0 {
            return None;
        }
        Some(Self {
            display,
            rows,
            columns,
        })
    }

    fn axis_to_index(pixel: f32, extent: f32, count: usize) -> usize {
        let index = (pixel * count as f32 / extent).floor();
        if index.is_nan() || index < 0.0 {
            0
        } else {
            (index as usize).min(count - 1)
        }
    }

    /// The cell under a display-local pixel, clamped into the grid
    pub fn to_grid(&self, pixel: Point2<f32>) -> Point {
        Point {
            row: Self::axis_to_index(pixel.y, self.display.y, self.rows),
            col: Self::axis_to_index(pixel.x, self.display.x, self.columns),
        }
    }

    /// The center of a cell in display-local pixels
    pub fn to_pixel(&self, point: Point) -> Point2<f32> {
        Point2::new(
            (point.col as f32 + 0.5) * self.display.x / self.columns as f32,
            (point.row as f32 + 0.5) * self.display.y / self.rows as f32,
        )
    }

    /// The top left corner of a cell in display-local pixels
    pub fn cell_origin(&self, point: Point) -> Point2<f32> {
        Point2::new(
            point.col as f32 * self.display.x / self.columns as f32,
            point.row as f32 * self.display.y / self.rows as f32,
        )
    }

    pub fn cell_size(&self) -> Vector2<f32> {
        Vector2::new(
            self.display.x / self.columns as f32,
            self.display.y / self.rows as f32,
        )
    }

    pub fn display(&self) -> Vector2<f32> {
        self.display
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn columns(&self) -> usize {
        self.columns
    }
}
