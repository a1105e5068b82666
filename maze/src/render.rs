//! Computes what to draw for the current session state.
//!
//! Rendering is split in two: this module turns grid, points and path into a
//! flat list of [`Shape`]s in display-local coordinates, and the frontend
//! paints that list. The same input always yields the same shapes.

use nalgebra::{Point2, Vector2};

use crate::grid::{Cell, Grid, Point};
use crate::mapper::CoordinateMapper;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgba_u8(255, 255, 255, 255);
    pub const BLACK: Color = Color::rgba_u8(0, 0, 0, 255);
    pub const RED: Color = Color::rgba_u8(255, 0, 0, 255);
    pub const GREEN: Color = Color::rgba_u8(0, 255, 0, 255);

    pub const fn rgba_u8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// From a `0xRRGGBB` literal, fully opaque
    pub const fn hex(rgb: u32) -> Self {
        Self::rgba_u8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
    }

    pub const fn with_alpha(self, a: u8) -> Self {
        Self { a, ..self }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Stroke {
    pub width: f32,
    pub color: Color,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Shape {
    Rect {
        min: Point2<f32>,
        size: Vector2<f32>,
        fill: Color,
    },
    Line {
        from: Point2<f32>,
        to: Point2<f32>,
        stroke: Stroke,
    },
    Polyline {
        points: Vec<Point2<f32>>,
        stroke: Stroke,
    },
    Circle {
        center: Point2<f32>,
        radius: f32,
        fill: Color,
        stroke: Option<Stroke>,
    },
    Glyph {
        center: Point2<f32>,
        size: f32,
        text: &'static str,
        color: Color,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub open: Color,
    pub wall: Color,
    pub grid_line: Color,
    pub path: Color,
    pub start: Color,
    pub start_outline: Color,
    pub end: Color,
    pub end_outline: Color,
    pub walker: Color,
    pub hover: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            open: Color::WHITE,
            wall: Color::hex(0x2c3e50),
            grid_line: Color::hex(0xd0d7de),
            path: Color::hex(0x3498db),
            start: Color::hex(0x2ecc71),
            start_outline: Color::hex(0x145a32),
            end: Color::hex(0xe74c3c),
            end_outline: Color::hex(0x922b21),
            walker: Color::hex(0x2c3e50),
            hover: Color::GREEN.with_alpha(96),
        }
    }
}

/// What the overlay is drawn on top of
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Substrate {
    /// the grid itself is drawn, cell by cell
    #[default]
    Grid,
    /// the photo is drawn by the caller, only markers and path go on top
    Image,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RenderOptions {
    pub substrate: Substrate,
    pub grid_lines: bool,
    pub palette: Palette,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            substrate: Substrate::Grid,
            grid_lines: true,
            palette: Palette::default(),
        }
    }
}

/// Everything the overlay depends on, borrowed from the session
#[derive(Debug, Clone, Copy)]
pub struct Overlay<'a> {
    pub grid: &'a Grid,
    pub starts: &'a [Point],
    pub end: Option<Point>,
    pub path: &'a [Point],
    pub hover: Option<Point>,
}

pub const WALKER: &str = "🚶";

struct Canvas<'a> {
    mapper: &'a CoordinateMapper,
    grid: &'a Grid,
    shapes: Vec<Shape>,
}

impl Canvas<'_> {
    /// Points that do not fit both grid and mapper are never drawn
    fn visible(&self, point: Point) -> bool {
        self.grid.contains(point)
            && point.row < self.mapper.rows()
            && point.col < self.mapper.columns()
    }

    /// the smaller side of a cell, markers are sized relative to it
    fn unit(&self) -> f32 {
        let size = self.mapper.cell_size();
        size.x.min(size.y)
    }

    fn cell(&mut self, point: Point, fill: Color) {
        let min = self.mapper.cell_origin(point);
        let size = self.mapper.cell_size();
        self.shapes.push(Shape::Rect { min, size, fill });
    }

    fn marker(&mut self, point: Point, fill: Color, outline: Color) {
        let unit = self.unit();
        self.shapes.push(Shape::Circle {
            center: self.mapper.to_pixel(point),
            radius: unit / 2.1,
            fill,
            stroke: Some(Stroke {
                width: unit * 0.15,
                color: outline,
            }),
        });
    }

    fn cells(&mut self, palette: &Palette) {
        for (point, cell) in self.grid.iter() {
            if !self.visible(point) {
                continue;
            }
            let fill = match cell {
                Cell::Open => palette.open,
                Cell::Wall => palette.wall,
            };
            self.cell(point, fill);
        }
    }

    fn grid_lines(&mut self, color: Color) {
        let display = self.mapper.display();
        let size = self.mapper.cell_size();
        let stroke = Stroke {
            width: (self.unit() * 0.05).max(0.5),
            color,
        };

        for row in 0..=self.mapper.rows() {
            let y = row as f32 * size.y;
            self.shapes.push(Shape::Line {
                from: Point2::new(0.0, y),
                to: Point2::new(display.x, y),
                stroke,
            });
        }
        for col in 0..=self.mapper.columns() {
            let x = col as f32 * size.x;
            self.shapes.push(Shape::Line {
                from: Point2::new(x, 0.0),
                to: Point2::new(x, display.y),
                stroke,
            });
        }
    }

    fn path(&mut self, path: &[Point], palette: &Palette) {
        let unit = self.unit();
        let stroke = Stroke {
            width: unit / 6.0,
            color: palette.path,
        };

        // split into runs so an out of range point never gets bridged
        let mut run: Vec<Point2<f32>> = Vec::new();
        for &point in path {
            if self.visible(point) {
                run.push(self.mapper.to_pixel(point));
            } else if !run.is_empty() {
                self.flush_run(&mut run, stroke);
            }
        }
        self.flush_run(&mut run, stroke);

        for &point in path {
            if !self.visible(point) {
                continue;
            }
            self.shapes.push(Shape::Circle {
                center: self.mapper.to_pixel(point),
                radius: unit / 3.0,
                fill: palette.path,
                stroke: None,
            });
        }

        if let Some(&last) = path.last() {
            if self.visible(last) {
                self.shapes.push(Shape::Glyph {
                    center: self.mapper.to_pixel(last),
                    size: unit,
                    text: WALKER,
                    color: palette.walker,
                });
            }
        }
    }

    fn flush_run(&mut self, run: &mut Vec<Point2<f32>>, stroke: Stroke) {
        if run.len() > 1 {
            self.shapes.push(Shape::Polyline {
                points: std::mem::take(run),
                stroke,
            });
        } else {
            run.clear();
        }
    }
}

/// Back to front: cells, grid lines, path, start markers, end marker, hover.
pub fn render(overlay: &Overlay, mapper: &CoordinateMapper, options: &RenderOptions) -> Vec<Shape> {
    let palette = &options.palette;
    let mut canvas = Canvas {
        mapper,
        grid: overlay.grid,
        shapes: Vec::new(),
    };

    if options.substrate == Substrate::Grid {
        canvas.cells(palette);
    }
    if options.grid_lines {
        canvas.grid_lines(palette.grid_line);
    }

    canvas.path(overlay.path, palette);

    for &start in overlay.starts {
        if canvas.visible(start) {
            canvas.marker(start, palette.start, palette.start_outline);
        }
    }

    if let Some(end) = overlay.end.filter(|p| canvas.visible(*p)) {
        canvas.marker(end, palette.end, palette.end_outline);
    }

    if let Some(hover) = overlay.hover.filter(|p| canvas.visible(*p)) {
        canvas.cell(hover, palette.hover);
    }

    canvas.shapes
}

#[cfg(test)]
mod test {
    use super::*;

    fn create_basic_grid() -> Grid {
        Grid::parse("...\n.#.\n...").unwrap()
    }

    fn mapper(grid: &Grid) -> CoordinateMapper {
        CoordinateMapper::new(Vector2::new(60.0, 60.0), grid.rows(), grid.columns()).unwrap()
    }

    fn markers(shapes: &[Shape], color: Color) -> Vec<Point2<f32>> {
        shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Circle { center, fill, .. } if *fill == color => Some(*center),
                _ => None,
            })
            .collect()
    }

    fn polylines(shapes: &[Shape]) -> Vec<&Vec<Point2<f32>>> {
        shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Polyline { points, .. } => Some(points),
                _ => None,
            })
            .collect()
    }

    fn glyphs(shapes: &[Shape]) -> Vec<Point2<f32>> {
        shapes
            .iter()
            .filter_map(|shape| match shape {
                Shape::Glyph { center, .. } => Some(*center),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn test_solved_maze() {
        let grid = create_basic_grid();
        let mapper = mapper(&grid);
        let path: Vec<Point> = [[0, 0], [0, 1], [0, 2], [1, 2], [2, 2]]
            .into_iter()
            .map(Point::from)
            .collect();
        let overlay = Overlay {
            grid: &grid,
            starts: &[Point::new(0, 0)],
            end: Some(Point::new(2, 2)),
            path: &path,
            hover: None,
        };
        let palette = Palette::default();
        let shapes = render(&overlay, &mapper, &RenderOptions::default());

        let centers: Vec<_> = path.iter().map(|p| mapper.to_pixel(*p)).collect();
        assert_eq!(polylines(&shapes), vec![&centers]);
        assert_eq!(markers(&shapes, palette.path), centers);
        assert_eq!(glyphs(&shapes), vec![Point2::new(50.0, 50.0)]);
        assert_eq!(markers(&shapes, palette.start), vec![Point2::new(10.0, 10.0)]);
        assert_eq!(markers(&shapes, palette.end), vec![Point2::new(50.0, 50.0)]);
    }

    #[test]
    fn test_draw_order() {
        let grid = create_basic_grid();
        let path = [Point::new(0, 0), Point::new(0, 1)];
        let overlay = Overlay {
            grid: &grid,
            starts: &[Point::new(0, 0)],
            end: Some(Point::new(0, 1)),
            path: &path,
            hover: Some(Point::new(2, 0)),
        };
        let palette = Palette::default();
        let shapes = render(&overlay, &mapper(&grid), &RenderOptions::default());

        let position = |pred: &dyn Fn(&Shape) -> bool| shapes.iter().position(pred).unwrap();
        let last_cell = shapes
            .iter()
            .rposition(|s| matches!(s, Shape::Rect { fill, .. } if *fill != palette.hover))
            .unwrap();
        let first_line = position(&|s| matches!(s, Shape::Line { .. }));
        let first_path = position(&|s| matches!(s, Shape::Polyline { .. }));
        let start = position(&|s| matches!(s, Shape::Circle { fill, .. } if *fill == palette.start));
        let end = position(&|s| matches!(s, Shape::Circle { fill, .. } if *fill == palette.end));
        let hover = position(&|s| matches!(s, Shape::Rect { fill, .. } if *fill == palette.hover));

        assert!(last_cell < first_line);
        assert!(first_line < first_path);
        assert!(first_path < start);
        assert!(start < end);
        assert!(end < hover);
    }

    #[test]
    fn test_cells_use_palette() {
        let grid = create_basic_grid();
        let overlay = Overlay {
            grid: &grid,
            starts: &[],
            end: None,
            path: &[],
            hover: None,
        };
        let palette = Palette::default();
        let shapes = render(&overlay, &mapper(&grid), &RenderOptions::default());

        let fills: Vec<Color> = shapes
            .iter()
            .filter_map(|s| match s {
                Shape::Rect { fill, .. } => Some(*fill),
                _ => None,
            })
            .collect();
        assert_eq!(fills.len(), 9);
        assert_eq!(fills[4], palette.wall);
        assert_eq!(fills.iter().filter(|f| **f == palette.open).count(), 8);
        // 4 horizontal and 4 vertical lines
        assert_eq!(
            shapes.iter().filter(|s| matches!(s, Shape::Line { .. })).count(),
            8
        );
    }

    #[test]
    fn test_image_substrate_skips_cells() {
        let grid = create_basic_grid();
        let overlay = Overlay {
            grid: &grid,
            starts: &[Point::new(0, 0)],
            end: None,
            path: &[],
            hover: None,
        };
        let options = RenderOptions {
            substrate: Substrate::Image,
            grid_lines: false,
            ..Default::default()
        };
        let shapes = render(&overlay, &mapper(&grid), &options);
        assert_eq!(shapes.len(), 1);
        assert!(matches!(shapes[0], Shape::Circle { .. }));
    }

    #[test]
    fn test_out_of_range_is_skipped() {
        let grid = create_basic_grid();
        let path = [
            Point::new(0, 0),
            Point::new(0, 1),
            Point::new(9, 9),
            Point::new(2, 1),
            Point::new(2, 2),
            Point::new(3, 3),
        ];
        let overlay = Overlay {
            grid: &grid,
            starts: &[Point::new(5, 0), Point::new(0, 0)],
            end: Some(Point::new(0, 7)),
            path: &path,
            hover: Some(Point::new(4, 4)),
        };
        let palette = Palette::default();
        let options = RenderOptions {
            substrate: Substrate::Image,
            grid_lines: false,
            ..Default::default()
        };
        let shapes = render(&overlay, &mapper(&grid), &options);

        // the path is split around the bad point and not bridged
        assert_eq!(polylines(&shapes).len(), 2);
        assert_eq!(markers(&shapes, palette.path).len(), 4);
        // the final point is out of range, so there is no walker
        assert!(glyphs(&shapes).is_empty());
        assert_eq!(markers(&shapes, palette.start), vec![Point2::new(10.0, 10.0)]);
        assert!(markers(&shapes, palette.end).is_empty());
        assert!(!shapes.iter().any(|s| matches!(s, Shape::Rect { .. })));
    }

    #[test]
    fn test_idempotent() {
        let grid = create_basic_grid();
        let path = [Point::new(0, 0), Point::new(1, 0), Point::new(2, 0)];
        let overlay = Overlay {
            grid: &grid,
            starts: &[Point::new(0, 0)],
            end: Some(Point::new(2, 0)),
            path: &path,
            hover: None,
        };
        let mapper = mapper(&grid);
        let options = RenderOptions::default();
        assert_eq!(
            render(&overlay, &mapper, &options),
            render(&overlay, &mapper, &options)
        );
    }

    #[test]
    fn test_hex() {
        assert_eq!(Color::hex(0x2c3e50), Color::rgba_u8(0x2c, 0x3e, 0x50, 255));
    }
}
