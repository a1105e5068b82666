use egui::{epaint::CircleShape, Align2, Color32, FontId, Pos2, Rect, Rounding, Vec2};
use maze::{Color, Shape, Stroke};
use nalgebra::{Point2, Vector2};

/// Paints shapes computed in display-local coordinates at `origin`
pub fn paint(painter: &egui::Painter, origin: Pos2, shapes: &[Shape]) {
    for shape in shapes {
        match shape {
            Shape::Glyph {
                center,
                size,
                text,
                color,
            } => {
                painter.text(
                    at(origin, *center),
                    Align2::CENTER_CENTER,
                    *text,
                    FontId::proportional(*size),
                    color32(*color),
                );
            }
            shape => {
                if let Some(shape) = to_egui(origin, shape) {
                    painter.add(shape);
                }
            }
        }
    }
}

/// Text needs the fonts of a painter, so glyphs are not converted here
fn to_egui(origin: Pos2, shape: &Shape) -> Option<egui::Shape> {
    let shape = match shape {
        Shape::Rect { min, size, fill } => egui::Shape::rect_filled(
            Rect::from_min_size(at(origin, *min), vec2(*size)),
            Rounding::ZERO,
            color32(*fill),
        ),
        Shape::Line { from, to, stroke } => {
            egui::Shape::line_segment([at(origin, *from), at(origin, *to)], stroke32(*stroke))
        }
        Shape::Polyline { points, stroke } => egui::Shape::line(
            points.iter().map(|p| at(origin, *p)).collect(),
            stroke32(*stroke),
        ),
        Shape::Circle {
            center,
            radius,
            fill,
            stroke,
        } => egui::Shape::Circle(CircleShape {
            center: at(origin, *center),
            radius: *radius,
            fill: color32(*fill),
            stroke: stroke.map(stroke32).unwrap_or(egui::Stroke::NONE),
        }),
        Shape::Glyph { .. } => return None,
    };
    Some(shape)
}

fn at(origin: Pos2, point: Point2<f32>) -> Pos2 {
    origin + Vec2::new(point.x, point.y)
}

fn vec2(size: Vector2<f32>) -> Vec2 {
    Vec2::new(size.x, size.y)
}

pub fn color32(color: Color) -> Color32 {
    Color32::from_rgba_unmultiplied(color.r, color.g, color.b, color.a)
}

fn stroke32(stroke: Stroke) -> egui::Stroke {
    egui::Stroke::new(stroke.width, color32(stroke.color))
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_offset_by_origin() {
        let origin = Pos2::new(100.0, 50.0);
        let shape = to_egui(
            origin,
            &Shape::Rect {
                min: Point2::new(10.0, 20.0),
                size: Vector2::new(5.0, 5.0),
                fill: Color::hex(0x2c3e50),
            },
        )
        .unwrap();

        match shape {
            egui::Shape::Rect(rect) => {
                assert_eq!(rect.rect.min, Pos2::new(110.0, 70.0));
                assert_eq!(rect.rect.max, Pos2::new(115.0, 75.0));
                assert_eq!(rect.fill, Color32::from_rgb(0x2c, 0x3e, 0x50));
            }
            other => panic!("expected a rect, got {:?}", other),
        }
    }

    #[test]
    fn test_circle_without_outline() {
        let shape = to_egui(
            Pos2::ZERO,
            &Shape::Circle {
                center: Point2::new(3.0, 4.0),
                radius: 2.0,
                fill: Color::RED,
                stroke: None,
            },
        )
        .unwrap();

        match shape {
            egui::Shape::Circle(circle) => {
                assert_eq!(circle.center, Pos2::new(3.0, 4.0));
                assert_eq!(circle.radius, 2.0);
                assert_eq!(circle.stroke, egui::Stroke::NONE);
            }
            other => panic!("expected a circle, got {:?}", other),
        }
    }

    #[test]
    fn test_glyphs_are_painted_separately() {
        let glyph = Shape::Glyph {
            center: Point2::new(1.0, 1.0),
            size: 12.0,
            text: maze::render::WALKER,
            color: Color::BLACK,
        };
        assert!(to_egui(Pos2::ZERO, &glyph).is_none());
    }
}
