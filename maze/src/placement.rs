use log::debug;

use crate::error::Rejection;
use crate::grid::{Grid, Point};

/// The user placed start points (in insertion order) and the single end point
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Points {
    starts: Vec<Point>,
    end: Option<Point>,
}

impl Points {
    pub fn starts(&self) -> &[Point] {
        &self.starts
    }

    pub fn end(&self) -> Option<Point> {
        self.end
    }

    /// The end as a set, which is what the solver expects
    pub fn ends(&self) -> Vec<Point> {
        self.end.into_iter().collect()
    }

    pub fn is_start(&self, point: Point) -> bool {
        self.starts.contains(&point)
    }

    pub fn is_empty(&self) -> bool {
        self.starts.is_empty() && self.end.is_none()
    }
}

/// Placement is only possible once a grid has been loaded
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Placement {
    #[default]
    Idle,
    Ready(Points),
}

impl Placement {
    pub fn is_ready(&self) -> bool {
        matches!(self, Placement::Ready(_))
    }

    /// Enter `Ready` with empty point sets
    pub fn ready(&mut self) {
        *self = Placement::Ready(Points::default());
    }

    /// Back to `Idle`, dropping all points
    pub fn reset(&mut self) {
        *self = Placement::Idle;
    }

    pub fn points(&self) -> Option<&Points> {
        match self {
            Placement::Idle => None,
            Placement::Ready(points) => Some(points),
        }
    }

    fn points_mut(&mut self) -> Result<&mut Points, Rejection> {
        match self {
            Placement::Idle => Err(Rejection::NoGrid),
            Placement::Ready(points) => Ok(points),
        }
    }

    pub fn place_start(&mut self, grid: &Grid, point: Point) -> Result<(), Rejection> {
        let points = self.points_mut()?;
        if !grid.is_open(point) {
            return Err(Rejection::Wall);
        }
        if points.is_start(point) || points.end == Some(point) {
            return Err(Rejection::Duplicate);
        }

        points.starts.push(point);
        debug!("placed start {} ({} starts)", point, points.starts.len());
        Ok(())
    }

    /// Replaces any previous end point
    pub fn place_end(&mut self, grid: &Grid, point: Point) -> Result<(), Rejection> {
        let points = self.points_mut()?;
        if !grid.is_open(point) {
            return Err(Rejection::Wall);
        }
        if points.is_start(point) {
            return Err(Rejection::Duplicate);
        }

        if let Some(previous) = points.end.replace(point) {
            debug!("replaced end {} with {}", previous, point);
        } else {
            debug!("placed end {}", point);
        }
        Ok(())
    }

    pub fn clear_starts(&mut self) {
        if let Placement::Ready(points) = self {
            points.starts.clear();
        }
    }

    pub fn clear_ends(&mut self) {
        if let Placement::Ready(points) = self {
            points.end = None;
        }
    }

    pub fn clear_all(&mut self) {
        if let Placement::Ready(points) = self {
            *points = Points::default();
        }
    }
}
