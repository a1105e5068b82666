//! Request and response bodies exchanged with the backend.

use serde::{Deserialize, Serialize};

use crate::grid::{Grid, Point};

/// Default binarization threshold used by the extraction service
pub const DEFAULT_THRESHOLD: u8 = 200;

/// `GET /grid?img=<id>&threshold=<int>`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GridResponse {
    pub grid: Grid,
}

/// `POST /astar`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveRequest {
    pub grid: Grid,
    pub starts: Vec<Point>,
    pub ends: Vec<Point>,
}

/// The solver answers `null` as well as `[]` when there is no route
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SolveResponse {
    #[serde(default)]
    pub path: Option<Vec<Point>>,
}

impl SolveResponse {
    pub fn into_path(self) -> Vec<Point> {
        self.path.unwrap_or_default()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_grid_response() {
        let response: GridResponse =
            serde_json::from_str(r#"{"grid": [[1, 0], [1, 1]]}"#).unwrap();
        assert_eq!(response.grid.rows(), 2);
        assert!(!response.grid.is_open(Point::new(0, 1)));
    }

    #[test]
    fn test_solve_request_body() {
        let request = SolveRequest {
            grid: Grid::parse(".#\n..").unwrap(),
            starts: vec![Point::new(0, 0)],
            ends: vec![Point::new(1, 1)],
        };
        assert_eq!(
            serde_json::to_value(&request).unwrap(),
            serde_json::json!({
                "grid": [[1, 0], [1, 1]],
                "starts": [[0, 0]],
                "ends": [[1, 1]],
            })
        );
    }

    #[test]
    fn test_solve_response_variants() {
        let found: SolveResponse =
            serde_json::from_str(r#"{"path": [[0, 0], [1, 0], [1, 1]]}"#).unwrap();
        assert_eq!(
            found.into_path(),
            vec![Point::new(0, 0), Point::new(1, 0), Point::new(1, 1)]
        );

        for body in [r#"{"path": []}"#, r#"{"path": null}"#, "{}"] {
            let response: SolveResponse = serde_json::from_str(body).unwrap();
            assert!(response.into_path().is_empty(), "{body}");
        }
    }
}
