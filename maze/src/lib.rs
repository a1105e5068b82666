//! Grid and point editing for maze images, and the drawing of solver results.
//!
//! Nothing in here talks to the network or paints pixels. The [`Session`]
//! turns events into [`Effect`]s, the frontend carries them out and paints the
//! [`Shape`]s that [`render()`] computes.

pub mod error;
pub mod grid;
pub mod mapper;
pub mod notice;
pub mod placement;
pub mod protocol;
pub mod render;
pub mod request;
pub mod session;

pub use error::{Advisory, Rejection};
pub use grid::{Cell, Grid, GridError, Point};
pub use mapper::{CoordinateMapper, ViewportMapping};
pub use placement::{Placement, Points};
pub use protocol::{GridResponse, SolveRequest, SolveResponse, DEFAULT_THRESHOLD};
pub use render::{render, Color, Overlay, RenderOptions, Shape, Stroke, Substrate};
pub use request::{Generation, PathRequests, Resolution, Ticket};
pub use session::{Catalog, Effect, Event, ImageState, PointerAction, Session, SessionConfig};
