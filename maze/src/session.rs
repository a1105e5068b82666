//! The session is the one place where state lives.
//!
//! The frontend feeds every user action and every backend answer into
//! [`Session::update`] as an [`Event`], one at a time, and executes the
//! [`Effect`]s that come back. Backend answers carry the generation they were
//! requested for; answers for an older generation are dropped.

use std::time::{Duration, Instant};

use log::{debug, info, warn};
use nalgebra::{Point2, Vector2};

use crate::error::{Advisory, Rejection};
use crate::grid::{Grid, Point};
use crate::mapper::CoordinateMapper;
use crate::notice::{Notice, Notices};
use crate::placement::{Placement, Points};
use crate::protocol::{SolveRequest, SolveResponse, DEFAULT_THRESHOLD};
use crate::render::{Overlay, Substrate};
use crate::request::{Generation, PathRequests, Resolution, Ticket};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionConfig {
    pub threshold: u8,
    /// how long placement feedback stays on screen
    pub notice_duration: Duration,
    /// how long every other advisory stays on screen
    pub advisory_duration: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            notice_duration: Duration::from_millis(1200),
            advisory_duration: Duration::from_secs(5),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Catalog {
    #[default]
    Loading,
    Ready(Vec<String>),
    Failed(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ImageState {
    #[default]
    None,
    Loading,
    Loaded {
        width: u32,
        height: u32,
    },
    Failed,
}

/// Primary places a start, secondary places (or moves) the end
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerAction {
    Primary,
    Secondary,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    CatalogLoaded(Result<Vec<String>, String>),
    /// `None` is the empty choice of the image picker
    ImageSelected(Option<String>),
    ThresholdChanged(u8),
    GridLoaded {
        generation: Generation,
        result: Result<Grid, String>,
    },
    /// the native size of the decoded image
    ImageLoaded {
        generation: Generation,
        result: Result<(u32, u32), String>,
    },
    Place {
        action: PointerAction,
        point: Point,
    },
    /// a click at a display-local position on content of the given display size
    Pointer {
        action: PointerAction,
        position: Point2<f32>,
        display: Vector2<f32>,
    },
    SolveRequested,
    SolveFinished {
        ticket: Ticket,
        result: Result<SolveResponse, String>,
    },
    ClearStarts,
    ClearEnds,
    ClearPath,
    ClearAll,
    /// nothing happened except time passing
    Tick,
}

/// Work for the frontend. Every result comes back as an [`Event`].
#[derive(Debug, Clone, PartialEq)]
pub enum Effect {
    LoadCatalog,
    FetchGrid {
        generation: Generation,
        image: String,
        threshold: u8,
    },
    FetchImage {
        generation: Generation,
        image: String,
    },
    Solve {
        ticket: Ticket,
        request: SolveRequest,
    },
}

#[derive(Debug)]
pub struct Session {
    catalog: Catalog,
    selected: Option<String>,
    threshold: u8,
    grid: Option<Grid>,
    grid_loading: bool,
    image: ImageState,
    image_generation: Generation,
    placement: Placement,
    path: Vec<Point>,
    requests: PathRequests,
    notices: Notices,
}

impl Session {
    pub fn new(config: SessionConfig) -> Self {
        Self {
            catalog: Catalog::Loading,
            selected: None,
            threshold: config.threshold,
            grid: None,
            grid_loading: false,
            image: ImageState::None,
            image_generation: Generation::default(),
            placement: Placement::Idle,
            path: Vec::new(),
            requests: PathRequests::default(),
            notices: Notices::new(config.notice_duration, config.advisory_duration),
        }
    }

    /// The effects to run once at startup
    pub fn start(&mut self) -> Vec<Effect> {
        self.catalog = Catalog::Loading;
        vec![Effect::LoadCatalog]
    }

    pub fn update(&mut self, event: Event, now: Instant) -> Vec<Effect> {
        self.notices.expire(now);

        match event {
            Event::CatalogLoaded(Ok(images)) => {
                info!("catalog has {} images", images.len());
                self.catalog = Catalog::Ready(images);
            }
            Event::CatalogLoaded(Err(e)) => {
                self.catalog = Catalog::Failed(e.clone());
                self.advise(Advisory::Catalog(e), now);
            }
            Event::ImageSelected(image) => return self.select(image),
            Event::ThresholdChanged(threshold) => return self.set_threshold(threshold),
            Event::GridLoaded { generation, result } => {
                self.on_grid_loaded(generation, result, now)
            }
            Event::ImageLoaded { generation, result } => {
                if generation != self.image_generation {
                    debug!("dropping stale image for {:?}", generation);
                    return Vec::new();
                }
                match result {
                    Ok((width, height)) => {
                        debug!("image is {}x{}", width, height);
                        self.image = ImageState::Loaded { width, height };
                    }
                    Err(e) => {
                        self.image = ImageState::Failed;
                        self.advise(Advisory::ImageFetch(e), now);
                    }
                }
            }
            Event::Place { action, point } => self.place(action, point, now),
            Event::Pointer {
                action,
                position,
                display,
            } => {
                let Some(grid) = &self.grid else {
                    return Vec::new();
                };
                let Some(mapper) = CoordinateMapper::new(display, grid.rows(), grid.columns())
                else {
                    debug!("ignoring pointer without a usable display size {:?}", display);
                    return Vec::new();
                };
                self.place(action, mapper.to_grid(position), now);
            }
            Event::SolveRequested => return self.solve(now),
            Event::SolveFinished { ticket, result } => {
                match self.requests.resolve(ticket, result) {
                    Resolution::Stale => {}
                    Resolution::Found(path) => {
                        info!("solver found a path of {} cells", path.len());
                        self.path = path;
                    }
                    Resolution::NoPath => {
                        self.path.clear();
                        self.advise(Advisory::NoPathFound, now);
                    }
                    Resolution::Failed(e) => self.advise(Advisory::SolveTransport(e), now),
                }
            }
            Event::ClearStarts => {
                self.placement.clear_starts();
                self.invalidate_path();
                self.notices.dismiss();
            }
            Event::ClearEnds => {
                self.placement.clear_ends();
                self.invalidate_path();
                self.notices.dismiss();
            }
            Event::ClearPath => {
                self.invalidate_path();
                self.notices.dismiss();
            }
            Event::ClearAll => {
                self.placement.clear_all();
                self.invalidate_path();
                self.notices.dismiss();
            }
            Event::Tick => {}
        }

        Vec::new()
    }

    fn advise(&mut self, advisory: Advisory, now: Instant) {
        warn!("{}", advisory);
        self.notices.post(advisory, now);
    }

    /// Any pending solve answer is for a point set that no longer exists
    fn invalidate_path(&mut self) {
        self.path.clear();
        self.requests.touch();
    }

    /// Back to `Idle` with a fresh generation, so nothing in flight lands
    fn reset_grid(&mut self) -> Generation {
        self.placement.reset();
        self.path.clear();
        self.grid = None;
        self.grid_loading = false;
        self.requests.next_generation()
    }

    fn select(&mut self, image: Option<String>) -> Vec<Effect> {
        debug!("selected image {:?}", image);
        let generation = self.reset_grid();
        self.image_generation = self.image_generation.next();
        self.notices.dismiss();
        self.selected = image.clone();

        let Some(image) = image else {
            self.image = ImageState::None;
            return Vec::new();
        };

        self.grid_loading = true;
        self.image = ImageState::Loading;
        vec![
            Effect::FetchGrid {
                generation,
                image: image.clone(),
                threshold: self.threshold,
            },
            Effect::FetchImage {
                generation: self.image_generation,
                image,
            },
        ]
    }

    /// Same as selecting the current image again, but the preview is kept
    fn set_threshold(&mut self, threshold: u8) -> Vec<Effect> {
        if threshold == self.threshold {
            return Vec::new();
        }
        debug!("threshold {} -> {}", self.threshold, threshold);
        self.threshold = threshold;

        let Some(image) = self.selected.clone() else {
            return Vec::new();
        };
        let generation = self.reset_grid();
        self.grid_loading = true;
        vec![Effect::FetchGrid {
            generation,
            image,
            threshold,
        }]
    }

    fn on_grid_loaded(
        &mut self,
        generation: Generation,
        result: Result<Grid, String>,
        now: Instant,
    ) {
        if generation != self.requests.generation() {
            debug!("dropping stale grid for {:?}", generation);
            return;
        }
        self.grid_loading = false;

        match result {
            Ok(grid) => {
                info!(
                    "loaded {}x{} grid with {} open cells",
                    grid.rows(),
                    grid.columns(),
                    grid.open_cells()
                );
                self.grid = Some(grid);
                self.path.clear();
                self.placement.ready();
            }
            Err(e) => {
                self.grid = None;
                self.placement.reset();
                self.advise(Advisory::GridFetch(e), now);
            }
        }
    }

    fn place(&mut self, action: PointerAction, point: Point, now: Instant) {
        let result = match &self.grid {
            None => Err(Rejection::NoGrid),
            Some(grid) => match action {
                PointerAction::Primary => self.placement.place_start(grid, point),
                PointerAction::Secondary => self.placement.place_end(grid, point),
            },
        };

        match result {
            Ok(()) => self.invalidate_path(),
            Err(rejection) => self.advise(rejection.into(), now),
        }
    }

    fn solve(&mut self, now: Instant) -> Vec<Effect> {
        let begun = match (&self.grid, self.placement.points()) {
            (Some(grid), Some(points)) => self.requests.begin(grid, points),
            _ => Err(Advisory::MissingEndpoints),
        };

        match begun {
            Ok((ticket, request)) => {
                debug!(
                    "solving {} starts -> {:?}",
                    request.starts.len(),
                    request.ends
                );
                self.notices.dismiss();
                vec![Effect::Solve { ticket, request }]
            }
            Err(advisory) => {
                self.advise(advisory, now);
                Vec::new()
            }
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn threshold(&self) -> u8 {
        self.threshold
    }

    pub fn grid(&self) -> Option<&Grid> {
        self.grid.as_ref()
    }

    pub fn is_grid_loading(&self) -> bool {
        self.grid_loading
    }

    pub fn image(&self) -> ImageState {
        self.image
    }

    pub fn image_generation(&self) -> Generation {
        self.image_generation
    }

    pub fn placement(&self) -> &Placement {
        &self.placement
    }

    pub fn points(&self) -> Option<&Points> {
        self.placement.points()
    }

    pub fn path(&self) -> &[Point] {
        &self.path
    }

    pub fn is_solving(&self) -> bool {
        self.requests.is_in_flight()
    }

    pub fn generation(&self) -> Generation {
        self.requests.generation()
    }

    pub fn notice(&self, now: Instant) -> Option<&Notice> {
        self.notices.current(now)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.notices.next_deadline()
    }

    /// Falls back to drawing the grid while the photo is unavailable
    pub fn substrate(&self, preferred: Substrate) -> Substrate {
        match (preferred, self.image) {
            (Substrate::Image, ImageState::Loaded { .. }) => Substrate::Image,
            _ => Substrate::Grid,
        }
    }

    /// The native size of what is drawn, in its own pixels (grid cells count
    /// as one pixel). `None` until there is something to draw.
    pub fn content_size(&self, substrate: Substrate) -> Option<Vector2<f32>> {
        let grid = self.grid.as_ref()?;
        match (substrate, self.image) {
            (Substrate::Image, ImageState::Loaded { width, height }) => {
                Some(Vector2::new(width as f32, height as f32))
            }
            (Substrate::Image, _) => None,
            (Substrate::Grid, _) => Some(Vector2::new(grid.columns() as f32, grid.rows() as f32)),
        }
    }

    pub fn overlay(&self, hover: Option<Point>) -> Option<Overlay<'_>> {
        let grid = self.grid.as_ref()?;
        let (starts, end) = match self.placement.points() {
            Some(points) => (points.starts(), points.end()),
            None => (&[][..], None),
        };
        Some(Overlay {
            grid,
            starts,
            end,
            path: &self.path,
            hover,
        })
    }
}

impl Default for Session {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}
