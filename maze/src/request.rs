use log::debug;

use crate::error::Advisory;
use crate::grid::{Grid, Point};
use crate::placement::Points;
use crate::protocol::{SolveRequest, SolveResponse};

/// Identifies the image/grid context. Bumped on every new selection so that
/// responses for an older context can be recognised and dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Generation(u64);

impl Generation {
    pub fn next(self) -> Self {
        Generation(self.0 + 1)
    }
}

/// Attached to every solve request: the context and the point set it was made for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket {
    pub generation: Generation,
    revision: u64,
}

/// What a solver response means for the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// superseded by a newer image, grid or point set
    Stale,
    Found(Vec<Point>),
    NoPath,
    Failed(String),
}

/// Keeps track of the generation and of the solve request in flight
#[derive(Debug, Default)]
pub struct PathRequests {
    generation: Generation,
    revision: u64,
    in_flight: Option<Ticket>,
}

impl PathRequests {
    pub fn generation(&self) -> Generation {
        self.generation
    }

    /// Start a new image/grid context. Everything in flight becomes stale.
    pub fn next_generation(&mut self) -> Generation {
        self.generation = self.generation.next();
        self.in_flight = None;
        debug!("generation is now {:?}", self.generation);
        self.generation
    }

    /// The point set changed, so pending answers no longer apply
    pub fn touch(&mut self) {
        self.revision += 1;
        self.in_flight = None;
    }

    pub fn is_current(&self, ticket: Ticket) -> bool {
        ticket.generation == self.generation && ticket.revision == self.revision
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.is_some()
    }

    /// Prepares the request for the current grid and points. Fails locally,
    /// without anything being sent, unless there is a start and an end.
    pub fn begin(
        &mut self,
        grid: &Grid,
        points: &Points,
    ) -> Result<(Ticket, SolveRequest), Advisory> {
        if points.starts().is_empty() || points.end().is_none() {
            return Err(Advisory::MissingEndpoints);
        }

        let ticket = Ticket {
            generation: self.generation,
            revision: self.revision,
        };
        self.in_flight = Some(ticket);

        Ok((
            ticket,
            SolveRequest {
                grid: grid.clone(),
                starts: points.starts().to_vec(),
                ends: points.ends(),
            },
        ))
    }

    pub fn resolve(
        &mut self,
        ticket: Ticket,
        response: Result<SolveResponse, String>,
    ) -> Resolution {
        if !self.is_current(ticket) {
            debug!("dropping stale solve response for {:?}", ticket);
            return Resolution::Stale;
        }
        if self.in_flight == Some(ticket) {
            self.in_flight = None;
        }

        match response {
            Ok(response) => {
                let path = response.into_path();
                if path.is_empty() {
                    Resolution::NoPath
                } else {
                    Resolution::Found(path)
                }
            }
            Err(e) => Resolution::Failed(e),
        }
    }
}
