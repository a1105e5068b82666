use std::time::{Duration, Instant};

use crate::error::Advisory;

/// An advisory together with the moment it stops being shown
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub advisory: Advisory,
    pub expires_at: Instant,
}

/// Holds the single notice on screen. A newer notice replaces the older one.
#[derive(Debug, Clone)]
pub struct Notices {
    transient: Duration,
    advisory: Duration,
    current: Option<Notice>,
}

impl Notices {
    pub fn new(transient: Duration, advisory: Duration) -> Self {
        Self {
            transient,
            advisory,
            current: None,
        }
    }

    pub fn post(&mut self, advisory: Advisory, now: Instant) {
        let ttl = if advisory.is_transient() {
            self.transient
        } else {
            self.advisory
        };
        self.current = Some(Notice {
            advisory,
            expires_at: now + ttl,
        });
    }

    pub fn dismiss(&mut self) {
        self.current = None;
    }

    /// Drops the notice once it has expired
    pub fn expire(&mut self, now: Instant) {
        if self.current.as_ref().is_some_and(|n| n.expires_at <= now) {
            self.current = None;
        }
    }

    pub fn current(&self, now: Instant) -> Option<&Notice> {
        self.current.as_ref().filter(|n| n.expires_at > now)
    }

    /// When the frontend has to wake up again to hide the notice
    pub fn next_deadline(&self) -> Option<Instant> {
        self.current.as_ref().map(|n| n.expires_at)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::Rejection;

    #[test]
    fn test_rejections_expire_first() {
        let now = Instant::now();
        let mut notices = Notices::new(Duration::from_millis(1200), Duration::from_secs(5));

        notices.post(Rejection::Wall.into(), now);
        assert!(notices.current(now + Duration::from_millis(1199)).is_some());
        assert!(notices.current(now + Duration::from_millis(1200)).is_none());

        notices.post(Advisory::NoPathFound, now);
        assert_eq!(
            notices.current(now + Duration::from_secs(2)).unwrap().advisory,
            Advisory::NoPathFound
        );

        notices.expire(now + Duration::from_secs(5));
        assert_eq!(notices.next_deadline(), None);
    }

    #[test]
    fn test_newer_replaces_older() {
        let now = Instant::now();
        let mut notices = Notices::new(Duration::from_millis(1200), Duration::from_secs(5));
        notices.post(Advisory::MissingEndpoints, now);
        notices.post(Rejection::Duplicate.into(), now);
        assert_eq!(
            notices.current(now).unwrap().advisory,
            Advisory::PlacementRejected(Rejection::Duplicate)
        );
        notices.dismiss();
        assert!(notices.current(now).is_none());
    }
}
