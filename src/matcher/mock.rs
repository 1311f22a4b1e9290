//! Mock image matcher for testing
//!
//! Returns a scripted sequence of outcomes and counts calls, so tests can
//! assert exactly how many attempts the locator loop performed and when it
//! short-circuited.

use std::collections::VecDeque;
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use crate::{
    error::{LocatorError, LocatorResult},
    model::ScreenLocation,
};

use super::ImageMatcher;

/// One scripted matcher outcome
#[derive(Debug, Clone)]
enum Outcome {
    Found(ScreenLocation),
    NotFound,
    Error,
}

/// Mock matcher with a scripted outcome sequence and call counting
///
/// The script is consumed call by call; once exhausted, the fallback
/// outcome repeats forever.
#[derive(Debug)]
pub struct MockMatcher {
    script:   Mutex<VecDeque<Outcome>>,
    fallback: Outcome,
    calls:    AtomicU32,
}

impl MockMatcher {
    /// Matcher that never finds the query
    pub fn never_found() -> Self {
        Self {
            script:   Mutex::new(VecDeque::new()),
            fallback: Outcome::NotFound,
            calls:    AtomicU32::new(0),
        }
    }

    /// Matcher that reports `location` on every call
    pub fn always_found(location: ScreenLocation) -> Self {
        Self {
            script:   Mutex::new(VecDeque::new()),
            fallback: Outcome::Found(location),
            calls:    AtomicU32::new(0),
        }
    }

    /// Matcher that misses `misses` times, then reports `location` forever
    pub fn found_after(misses: u32, location: ScreenLocation) -> Self {
        Self {
            script:   Mutex::new((0..misses).map(|_| Outcome::NotFound).collect()),
            fallback: Outcome::Found(location),
            calls:    AtomicU32::new(0),
        }
    }

    /// Matcher that fails with an error `errors` times, then reports
    /// `location` forever
    pub fn erroring_first(errors: u32, location: ScreenLocation) -> Self {
        Self {
            script:   Mutex::new((0..errors).map(|_| Outcome::Error).collect()),
            fallback: Outcome::Found(location),
            calls:    AtomicU32::new(0),
        }
    }

    /// Matcher that reports `location` for the first `hits` calls, then
    /// misses forever (disappearance scenarios)
    pub fn lost_after(hits: u32, location: ScreenLocation) -> Self {
        Self {
            script:   Mutex::new((0..hits).map(|_| Outcome::Found(location)).collect()),
            fallback: Outcome::NotFound,
            calls:    AtomicU32::new(0),
        }
    }

    /// Number of find calls made so far
    pub fn call_count(&self) -> u32 {
        self.calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self) -> Outcome {
        self.script
            .lock()
            .expect("matcher script lock poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone())
    }
}

#[async_trait]
impl ImageMatcher for MockMatcher {
    async fn find(
        &self,
        _query: &Path,
        _scene: &Path,
        _tolerance: f64,
    ) -> LocatorResult<Option<ScreenLocation>> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        match self.next_outcome() {
            Outcome::Found(location) => Ok(Some(location)),
            Outcome::NotFound => Ok(None),
            Outcome::Error => Err(LocatorError::ImageError(
                "scripted matcher failure".to_string(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Point;

    fn location() -> ScreenLocation {
        ScreenLocation::from_corners(
            Point::new(10.0, 20.0),
            Point::new(110.0, 20.0),
            Point::new(10.0, 70.0),
            Point::new(110.0, 70.0),
        )
    }

    #[tokio::test]
    async fn test_never_found() {
        let matcher = MockMatcher::never_found();
        let query = Path::new("query.png");
        let scene = Path::new("scene.png");

        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_none());
        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_none());
        assert_eq!(matcher.call_count(), 2);
    }

    #[tokio::test]
    async fn test_found_after_misses() {
        let matcher = MockMatcher::found_after(2, location());
        let query = Path::new("query.png");
        let scene = Path::new("scene.png");

        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_none());
        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_none());
        let hit = matcher.find(query, scene, 0.6).await.unwrap();
        assert_eq!(hit, Some(location()));
        assert_eq!(matcher.call_count(), 3);
    }

    #[tokio::test]
    async fn test_erroring_first() {
        let matcher = MockMatcher::erroring_first(1, location());
        let query = Path::new("query.png");
        let scene = Path::new("scene.png");

        assert!(matcher.find(query, scene, 0.6).await.is_err());
        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn test_lost_after_hits() {
        let matcher = MockMatcher::lost_after(3, location());
        let query = Path::new("query.png");
        let scene = Path::new("scene.png");

        for _ in 0..3 {
            assert!(matcher.find(query, scene, 0.6).await.unwrap().is_some());
        }
        assert!(matcher.find(query, scene, 0.6).await.unwrap().is_none());
    }
}
