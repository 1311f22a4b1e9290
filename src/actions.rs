//! Caller-side conveniences combining the engine with a device session
//!
//! These helpers wrap the common "locate, then act" flows of a UI test
//! script. They live outside the engine on purpose: the engine never holds
//! a session, the caller passes one in.

use std::path::Path;

use tracing::info;

use crate::{
    error::LocatorResult,
    locator::LocatorEngine,
    model::{Dimension, LocatorSettings, SearchResult},
    session::DeviceSession,
};

/// Finds `query` on screen and taps the center of the match
///
/// Returns the search result unchanged; when the image was not found no
/// tap is performed and the caller decides whether that fails the test.
pub async fn find_and_tap(
    engine: &LocatorEngine,
    session: &dyn DeviceSession,
    query: &Path,
    settings: &LocatorSettings,
    screen: Dimension,
) -> LocatorResult<SearchResult> {
    let result = engine.find_on_screen(query, settings, screen).await?;

    if let Some(location) = result.location() {
        info!(x = location.center.x, y = location.center.y, "tapping located image");
        session.tap(location.center.x, location.center.y).await?;
    }

    Ok(result)
}

/// Hides the keyboard, then finds `query` on screen
///
/// An open keyboard covers the lower half of most apps; dismissing it
/// before searching avoids matching against a stale occluded layout.
pub async fn hide_keyboard_and_find(
    engine: &LocatorEngine,
    session: &dyn DeviceSession,
    query: &Path,
    settings: &LocatorSettings,
    screen: Dimension,
) -> LocatorResult<SearchResult> {
    session.hide_keyboard().await?;
    engine.find_on_screen(query, settings, screen).await
}
