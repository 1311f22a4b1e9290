//! image-locator: vision-based UI element locator for mobile test automation
//!
//! Locates a reference query image on a device's screen by repeatedly
//! capturing screenshots and matching against them, with retina coordinate
//! correction, bounds validation, and appear/disappear polling. Built for
//! hybrid, game, and custom-rendered UIs where accessibility identifiers
//! are not available.

pub mod actions;
pub mod capture;
pub mod crop;
pub mod error;
pub mod locator;
pub mod matcher;
pub mod model;
pub mod ocr;
pub mod session;
pub mod util;
