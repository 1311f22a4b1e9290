//! Utility modules
//!
//! - `store`: screenshot artifact directory management

pub mod store;

pub use store::ScreenshotStore;
