//! Viewport placement for dashboard grids.
//!
//! Renderers call [`solve`] with the current config to turn grid units into
//! cell rectangles, and [`item_at`] to resolve drag targets.

mod placement;

pub use self::placement::{GridMetrics, TilePlacement, item_at, solve};
