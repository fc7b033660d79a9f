//! Styling and render plans.
//!
//! Lives alongside core logic so hosts can access `the_lib::render::*`
//! without pulling a separate crate.

pub mod graphics;
pub mod plan;
pub mod theme;

pub use plan::{
  LinePlan,
  MenuPlan,
  RenderPlan,
  RenderSpan,
};
pub use theme::{
  Theme,
  default_theme,
};
