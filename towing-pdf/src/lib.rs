//! Printable reports: a full contract listing and a weekly schedule.
//!
//! Row and section construction is pure and tested; the actual PDF layout is
//! a thin layer over genpdf and only fails when the rendering library does.

mod render;
mod rows;

pub use render::*;
pub use rows::*;
