//! # OZON Report Graphs
//!
//! Chart rendering for the daily OZON report.
//!
//! The crate exposes the [`GraphRenderer`] trait and [`SalesOverviewChart`],
//! a two-panel chart: average order value with ordered units on top, ad spend
//! with cost per order below. Rendering uses plotters' bitmap backend.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod axis;
pub mod sales_overview;
pub mod series;
pub mod traits;
pub mod utils;

pub use axis::*;
pub use sales_overview::*;
pub use series::*;
pub use traits::*;
pub use utils::*;
