//! # OZON Report Bot
//!
//! Builds the daily OZON sales report and delivers it to Telegram.
//!
//! The [`ReportJob`] fetches sales and ad spend, sends a summary of the last
//! two days and a two-panel chart of the whole window.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod pipeline;
pub mod sources;
pub mod startup;
pub mod summary;
pub mod telegram;

pub use error::*;
pub use pipeline::*;
pub use sources::*;
pub use startup::*;
pub use summary::*;
pub use telegram::*;
