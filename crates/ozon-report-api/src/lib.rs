//! # OZON Report API
//!
//! HTTP clients for the two OZON APIs the report depends on:
//!
//! - [`SellerClient`] reads daily revenue and ordered units from the Seller
//!   analytics endpoint.
//! - [`PerformanceClient`] authenticates against the Performance (advertising)
//!   API and collects daily ad spend for the seller's campaigns.
//!
//! Response normalization for the ads statistics lives in [`spend`].

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]

pub mod models;
pub mod performance;
pub mod seller;
pub mod spend;

pub use models::{AccessToken, Campaign};
pub use performance::{select_campaign_ids, PerformanceClient};
pub use seller::SellerClient;
pub use spend::{parse_spend_csv, parse_spend_json};
