//! Adaptive energy expenditure and macro targets for a nutrition tracker.
//!
//! The estimators ([`energy`], [`expenditure`], [`targets`]) are pure
//! functions over values the caller supplies. [`client::NutritionClient`]
//! reads those values from the backend, runs a check-in through
//! [`checkin::plan_check_in`], and stores the result.

pub mod auth;
pub mod checkin;
pub mod client;
pub mod config;
pub mod energy;
pub mod expenditure;
pub mod models;
pub mod postgrest;
pub mod summary;
pub mod targets;
pub mod units;

pub use checkin::{plan_check_in, CheckInPlan, CheckInRequest};
pub use client::NutritionClient;
pub use energy::{bmr, initial_tdee, static_tdee, TdeeBasis};
pub use expenditure::estimate_expenditure;
pub use models::*;
pub use targets::macro_targets;
