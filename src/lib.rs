//! Local calorie and macro tracker.
//!
//! Products are logged with per-100g nutrient values, meals are composed
//! from products (with a denormalized name snapshot per line), and daily
//! totals are tracked against configurable goals. Everything persists to a
//! single embedded redb database; [`NutritionService`] is the surface the
//! UI screens talk to.

pub mod config;
pub mod db;
pub mod error;
pub mod meals;
pub mod products;
pub mod service;
pub mod settings;

pub use config::AppConfig;
pub use db::Db;
pub use error::{Error, Result};
pub use service::NutritionService;
