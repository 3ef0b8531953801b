use crate::config::AppConfig;
use crate::db::Db;
use crate::error::Result;
use crate::meals::dto::{DailyTotals, Meal, MealLineRequest};
use crate::products::dto::{AddProductRequest, Product};
use crate::settings::dto::{SaveSettingsRequest, Settings};
use crate::{meals, products, settings};

/// The surface screens talk to: validation, normalization and aggregation
/// over one shared [`Db`] handle.
///
/// Holds no state of its own, so it is cheap to clone and one instance per
/// screen is fine.
#[derive(Clone)]
pub struct NutritionService {
    db: Db,
}

impl NutritionService {
    pub fn new(db: Db) -> Self {
        Self { db }
    }

    /// Open the database named by the configuration and wrap it.
    pub async fn open(config: &AppConfig) -> Result<Self> {
        let db = Db::open(config.database_path.clone()).await?;
        Ok(Self::new(db))
    }

    pub async fn add_product(&self, request: AddProductRequest) -> Result<()> {
        products::services::add_product(&self.db, request).await
    }

    pub async fn search_products(&self, query: &str) -> Result<Vec<Product>> {
        products::services::search_products(&self.db, query).await
    }

    pub async fn get_all_products(&self) -> Result<Vec<Product>> {
        products::services::get_all_products(&self.db).await
    }

    pub async fn delete_product(&self, id: u64) -> Result<()> {
        products::services::delete_product(&self.db, id).await
    }

    pub async fn add_meal(&self, lines: Vec<MealLineRequest>) -> Result<()> {
        meals::services::add_meal(&self.db, lines).await
    }

    pub async fn get_meal_history(&self, limit: Option<usize>) -> Result<Vec<Meal>> {
        meals::services::get_meal_history(&self.db, limit).await
    }

    pub async fn get_meals_for_date(
        &self,
        date: &str,
        limit: usize,
        offset: usize,
    ) -> Result<Vec<Meal>> {
        meals::services::get_meals_for_date(&self.db, date, limit, offset).await
    }

    pub fn daily_totals(&self, meals: &[Meal]) -> DailyTotals {
        meals::services::daily_totals(meals)
    }

    pub async fn save_settings(&self, request: SaveSettingsRequest) -> Result<()> {
        settings::services::save_settings(&self.db, request).await
    }

    pub async fn get_settings(&self) -> Result<Settings> {
        settings::services::get_settings(&self.db).await
    }
}
