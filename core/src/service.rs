use std::path::Path;

use log::info;

use crate::db::Database;
use crate::error::{CatalogError, Result};
use crate::models::{NewRecipe, Recipe};
use crate::script;

const SCHEMA_SQL: &str = include_str!("../sql/recipe_schema.sql");
const DATA_SQL: &str = include_str!("../sql/recipe_data.sql");

/// Facade over the catalog for front ends: script loading, aggregate
/// fetches, and recipe insertion. Explicitly constructed, no shared state.
pub struct CatalogService {
    db: Database,
}

impl CatalogService {
    pub fn new(db_path: &Path) -> Result<Self> {
        let db = Database::open(db_path)?;
        Ok(Self { db })
    }

    pub fn new_in_memory() -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self { db })
    }

    /// Drops, recreates, and seeds all tables. The schema script must run
    /// before the data script: the seed inserts assume the tables exist.
    pub fn create_and_populate(&mut self) -> Result<()> {
        self.load_script("recipe_schema.sql", SCHEMA_SQL)?;
        self.load_script("recipe_data.sql", DATA_SQL)
    }

    fn load_script(&mut self, name: &str, content: &str) -> Result<()> {
        let statements = script::tokenize(content);
        info!("running {} statements from {name}", statements.len());
        self.db.execute_batch(&statements)
    }

    /// Fetches a fully hydrated recipe; an unknown id is a `NotFound` error
    /// here, unlike the db layer's `Ok(None)`.
    pub fn fetch_recipe_by_id(&mut self, recipe_id: i64) -> Result<Recipe> {
        self.db
            .fetch_recipe_by_id(recipe_id)?
            .ok_or(CatalogError::NotFound { recipe_id })
    }

    pub fn fetch_all_recipes(&mut self) -> Result<Vec<Recipe>> {
        self.db.fetch_all_recipes()
    }

    pub fn add_recipe(&mut self, recipe: &NewRecipe) -> Result<Recipe> {
        self.db.insert_recipe(recipe)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn seeded_service() -> CatalogService {
        let mut service = CatalogService::new_in_memory().unwrap();
        service.create_and_populate().unwrap();
        service
    }

    #[test]
    fn create_and_populate_seeds_the_catalog() {
        let mut service = seeded_service();
        let recipes = service.fetch_all_recipes().unwrap();
        assert_eq!(recipes.len(), 2);
        // Shallow listing is name-ordered.
        assert_eq!(recipes[0].name, "Buttermilk Pancakes");
        assert_eq!(recipes[1].name, "Weeknight Chili");
    }

    #[test]
    fn create_and_populate_resets_existing_data() {
        let mut service = seeded_service();
        let extra = NewRecipe::from_input("Extra", None, "2", "5", "5").unwrap();
        service.add_recipe(&extra).unwrap();
        assert_eq!(service.fetch_all_recipes().unwrap().len(), 3);

        service.create_and_populate().unwrap();
        assert_eq!(service.fetch_all_recipes().unwrap().len(), 2);
    }

    #[test]
    fn seeded_recipe_hydrates_fully() {
        let mut service = seeded_service();
        let pancakes = service.fetch_recipe_by_id(1).unwrap();
        assert_eq!(pancakes.name, "Buttermilk Pancakes");
        assert_eq!(pancakes.steps.len(), 4);
        assert_eq!(pancakes.ingredients.len(), 5);
        assert_eq!(pancakes.categories.len(), 2);

        // Step order is dense and ascending.
        let orders: Vec<i64> = pancakes.steps.iter().map(|s| s.step_order).collect();
        assert_eq!(orders, vec![1, 2, 3, 4]);

        // The counted ingredient carries no unit.
        let eggs = pancakes
            .ingredients
            .iter()
            .find(|i| i.name == "eggs")
            .unwrap();
        assert!(eggs.unit.is_none());
    }

    #[test]
    fn missing_recipe_is_not_found() {
        let mut service = seeded_service();
        let err = service.fetch_recipe_by_id(42).unwrap_err();
        assert!(matches!(err, CatalogError::NotFound { recipe_id: 42 }));
    }

    #[test]
    fn added_recipe_comes_back_with_an_id() {
        let mut service = seeded_service();
        let new = NewRecipe::from_input("Oatmeal", Some("steel-cut"), "2", "", "25").unwrap();
        let added = service.add_recipe(&new).unwrap();
        assert!(added.id > 0);

        let fetched = service.fetch_recipe_by_id(added.id).unwrap();
        assert_eq!(fetched.name, "Oatmeal");
        assert_eq!(fetched.num_servings, 2);
        assert!(fetched.steps.is_empty());
    }
}
