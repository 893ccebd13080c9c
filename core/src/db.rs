use std::path::Path;

use chrono::NaiveTime;
use log::debug;
use rusqlite::{Connection, OptionalExtension, Row, Transaction, params, types::Type};

use crate::error::Result;
use crate::models::{Category, Ingredient, NewRecipe, Recipe, Step, Unit};

/// Times of day are stored as text, like every other temporal column.
const TIME_FORMAT: &str = "%H:%M:%S";

pub struct Database {
    conn: Connection,
}

impl Database {
    pub fn open(path: &Path) -> Result<Self> {
        let conn = Connection::open(path)?;
        Ok(Database { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        Ok(Database { conn })
    }

    /// Runs a sequence of statements as one atomic unit: a single
    /// transaction, committed only if every statement succeeds. On any
    /// failure the transaction is dropped, which rolls the whole batch back —
    /// no partial application is ever observable. Statements run in the
    /// order given; there is no statement-level retry.
    pub fn execute_batch(&mut self, statements: &[String]) -> Result<()> {
        let tx = self.conn.transaction()?;
        for statement in statements {
            debug!("executing: {statement}");
            tx.execute_batch(statement)?;
        }
        tx.commit()?;
        Ok(())
    }

    /// Fetches one recipe with all three child collections hydrated inside a
    /// single transaction. An unknown id is `Ok(None)`, not an error; the
    /// transaction is released without issuing the child queries. A failure
    /// in any of the four queries rolls everything back and no recipe is
    /// returned.
    pub fn fetch_recipe_by_id(&mut self, recipe_id: i64) -> Result<Option<Recipe>> {
        let tx = self.conn.transaction()?;

        let recipe = tx
            .query_row(
                "SELECT recipe_id, recipe_name, notes, num_servings, prep_time, cook_time
                 FROM recipe WHERE recipe_id = ?1",
                params![recipe_id],
                recipe_from_row,
            )
            .optional()?;

        let Some(mut recipe) = recipe else {
            return Ok(None);
        };

        recipe.categories = fetch_recipe_categories(&tx, recipe_id)?;
        recipe.ingredients = fetch_recipe_ingredients(&tx, recipe_id)?;
        recipe.steps = fetch_recipe_steps(&tx, recipe_id)?;

        tx.commit()?;
        Ok(Some(recipe))
    }

    /// Shallow listing ordered by name: bare recipe rows, empty child
    /// collections. Callers needing the full graph fetch by id per recipe.
    pub fn fetch_all_recipes(&mut self) -> Result<Vec<Recipe>> {
        let tx = self.conn.transaction()?;
        let recipes = {
            let mut stmt = tx.prepare(
                "SELECT recipe_id, recipe_name, notes, num_servings, prep_time, cook_time
                 FROM recipe ORDER BY recipe_name",
            )?;
            stmt.query_map([], recipe_from_row)?
                .collect::<rusqlite::Result<Vec<_>>>()?
        };
        tx.commit()?;
        Ok(recipes)
    }

    /// Inserts a bare recipe row and returns it with the store-assigned id
    /// and empty child collections. Steps, ingredients, and categories are
    /// never written here.
    pub fn insert_recipe(&mut self, recipe: &NewRecipe) -> Result<Recipe> {
        let tx = self.conn.transaction()?;
        tx.execute(
            "INSERT INTO recipe (recipe_name, notes, num_servings, prep_time, cook_time)
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                recipe.name,
                recipe.notes,
                recipe.num_servings,
                recipe.prep_time.format(TIME_FORMAT).to_string(),
                recipe.cook_time.format(TIME_FORMAT).to_string(),
            ],
        )?;
        let id = tx.last_insert_rowid();
        tx.commit()?;

        Ok(Recipe {
            id,
            name: recipe.name.clone(),
            notes: recipe.notes.clone(),
            num_servings: recipe.num_servings,
            prep_time: recipe.prep_time,
            cook_time: recipe.cook_time,
            steps: Vec::new(),
            ingredients: Vec::new(),
            categories: Vec::new(),
        })
    }
}

// --- Hydration queries, scoped to the caller's live transaction ---

fn fetch_recipe_categories(tx: &Transaction, recipe_id: i64) -> Result<Vec<Category>> {
    let mut stmt = tx.prepare(
        "SELECT DISTINCT c.category_id, c.category_name
         FROM recipe_category rc
         JOIN category c ON rc.category_id = c.category_id
         WHERE rc.recipe_id = ?1",
    )?;
    let categories = stmt
        .query_map(params![recipe_id], category_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(categories)
}

fn fetch_recipe_ingredients(tx: &Transaction, recipe_id: i64) -> Result<Vec<Ingredient>> {
    let mut stmt = tx.prepare(
        "SELECT i.ingredient_id, i.recipe_id, i.ingredient_order, i.amount, i.name,
                i.unit_id, u.unit_name_singular, u.unit_name_plural
         FROM ingredient i
         LEFT JOIN unit u ON i.unit_id = u.unit_id
         WHERE i.recipe_id = ?1
         ORDER BY i.ingredient_order",
    )?;
    let ingredients = stmt
        .query_map(params![recipe_id], ingredient_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(ingredients)
}

fn fetch_recipe_steps(tx: &Transaction, recipe_id: i64) -> Result<Vec<Step>> {
    let mut stmt = tx.prepare(
        "SELECT step_id, recipe_id, step_order, step_text
         FROM step WHERE recipe_id = ?1
         ORDER BY step_order",
    )?;
    let steps = stmt
        .query_map(params![recipe_id], step_from_row)?
        .collect::<rusqlite::Result<Vec<_>>>()?;
    Ok(steps)
}

// --- Row mapping, one function per entity ---

fn recipe_from_row(row: &Row) -> rusqlite::Result<Recipe> {
    Ok(Recipe {
        id: row.get(0)?,
        name: row.get(1)?,
        notes: row.get(2)?,
        num_servings: row.get(3)?,
        prep_time: time_from_column(row, 4)?,
        cook_time: time_from_column(row, 5)?,
        steps: Vec::new(),
        ingredients: Vec::new(),
        categories: Vec::new(),
    })
}

fn category_from_row(row: &Row) -> rusqlite::Result<Category> {
    Ok(Category {
        id: row.get(0)?,
        name: row.get(1)?,
    })
}

fn step_from_row(row: &Row) -> rusqlite::Result<Step> {
    Ok(Step {
        id: row.get(0)?,
        recipe_id: row.get(1)?,
        step_order: row.get(2)?,
        step_text: row.get(3)?,
    })
}

fn ingredient_from_row(row: &Row) -> rusqlite::Result<Ingredient> {
    // A NULL unit_id is a valid unitless ingredient. A non-NULL unit_id with
    // no matching unit row fails on the name columns instead of producing a
    // partial Unit.
    let unit = match row.get::<_, Option<i64>>(5)? {
        Some(unit_id) => Some(Unit {
            id: unit_id,
            name_singular: row.get(6)?,
            name_plural: row.get(7)?,
        }),
        None => None,
    };
    Ok(Ingredient {
        id: row.get(0)?,
        recipe_id: row.get(1)?,
        ingredient_order: row.get(2)?,
        amount: row.get(3)?,
        name: row.get(4)?,
        unit,
    })
}

fn time_from_column(row: &Row, idx: usize) -> rusqlite::Result<NaiveTime> {
    let text: String = row.get(idx)?;
    NaiveTime::parse_from_str(&text, TIME_FORMAT)
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}
