use anyhow::Result;
use std::process;
use tabled::{
    Table, Tabled,
    settings::{Alignment, Modify, Style, object::Columns},
};

use larder_core::error::CatalogError;
use larder_core::models::{NewRecipe, Recipe};
use larder_core::service::CatalogService;

pub(crate) fn cmd_init(service: &mut CatalogService) -> Result<()> {
    service.create_and_populate()?;
    println!("Tables created and populated.");
    Ok(())
}

pub(crate) fn cmd_add(
    service: &mut CatalogService,
    name: &str,
    notes: Option<&str>,
    servings: &str,
    prep: &str,
    cook: &str,
    json: bool,
) -> Result<()> {
    let new_recipe = NewRecipe::from_input(name, notes, servings, prep, cook)?;
    let recipe = service.add_recipe(&new_recipe)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
    } else {
        let id = recipe.id;
        println!("Recipe added: {name} (id: {id})");
    }
    Ok(())
}

pub(crate) fn cmd_list(service: &mut CatalogService, json: bool) -> Result<()> {
    let recipes = service.fetch_all_recipes()?;

    if json {
        println!("{}", serde_json::to_string_pretty(&recipes)?);
        return Ok(());
    }

    if recipes.is_empty() {
        println!("No recipes. Seed the catalog with: larder init");
        return Ok(());
    }
    print_recipe_table(&recipes);
    Ok(())
}

pub(crate) fn cmd_show(service: &mut CatalogService, recipe_id: i64, json: bool) -> Result<()> {
    let recipe = match service.fetch_recipe_by_id(recipe_id) {
        Ok(recipe) => recipe,
        Err(CatalogError::NotFound { .. }) => {
            if json {
                println!(
                    "{}",
                    serde_json::json!({ "error": format!("Recipe {recipe_id} not found") })
                );
            } else {
                eprintln!("Recipe {recipe_id} not found");
            }
            process::exit(2);
        }
        Err(e) => return Err(e.into()),
    };

    if json {
        println!("{}", serde_json::to_string_pretty(&recipe)?);
        return Ok(());
    }

    print_recipe(&recipe);
    Ok(())
}

fn print_recipe(recipe: &Recipe) {
    let name = &recipe.name;
    let servings = recipe.num_servings;
    let prep = recipe.prep_time.format("%H:%M");
    let cook = recipe.cook_time.format("%H:%M");

    println!("{name}");
    println!("  Serves {servings} · prep {prep} · cook {cook}");
    if let Some(notes) = &recipe.notes {
        println!("  {notes}");
    }

    if !recipe.categories.is_empty() {
        let names: Vec<&str> = recipe.categories.iter().map(|c| c.name.as_str()).collect();
        println!("  Categories: {}", names.join(", "));
    }

    if !recipe.ingredients.is_empty() {
        println!("\nIngredients:");
        for ingredient in &recipe.ingredients {
            let amount = ingredient.amount;
            let item = &ingredient.name;
            match &ingredient.unit {
                Some(unit) => {
                    let unit_name = unit.display_name(amount);
                    println!("  {amount} {unit_name} {item}");
                }
                None => println!("  {amount} {item}"),
            }
        }
    }

    if !recipe.steps.is_empty() {
        println!("\nSteps:");
        for step in &recipe.steps {
            let n = step.step_order;
            let text = &step.step_text;
            println!("  {n}. {text}");
        }
    }
}

fn print_recipe_table(recipes: &[Recipe]) {
    #[derive(Tabled)]
    struct RecipeRow {
        #[tabled(rename = "ID")]
        id: i64,
        #[tabled(rename = "Name")]
        name: String,
        #[tabled(rename = "Serves")]
        servings: i64,
        #[tabled(rename = "Prep")]
        prep: String,
        #[tabled(rename = "Cook")]
        cook: String,
    }

    let rows: Vec<RecipeRow> = recipes
        .iter()
        .map(|r| RecipeRow {
            id: r.id,
            name: r.name.clone(),
            servings: r.num_servings,
            prep: r.prep_time.format("%H:%M").to_string(),
            cook: r.cook_time.format("%H:%M").to_string(),
        })
        .collect();

    let table = Table::new(&rows)
        .with(Style::rounded())
        .with(Modify::new(Columns::new(2..5)).with(Alignment::right()))
        .to_string();
    println!("{table}");
}
