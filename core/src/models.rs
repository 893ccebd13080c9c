use chrono::NaiveTime;
use serde::Serialize;

use crate::error::{CatalogError, Result};

/// A recipe together with its owned child collections.
///
/// A value returned by a deep fetch is fully hydrated: steps and ingredients
/// sorted ascending by their order columns, categories deduplicated by id.
/// Shallow fetches return the same type with empty collections.
#[derive(Debug, Clone, Serialize)]
pub struct Recipe {
    pub id: i64,
    pub name: String,
    pub notes: Option<String>,
    pub num_servings: i64,
    pub prep_time: NaiveTime,
    pub cook_time: NaiveTime,
    pub steps: Vec<Step>,
    pub ingredients: Vec<Ingredient>,
    pub categories: Vec<Category>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Step {
    pub id: i64,
    pub recipe_id: i64,
    pub step_order: i64,
    pub step_text: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Ingredient {
    pub id: i64,
    pub recipe_id: i64,
    pub ingredient_order: i64,
    pub amount: f64,
    pub name: String,
    /// Absent when the row has no unit reference. A present unit is always
    /// complete; a dangling reference surfaces as an execution error instead.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<Unit>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
}

/// Lookup entity referenced, never owned, by ingredients.
#[derive(Debug, Clone, Serialize)]
pub struct Unit {
    pub id: i64,
    pub name_singular: String,
    pub name_plural: String,
}

impl Unit {
    #[must_use]
    pub fn display_name(&self, amount: f64) -> &str {
        if (amount - 1.0).abs() < f64::EPSILON {
            &self.name_singular
        } else {
            &self.name_plural
        }
    }
}

/// Scalar fields of a recipe about to be inserted. The store assigns the id;
/// child collections are authored separately.
#[derive(Debug, Clone)]
pub struct NewRecipe {
    pub name: String,
    pub notes: Option<String>,
    pub num_servings: i64,
    pub prep_time: NaiveTime,
    pub cook_time: NaiveTime,
}

impl NewRecipe {
    /// Builds a recipe from raw text fields, converting minute counts into
    /// times of day. Malformed numerics fail here, before any store
    /// interaction. Blank prep/cook fields mean zero minutes.
    pub fn from_input(
        name: &str,
        notes: Option<&str>,
        servings: &str,
        prep_minutes: &str,
        cook_minutes: &str,
    ) -> Result<Self> {
        let num_servings = parse_count(servings)?;
        let prep_time = minutes_to_time(parse_optional_count(prep_minutes)?);
        let cook_time = minutes_to_time(parse_optional_count(cook_minutes)?);
        Ok(Self {
            name: name.trim().to_string(),
            notes: notes.map(|n| n.trim().to_string()),
            num_servings,
            prep_time,
            cook_time,
        })
    }
}

fn parse_count(input: &str) -> Result<i64> {
    input.trim().parse().map_err(|_| CatalogError::Conversion {
        input: input.trim().to_string(),
    })
}

fn parse_optional_count(input: &str) -> Result<Option<i64>> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }
    parse_count(trimmed).map(Some)
}

/// Converts a minute count into an hours-and-minutes time of day.
/// An absent count means zero.
#[must_use]
pub fn minutes_to_time(minutes: Option<i64>) -> NaiveTime {
    let total = u32::try_from(minutes.unwrap_or(0).clamp(0, 23 * 60 + 59)).unwrap_or(0);
    NaiveTime::from_hms_opt(total / 60, total % 60, 0).unwrap_or(NaiveTime::MIN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ninety_minutes_is_an_hour_and_a_half() {
        let t = minutes_to_time(Some(90));
        assert_eq!(t, NaiveTime::from_hms_opt(1, 30, 0).unwrap());
    }

    #[test]
    fn absent_minutes_mean_midnight() {
        assert_eq!(minutes_to_time(None), NaiveTime::from_hms_opt(0, 0, 0).unwrap());
    }

    #[test]
    fn exact_hours_have_no_minute_part() {
        assert_eq!(minutes_to_time(Some(120)), NaiveTime::from_hms_opt(2, 0, 0).unwrap());
    }

    #[test]
    fn from_input_parses_all_fields() {
        let recipe =
            NewRecipe::from_input("Pancakes", Some("fluffy"), "4", "15", "10").unwrap();
        assert_eq!(recipe.name, "Pancakes");
        assert_eq!(recipe.notes.as_deref(), Some("fluffy"));
        assert_eq!(recipe.num_servings, 4);
        assert_eq!(recipe.prep_time, NaiveTime::from_hms_opt(0, 15, 0).unwrap());
        assert_eq!(recipe.cook_time, NaiveTime::from_hms_opt(0, 10, 0).unwrap());
    }

    #[test]
    fn from_input_rejects_non_numeric_servings() {
        let err = NewRecipe::from_input("Pancakes", None, "four", "", "").unwrap_err();
        assert!(matches!(err, CatalogError::Conversion { input } if input == "four"));
    }

    #[test]
    fn blank_durations_default_to_zero() {
        let recipe = NewRecipe::from_input("Toast", None, "1", "", "").unwrap();
        assert_eq!(recipe.prep_time, NaiveTime::MIN);
        assert_eq!(recipe.cook_time, NaiveTime::MIN);
    }

    #[test]
    fn unit_display_name_follows_amount() {
        let unit = Unit {
            id: 1,
            name_singular: "cup".to_string(),
            name_plural: "cups".to_string(),
        };
        assert_eq!(unit.display_name(1.0), "cup");
        assert_eq!(unit.display_name(0.5), "cups");
        assert_eq!(unit.display_name(2.0), "cups");
    }
}
