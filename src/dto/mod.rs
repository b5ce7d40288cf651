use serde::Serialize;

use crate::domain::{Drink, Ingredient};

/// Ingredient as shown on the public menu (no names).
#[derive(Clone, Debug, Serialize)]
pub struct IngredientShortDto {
    pub color: String,
    pub parts: u32,
}

#[derive(Clone, Debug, Serialize)]
pub struct IngredientDto {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

/// Public representation of a drink.
#[derive(Clone, Debug, Serialize)]
pub struct DrinkShortDto {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientShortDto>,
}

/// Detailed representation of a drink, including ingredient names.
#[derive(Clone, Debug, Serialize)]
pub struct DrinkLongDto {
    pub id: i32,
    pub title: String,
    pub recipe: Vec<IngredientDto>,
}

impl From<&Ingredient> for IngredientShortDto {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

impl From<&Ingredient> for IngredientDto {
    fn from(ingredient: &Ingredient) -> Self {
        Self {
            name: ingredient.name.clone(),
            color: ingredient.color.clone(),
            parts: ingredient.parts,
        }
    }
}

impl From<Drink> for DrinkShortDto {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id.value(),
            recipe: drink.recipe.ingredients().iter().map(Into::into).collect(),
            title: drink.title.as_str().to_string(),
        }
    }
}

impl From<Drink> for DrinkLongDto {
    fn from(drink: Drink) -> Self {
        Self {
            id: drink.id.value(),
            recipe: drink.recipe.ingredients().iter().map(Into::into).collect(),
            title: drink.title.as_str().to_string(),
        }
    }
}
