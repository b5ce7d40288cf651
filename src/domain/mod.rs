//! Strongly-typed domain structures for the drinks menu.
use std::fmt;

use thiserror::Error;

pub const MAX_TITLE_LENGTH: usize = 80;

/// Identifier assigned to a drink by the repository.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Ord, PartialOrd, Hash)]
pub struct DrinkId(i32);

impl DrinkId {
    pub fn new(id: i32) -> Self {
        Self(id)
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

impl From<i32> for DrinkId {
    fn from(value: i32) -> Self {
        Self::new(value)
    }
}

impl fmt::Display for DrinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Non-empty title of at most [`MAX_TITLE_LENGTH`] characters.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DrinkTitle(String);

impl DrinkTitle {
    pub fn try_new(value: String) -> Result<Self, TypeConstraintError> {
        let trimmed = value.trim();
        if trimmed.is_empty() {
            return Err(TypeConstraintError::EmptyTitle);
        }
        if trimmed.chars().count() > MAX_TITLE_LENGTH {
            return Err(TypeConstraintError::TitleTooLong);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for DrinkTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// One component of a recipe, poured in `parts` proportion.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Ingredient {
    pub name: String,
    pub color: String,
    pub parts: u32,
}

impl Ingredient {
    pub fn try_new(name: String, color: String, parts: u32) -> Result<Self, TypeConstraintError> {
        if name.trim().is_empty() || color.trim().is_empty() || parts == 0 {
            return Err(TypeConstraintError::InvalidIngredient);
        }
        Ok(Self { name, color, parts })
    }
}

/// Non-empty list of ingredients.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Recipe(Vec<Ingredient>);

impl Recipe {
    pub fn try_new(ingredients: Vec<Ingredient>) -> Result<Self, TypeConstraintError> {
        if ingredients.is_empty() {
            return Err(TypeConstraintError::EmptyRecipe);
        }
        Ok(Self(ingredients))
    }

    pub fn ingredients(&self) -> &[Ingredient] {
        &self.0
    }
}

/// Drink stored on the menu.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Drink {
    pub id: DrinkId,
    pub title: DrinkTitle,
    pub recipe: Recipe,
}

/// Drink not yet stored.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct NewDrink {
    pub title: DrinkTitle,
    pub recipe: Recipe,
}

/// Partial update; `None` keeps the stored value.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct DrinkChanges {
    pub title: Option<DrinkTitle>,
    pub recipe: Option<Recipe>,
}

#[derive(Debug, Error)]
pub enum TypeConstraintError {
    #[error("title must not be empty")]
    EmptyTitle,
    #[error("title is too long")]
    TitleTooLong,
    #[error("recipe must contain at least one ingredient")]
    EmptyRecipe,
    #[error("invalid ingredient")]
    InvalidIngredient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn title_is_trimmed_and_bounded() {
        let title = DrinkTitle::try_new("  Latte ".into()).unwrap();
        assert_eq!(title.as_str(), "Latte");

        assert!(matches!(
            DrinkTitle::try_new("   ".into()),
            Err(TypeConstraintError::EmptyTitle)
        ));
        assert!(matches!(
            DrinkTitle::try_new("x".repeat(MAX_TITLE_LENGTH + 1)),
            Err(TypeConstraintError::TitleTooLong)
        ));
    }

    #[test]
    fn recipe_requires_ingredients() {
        assert!(matches!(
            Recipe::try_new(vec![]),
            Err(TypeConstraintError::EmptyRecipe)
        ));

        let recipe = Recipe::try_new(vec![
            Ingredient::try_new("espresso".into(), "brown".into(), 1).unwrap(),
            Ingredient::try_new("milk".into(), "white".into(), 3).unwrap(),
        ])
        .unwrap();
        assert_eq!(recipe.ingredients().len(), 2);
    }

    #[test]
    fn ingredient_rejects_zero_parts() {
        assert!(Ingredient::try_new("milk".into(), "white".into(), 0).is_err());
        assert!(Ingredient::try_new("".into(), "white".into(), 1).is_err());
    }
}
