use serde::Deserialize;
use validator::Validate;

use crate::domain::{DrinkChanges, DrinkTitle, Ingredient, NewDrink, Recipe, TypeConstraintError};

#[derive(Clone, Debug, Deserialize, Validate)]
pub struct IngredientForm {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub color: String,
    #[validate(range(min = 1))]
    pub parts: u32,
}

impl TryFrom<IngredientForm> for Ingredient {
    type Error = TypeConstraintError;

    fn try_from(form: IngredientForm) -> Result<Self, Self::Error> {
        Ingredient::try_new(form.name, form.color, form.parts)
    }
}

fn into_recipe(forms: Vec<IngredientForm>) -> Result<Recipe, TypeConstraintError> {
    let ingredients = forms
        .into_iter()
        .map(Ingredient::try_from)
        .collect::<Result<Vec<_>, _>>()?;
    Recipe::try_new(ingredients)
}

/// Body of `POST /drinks`. A client-supplied `id` is ignored.
#[derive(Clone, Debug, Deserialize, Validate)]
pub struct CreateDrinkForm {
    // Title bounds apply to the trimmed text in `DrinkTitle`.
    pub title: String,
    #[validate(nested)]
    pub recipe: Vec<IngredientForm>,
}

impl TryFrom<CreateDrinkForm> for NewDrink {
    type Error = TypeConstraintError;

    fn try_from(form: CreateDrinkForm) -> Result<Self, Self::Error> {
        Ok(NewDrink {
            title: DrinkTitle::try_new(form.title)?,
            recipe: into_recipe(form.recipe)?,
        })
    }
}

/// Body of `PATCH /drinks/{id}`; absent fields stay unchanged.
#[derive(Clone, Debug, Default, Deserialize, Validate)]
pub struct PatchDrinkForm {
    pub title: Option<String>,
    #[validate(nested)]
    pub recipe: Option<Vec<IngredientForm>>,
}

impl TryFrom<PatchDrinkForm> for DrinkChanges {
    type Error = TypeConstraintError;

    fn try_from(form: PatchDrinkForm) -> Result<Self, Self::Error> {
        Ok(DrinkChanges {
            title: form.title.map(DrinkTitle::try_new).transpose()?,
            recipe: form.recipe.map(into_recipe).transpose()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn create_form_ignores_id_and_converts() {
        let form: CreateDrinkForm = serde_json::from_value(json!({
            "id": 7,
            "title": "flat white",
            "recipe": [
                {"name": "espresso", "color": "brown", "parts": 1},
                {"name": "milk", "color": "white", "parts": 2}
            ]
        }))
        .unwrap();

        assert!(form.validate().is_ok());
        let drink = NewDrink::try_from(form).unwrap();
        assert_eq!(drink.title.as_str(), "flat white");
        assert_eq!(drink.recipe.ingredients().len(), 2);
    }

    #[test]
    fn create_form_validation_failures() {
        let form = CreateDrinkForm {
            title: "".into(),
            recipe: vec![],
        };
        assert!(form.validate().is_ok());
        assert!(matches!(
            NewDrink::try_from(form),
            Err(TypeConstraintError::EmptyTitle)
        ));

        let form = CreateDrinkForm {
            title: "mocha".into(),
            recipe: vec![IngredientForm {
                name: "chocolate".into(),
                color: "brown".into(),
                parts: 0,
            }],
        };
        assert!(form.validate().is_err());
    }

    #[test]
    fn patch_form_keeps_absent_fields() {
        let form: PatchDrinkForm = serde_json::from_value(json!({"title": "cortado"})).unwrap();
        assert!(form.validate().is_ok());

        let changes = DrinkChanges::try_from(form).unwrap();
        assert_eq!(changes.title.unwrap().as_str(), "cortado");
        assert!(changes.recipe.is_none());
    }

    #[test]
    fn patch_form_rejects_empty_recipe() {
        let form = PatchDrinkForm {
            title: None,
            recipe: Some(vec![]),
        };
        assert!(matches!(
            DrinkChanges::try_from(form),
            Err(TypeConstraintError::EmptyRecipe)
        ));
    }

    #[test]
    fn padded_title_at_limit_is_accepted() {
        let title = format!("  {}  ", "a".repeat(crate::domain::MAX_TITLE_LENGTH));
        let form = CreateDrinkForm {
            title,
            recipe: vec![IngredientForm {
                name: "espresso".into(),
                color: "brown".into(),
                parts: 1,
            }],
        };

        assert!(form.validate().is_ok());
        let drink = NewDrink::try_from(form).unwrap();
        assert_eq!(drink.title.as_str().len(), crate::domain::MAX_TITLE_LENGTH);
    }
}
