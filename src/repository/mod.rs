//! Storage of drinks.
use std::collections::BTreeMap;
use std::sync::RwLock;

use thiserror::Error;

use crate::domain::{Drink, DrinkChanges, DrinkId, DrinkTitle, Ingredient, NewDrink, Recipe};

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("drink {0} not found")]
    NotFound(DrinkId),
    #[error("a drink titled `{0}` already exists")]
    DuplicateTitle(DrinkTitle),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

pub trait DrinkRepository: Send + Sync {
    fn list(&self) -> Vec<Drink>;
    fn get(&self, id: DrinkId) -> RepositoryResult<Drink>;
    fn insert(&self, drink: NewDrink) -> RepositoryResult<Drink>;
    fn update(&self, id: DrinkId, changes: DrinkChanges) -> RepositoryResult<Drink>;
    fn delete(&self, id: DrinkId) -> RepositoryResult<Drink>;
}

#[derive(Default)]
struct Table {
    rows: BTreeMap<DrinkId, Drink>,
    last_id: i32,
}

impl Table {
    fn title_taken(&self, title: &DrinkTitle, except: Option<DrinkId>) -> bool {
        self.rows
            .values()
            .any(|d| &d.title == title && Some(d.id) != except)
    }
}

/// Process-local repository; ids are never reused.
#[derive(Default)]
pub struct InMemoryDrinkRepository {
    table: RwLock<Table>,
}

impl InMemoryDrinkRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository holding the starter menu (a single glass of water).
    pub fn seeded() -> Self {
        let repo = Self::new();
        let water = NewDrink {
            title: DrinkTitle::try_new("water".into()).expect("static title is valid"),
            recipe: Recipe::try_new(vec![
                Ingredient::try_new("water".into(), "blue".into(), 1)
                    .expect("static ingredient is valid"),
            ])
            .expect("static recipe is valid"),
        };
        if let Err(e) = repo.insert(water) {
            log::error!("Failed to seed drinks: {e}");
        }
        repo
    }
}

impl DrinkRepository for InMemoryDrinkRepository {
    fn list(&self) -> Vec<Drink> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.rows.values().cloned().collect()
    }

    fn get(&self, id: DrinkId) -> RepositoryResult<Drink> {
        let table = self.table.read().unwrap_or_else(|e| e.into_inner());
        table.rows.get(&id).cloned().ok_or(RepositoryError::NotFound(id))
    }

    fn insert(&self, drink: NewDrink) -> RepositoryResult<Drink> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        if table.title_taken(&drink.title, None) {
            return Err(RepositoryError::DuplicateTitle(drink.title));
        }

        table.last_id += 1;
        let stored = Drink {
            id: DrinkId::new(table.last_id),
            title: drink.title,
            recipe: drink.recipe,
        };
        table.rows.insert(stored.id, stored.clone());
        Ok(stored)
    }

    fn update(&self, id: DrinkId, changes: DrinkChanges) -> RepositoryResult<Drink> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        if let Some(title) = &changes.title {
            if table.title_taken(title, Some(id)) {
                return Err(RepositoryError::DuplicateTitle(title.clone()));
            }
        }

        let drink = table.rows.get_mut(&id).ok_or(RepositoryError::NotFound(id))?;
        if let Some(title) = changes.title {
            drink.title = title;
        }
        if let Some(recipe) = changes.recipe {
            drink.recipe = recipe;
        }
        Ok(drink.clone())
    }

    fn delete(&self, id: DrinkId) -> RepositoryResult<Drink> {
        let mut table = self.table.write().unwrap_or_else(|e| e.into_inner());
        table.rows.remove(&id).ok_or(RepositoryError::NotFound(id))
    }
}
