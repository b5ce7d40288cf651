use std::sync::Arc;

use validator::Validate;

use crate::domain::{DrinkChanges, DrinkId, NewDrink};
use crate::dto::{DrinkLongDto, DrinkShortDto};
use crate::forms::drinks::{CreateDrinkForm, PatchDrinkForm};
use crate::repository::DrinkRepository;
use crate::services::ServiceResult;

/// Service responsible for menu operations.
#[derive(Clone)]
pub struct DrinkService {
    repo: Arc<dyn DrinkRepository>,
}

impl DrinkService {
    pub fn new(repo: Arc<dyn DrinkRepository>) -> Self {
        Self { repo }
    }

    /// Public menu.
    pub fn list(&self) -> Vec<DrinkShortDto> {
        self.repo.list().into_iter().map(DrinkShortDto::from).collect()
    }

    /// Menu with ingredient names.
    pub fn list_detailed(&self) -> Vec<DrinkLongDto> {
        self.repo.list().into_iter().map(DrinkLongDto::from).collect()
    }

    pub fn get(&self, id: DrinkId) -> ServiceResult<DrinkLongDto> {
        Ok(self.repo.get(id)?.into())
    }

    pub fn create(&self, form: CreateDrinkForm) -> ServiceResult<DrinkLongDto> {
        form.validate()?;
        let drink = NewDrink::try_from(form)?;

        let stored = self.repo.insert(drink)?;
        log::info!("Created drink {} `{}`", stored.id, stored.title);
        Ok(stored.into())
    }

    pub fn update(&self, id: DrinkId, form: PatchDrinkForm) -> ServiceResult<DrinkLongDto> {
        // Unknown ids win over invalid bodies.
        self.repo.get(id)?;
        form.validate()?;
        let changes = DrinkChanges::try_from(form)?;

        let updated = self.repo.update(id, changes)?;
        log::info!("Updated drink {}", updated.id);
        Ok(updated.into())
    }

    pub fn delete(&self, id: DrinkId) -> ServiceResult<DrinkId> {
        let removed = self.repo.delete(id)?;
        log::info!("Deleted drink {} `{}`", removed.id, removed.title);
        Ok(removed.id)
    }
}
