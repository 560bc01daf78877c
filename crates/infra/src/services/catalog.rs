use std::sync::Arc;

use vaxtrack_core::VaccineId;
use vaxtrack_inventory::{Vaccine, VaccineDraft};

use crate::backend::Backend;
use crate::repository::Repository;

use super::ServiceResult;

/// Vaccine catalog maintenance (settings page).
#[derive(Clone)]
pub struct CatalogService {
    vaccines: Arc<dyn Repository<Vaccine>>,
}

impl CatalogService {
    pub fn new(backend: &Backend) -> Self {
        Self {
            vaccines: backend.vaccines.clone(),
        }
    }

    pub async fn list(&self) -> ServiceResult<Vec<Vaccine>> {
        Ok(self.vaccines.list().await?)
    }

    pub async fn get(&self, id: VaccineId) -> ServiceResult<Vaccine> {
        Ok(self.vaccines.get(id).await?)
    }

    pub async fn create(&self, draft: VaccineDraft) -> ServiceResult<Vaccine> {
        let draft = draft.validate()?;
        let vaccine = self.vaccines.create(draft).await?;
        tracing::info!(vaccine_id = %vaccine.id, name = %vaccine.commercial_name, "vaccine added");
        Ok(vaccine)
    }

    pub async fn update(&self, id: VaccineId, draft: VaccineDraft) -> ServiceResult<Vaccine> {
        let draft = draft.validate()?;
        let current = self.vaccines.get(id).await?;
        let vaccine = self.vaccines.update(current.revise(draft)).await?;
        tracing::info!(vaccine_id = %vaccine.id, "vaccine updated");
        Ok(vaccine)
    }

    /// Remove a catalog entry. Lots that reference it stay and show as
    /// unknown vaccine.
    pub async fn delete(&self, id: VaccineId) -> ServiceResult<()> {
        self.vaccines.delete(id).await?;
        tracing::info!(vaccine_id = %id, "vaccine deleted");
        Ok(())
    }
}
