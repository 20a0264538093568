use tokio::sync::Mutex;

use crate::core::CategoryStore;
use crate::domain::model::{CatalogSnapshot, CategoryId};
use crate::utils::error::Result;

/// 以記憶體中的快照實作的 CategoryStore
#[derive(Debug, Default)]
pub struct InMemoryCategoryStore {
    catalog: Mutex<CatalogSnapshot>,
}

impl InMemoryCategoryStore {
    pub fn new(catalog: CatalogSnapshot) -> Self {
        Self {
            catalog: Mutex::new(catalog),
        }
    }

    pub async fn contains(&self, category_id: CategoryId) -> bool {
        self.catalog.lock().await.contains(category_id)
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.catalog.lock().await.clone()
    }
}

impl CategoryStore for InMemoryCategoryStore {
    async fn count_components(&self, category_id: CategoryId) -> Result<u64> {
        Ok(self.catalog.lock().await.count_components(category_id))
    }

    async fn count_subcategories(&self, category_id: CategoryId) -> Result<u64> {
        Ok(self.catalog.lock().await.count_subcategories(category_id))
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<bool> {
        Ok(self.catalog.lock().await.remove_category(category_id))
    }
}
