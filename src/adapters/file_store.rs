use std::path::{Path, PathBuf};

use tokio::sync::Mutex;

use crate::core::CategoryStore;
use crate::domain::model::{CatalogSnapshot, CategoryId};
use crate::utils::error::Result;

/// 以 JSON 檔案保存的分類目錄。
///
/// 刪除時先把刪除後的目錄寫入檔案，寫入成功才更新記憶體，
/// 所以寫入失敗時記憶體與檔案都維持刪除前的狀態。
#[derive(Debug)]
pub struct JsonFileCategoryStore {
    path: PathBuf,
    catalog: Mutex<CatalogSnapshot>,
}

impl JsonFileCategoryStore {
    pub async fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let data = tokio::fs::read(&path).await?;
        let catalog: CatalogSnapshot = serde_json::from_slice(&data)?;

        tracing::debug!(
            "Loaded catalog from {}: {} categories, {} components",
            path.display(),
            catalog.categories.len(),
            catalog.components.len()
        );

        Ok(Self {
            path,
            catalog: Mutex::new(catalog),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn contains(&self, category_id: CategoryId) -> bool {
        self.catalog.lock().await.contains(category_id)
    }

    pub async fn snapshot(&self) -> CatalogSnapshot {
        self.catalog.lock().await.clone()
    }

    async fn persist(&self, catalog: &CatalogSnapshot) -> Result<()> {
        let json = serde_json::to_vec_pretty(catalog)?;

        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                tokio::fs::create_dir_all(parent).await?;
            }
        }

        tokio::fs::write(&self.path, json).await?;
        tracing::debug!("Catalog written to {}", self.path.display());
        Ok(())
    }
}

impl CategoryStore for JsonFileCategoryStore {
    async fn count_components(&self, category_id: CategoryId) -> Result<u64> {
        Ok(self.catalog.lock().await.count_components(category_id))
    }

    async fn count_subcategories(&self, category_id: CategoryId) -> Result<u64> {
        Ok(self.catalog.lock().await.count_subcategories(category_id))
    }

    async fn delete_category(&self, category_id: CategoryId) -> Result<bool> {
        // 鎖住直到寫入完成，避免兩次刪除交錯寫檔
        let mut catalog = self.catalog.lock().await;

        let mut next = catalog.clone();
        if !next.remove_category(category_id) {
            return Ok(false);
        }

        self.persist(&next).await?;
        *catalog = next;
        Ok(true)
    }
}
