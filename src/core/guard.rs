use std::collections::HashSet;

use crate::core::CategoryStore;
use crate::domain::model::{
    BlockedCategory, BulkDeleteOutcome, CategoryId, DeleteOutcome, DependentCounts,
    FailedDeletion,
};
use crate::utils::error::Result;

/// 在刪除分類之前檢查是否仍有元件或子分類參照它
pub struct RelationshipGuard<S: CategoryStore> {
    store: S,
}

impl<S: CategoryStore> RelationshipGuard<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub async fn check_dependents(&self, category_id: CategoryId) -> Result<DependentCounts> {
        let component_count = self.store.count_components(category_id).await?;
        let subcategory_count = self.store.count_subcategories(category_id).await?;

        tracing::debug!(
            "Category {} has {} component(s), {} subcategory(ies)",
            category_id,
            component_count,
            subcategory_count
        );

        Ok(DependentCounts {
            component_count,
            subcategory_count,
        })
    }

    pub async fn guarded_delete(&self, category_id: CategoryId) -> Result<DeleteOutcome> {
        let counts = self.check_dependents(category_id).await?;
        if !counts.is_clear() {
            tracing::warn!(
                "🚫 Category {} not deleted: blocked by {:?}",
                category_id,
                counts.blocking_kinds()
            );
            return Ok(DeleteOutcome::Blocked { counts });
        }

        if self.store.delete_category(category_id).await? {
            tracing::info!("🗑️ Category {} deleted", category_id);
            Ok(DeleteOutcome::Deleted)
        } else {
            tracing::warn!("Category {} not found", category_id);
            Ok(DeleteOutcome::NotFound)
        }
    }

    /// 逐筆處理：先檢查全部分類，再刪除所有沒有依賴的分類。
    /// 被擋下或刪除失敗的分類不影響其他分類，已刪除的也不會回滾。
    /// 只有檢查階段的 store 錯誤會讓整批回傳 `Err`，此時尚未刪除任何分類。
    pub async fn guarded_bulk_delete(&self, category_ids: &[CategoryId]) -> Result<BulkDeleteOutcome> {
        let mut outcome = BulkDeleteOutcome::default();
        let mut seen = HashSet::new();
        let mut deletable = Vec::new();

        for &id in category_ids {
            if !seen.insert(id) {
                continue;
            }

            let counts = self.check_dependents(id).await?;
            if counts.is_clear() {
                deletable.push(id);
            } else {
                outcome.blocked.push(BlockedCategory {
                    id,
                    counts,
                    blocked_by: counts.blocking_kinds(),
                });
            }
        }

        for id in deletable {
            match self.store.delete_category(id).await {
                Ok(true) => outcome.deleted.push(id),
                Ok(false) => outcome.missing.push(id),
                Err(e) => {
                    tracing::error!("❌ Category {} could not be deleted: {}", id, e);
                    outcome.failed.push(FailedDeletion {
                        id,
                        reason: e.to_string(),
                    });
                }
            }
        }

        tracing::info!(
            "Bulk delete: {} deleted, {} blocked, {} missing, {} failed",
            outcome.deleted.len(),
            outcome.blocked.len(),
            outcome.missing.len(),
            outcome.failed.len()
        );

        Ok(outcome)
    }
}
