use crate::domain::model::CategoryId;
use crate::utils::error::Result;

/// 分類刪除前需要查詢的資料來源。
///
/// 每個呼叫各自保證原子性；計數與刪除之間不提供跨呼叫的交易。
pub trait CategoryStore: Send + Sync {
    /// 以 `category_id` 為外鍵的元件數量
    fn count_components(
        &self,
        category_id: CategoryId,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// 以 `category_id` 為父分類的子分類數量
    fn count_subcategories(
        &self,
        category_id: CategoryId,
    ) -> impl std::future::Future<Output = Result<u64>> + Send;

    /// 刪除分類；分類不存在時回傳 `false`
    fn delete_category(
        &self,
        category_id: CategoryId,
    ) -> impl std::future::Future<Output = Result<bool>> + Send;
}
