//! 收藏监听器回调接口

use async_trait::async_trait;

/// 收藏监听器回调接口
///
/// 收藏 ID 集合（目录的排除集）发生变化时触发，
/// 展示层可以借此刷新目录可见列表
#[async_trait]
pub trait FavoriteListener: Send + Sync {
    /// 收藏位置 ID 集合发生变更，参数为升序排列的完整集合
    async fn on_favorite_ids_changed(&self, swapi_ids: Vec<u32>);
}

/// 默认空实现（无操作）
pub struct EmptyFavoriteListener;

#[async_trait]
impl FavoriteListener for EmptyFavoriteListener {
    async fn on_favorite_ids_changed(&self, _swapi_ids: Vec<u32>) {
        // 默认不做任何处理
    }
}
