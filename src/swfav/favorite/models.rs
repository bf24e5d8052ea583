//! 收藏本地模型定义

use crate::swfav::character::models::Character;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::RwLock;

/// 收藏记录（服务端存储的人物快照，带存储主键和位置 ID）
///
/// `id` 由服务端在创建时分配，是删除操作使用的键；
/// `swapi_id` 用于和目录的排除集互相对照
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteCharacter {
    pub id: u64,
    pub swapi_id: u32,
    #[serde(flatten)]
    pub character: Character,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

/// 分页信息（收藏列表接口返回，字段为 camelCase）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Pagination {
    pub page: u32,
    pub page_size: u32,
    pub total: u32,
    pub total_pages: u32,
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            page: 1,
            page_size: 10,
            total: 0,
            total_pages: 0,
        }
    }
}

/// 收藏位置 ID 共享集合
///
/// 收藏服务写入、目录服务读取的显式共享状态，
/// 目录用它把已收藏的人物从可见列表里剔除
#[derive(Clone, Default)]
pub struct SharedFavoriteIds {
    inner: Arc<RwLock<HashSet<u32>>>,
}

impl SharedFavoriteIds {
    pub fn new() -> Self {
        Self::default()
    }

    /// 当前集合快照
    pub async fn snapshot(&self) -> HashSet<u32> {
        self.inner.read().await.clone()
    }

    /// 整体替换集合，返回内容是否发生了变化
    pub async fn replace(&self, ids: HashSet<u32>) -> bool {
        let mut guard = self.inner.write().await;
        if *guard == ids {
            return false;
        }
        *guard = ids;
        true
    }

    pub async fn contains(&self, swapi_id: u32) -> bool {
        self.inner.read().await.contains(&swapi_id)
    }

    /// 升序排列的 ID 列表（回调和日志用）
    pub async fn sorted(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self.inner.read().await.iter().copied().collect();
        ids.sort_unstable();
        ids
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.inner.read().await.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn replace_reports_whether_set_changed() {
        let ids = SharedFavoriteIds::new();
        assert!(ids.replace([3, 7].into_iter().collect()).await);
        assert!(!ids.replace([7, 3].into_iter().collect()).await);
        assert!(ids.replace([7].into_iter().collect()).await);
        assert_eq!(ids.sorted().await, vec![7]);
    }
}
