//! 人物目录服务层
//!
//! 持有全量目录内存状态，基于搜索条件和收藏排除集推导可见列表

use crate::swfav::character::api::CharacterBackend;
use crate::swfav::character::models::{CatalogCharacter, SearchFilters, SearchType};
use crate::swfav::favorite::models::SharedFavoriteIds;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// 目录可见列表推导：先按收藏集合剔除，再应用搜索条件
///
/// 剔除只认拉取时固化在记录上的位置 ID，
/// 绝不能用过滤后子序列的下标重新计算
pub fn filter_characters(
    characters: &[CatalogCharacter],
    filters: &SearchFilters,
    excluded: &HashSet<u32>,
) -> Vec<CatalogCharacter> {
    let mut result: Vec<CatalogCharacter> = characters
        .iter()
        .filter(|c| !excluded.contains(&c.swapi_id))
        .cloned()
        .collect();

    let query = filters.query.trim();
    if query.is_empty() {
        return result;
    }

    match filters.search_type {
        SearchType::Name => {
            let query = query.to_lowercase();
            result.retain(|c| c.character.name.to_lowercase().contains(&query));
        }
        SearchType::Id => match query.parse::<u32>() {
            // 位置 ID 唯一，至多命中一条
            Ok(id) => result.retain(|c| c.swapi_id == id),
            // 非数字关键字不报错，直接视为无结果
            Err(_) => result.clear(),
        },
    }

    result
}

/// 人物目录服务
///
/// 全量目录一次加载进内存，搜索在本地完成；
/// 收藏排除集由收藏服务写入、本服务只读
pub struct CharacterService {
    /// 目录数据来源
    api: Arc<dyn CharacterBackend>,
    /// 全量目录（带位置 ID）
    characters: RwLock<Vec<CatalogCharacter>>,
    /// 当前搜索条件
    filters: RwLock<SearchFilters>,
    /// 展示用错误文案
    error: RwLock<Option<String>>,
    loading: AtomicBool,
    /// 加载序号，过期的在途结果按序号丢弃
    reload_seq: AtomicU64,
    /// 收藏位置 ID 共享集合（排除集）
    excluded: SharedFavoriteIds,
}

impl CharacterService {
    pub fn new(api: Arc<dyn CharacterBackend>, excluded: SharedFavoriteIds) -> Self {
        Self {
            api,
            characters: RwLock::new(Vec::new()),
            filters: RwLock::new(SearchFilters::default()),
            error: RwLock::new(None),
            loading: AtomicBool::new(false),
            reload_seq: AtomicU64::new(0),
            excluded,
        }
    }

    /// 全量重新加载目录
    ///
    /// 失败不向上抛，错误文案记录在服务状态里；
    /// 并发加载时只有最新一次的结果会被写入
    pub async fn reload(&self) {
        let ticket = self.reload_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);
        *self.error.write().await = None;

        info!("[Catalog] 🔄 开始全量加载人物目录，序号: {}", ticket);
        let result = self.api.fetch_all().await;

        if self.reload_seq.load(Ordering::SeqCst) != ticket {
            debug!("[Catalog] 丢弃过期的加载结果，序号: {}", ticket);
            return;
        }

        match result {
            Ok(catalog) => {
                info!("[Catalog] ✅ 人物目录加载完成，共 {} 人", catalog.len());
                *self.characters.write().await = catalog;
            }
            Err(e) => {
                let message = e.display_message();
                error!("[Catalog] 人物目录加载失败: {}", message);
                *self.error.write().await = Some(message);
            }
        }

        self.loading.store(false, Ordering::SeqCst);
    }

    /// 整体替换搜索条件
    pub async fn set_filters(&self, filters: SearchFilters) {
        debug!("[Catalog] 搜索条件更新: {:?}", filters);
        *self.filters.write().await = filters;
    }

    /// 切换搜索类型（关键字随之清空）
    pub async fn set_search_type(&self, search_type: SearchType) {
        self.set_filters(SearchFilters::with_type(search_type)).await;
    }

    /// 只更新关键字，保留搜索类型
    pub async fn set_query(&self, query: impl Into<String>) {
        let search_type = self.filters.read().await.search_type;
        self.set_filters(SearchFilters::new(search_type, query)).await;
    }

    pub async fn filters(&self) -> SearchFilters {
        self.filters.read().await.clone()
    }

    /// 全量目录快照（未过滤）
    pub async fn characters(&self) -> Vec<CatalogCharacter> {
        self.characters.read().await.clone()
    }

    /// 当前可见列表（剔除已收藏，再按条件过滤）
    pub async fn visible(&self) -> Vec<CatalogCharacter> {
        let characters = self.characters.read().await;
        let filters = self.filters.read().await;
        let excluded = self.excluded.snapshot().await;
        filter_characters(&characters, &filters, &excluded)
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }
}
