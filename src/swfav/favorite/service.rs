//! 收藏服务层
//!
//! 维护两个投影：分页展示用的当前页，和目录排除用的全量位置 ID 集合；
//! 增删落库后两个投影并发刷新，保持一致

use crate::swfav::error::ApiError;
use crate::swfav::favorite::api::FavoriteBackend;
use crate::swfav::favorite::listener::{EmptyFavoriteListener, FavoriteListener};
use crate::swfav::favorite::models::{FavoriteCharacter, Pagination, SharedFavoriteIds};
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, info};

/// 当前页内容与分页信息（成对替换，避免两者错位）
#[derive(Default)]
struct FavoritesPage {
    items: Vec<FavoriteCharacter>,
    pagination: Pagination,
}

/// 收藏服务
pub struct FavoriteService {
    /// 收藏数据来源
    api: Arc<dyn FavoriteBackend>,
    /// 当前页状态
    page_state: RwLock<FavoritesPage>,
    /// 当前页码
    current_page: AtomicU32,
    /// 分页展示的每页条数
    page_size: u32,
    /// 全量收藏位置 ID 集合（目录的排除集）
    ids: SharedFavoriteIds,
    /// 展示用错误文案
    error: RwLock<Option<String>>,
    loading: AtomicBool,
    adding: AtomicBool,
    deleting: AtomicBool,
    /// 分页加载序号，过期的在途结果按序号丢弃
    reload_seq: AtomicU64,
    /// 收藏变更监听器
    listener: Arc<dyn FavoriteListener>,
}

impl FavoriteService {
    /// 创建新的收藏服务（使用默认空监听器）
    pub fn new(api: Arc<dyn FavoriteBackend>, ids: SharedFavoriteIds, page_size: u32) -> Self {
        Self::with_listener(api, ids, page_size, Arc::new(EmptyFavoriteListener))
    }

    /// 创建新的收藏服务（带自定义监听器）
    pub fn with_listener(
        api: Arc<dyn FavoriteBackend>,
        ids: SharedFavoriteIds,
        page_size: u32,
        listener: Arc<dyn FavoriteListener>,
    ) -> Self {
        Self {
            api,
            page_state: RwLock::new(FavoritesPage::default()),
            current_page: AtomicU32::new(1),
            page_size,
            ids,
            error: RwLock::new(None),
            loading: AtomicBool::new(false),
            adding: AtomicBool::new(false),
            deleting: AtomicBool::new(false),
            reload_seq: AtomicU64::new(0),
            listener,
        }
    }

    /// 加载一页收藏，成功后当前页内容与分页信息一并替换
    pub async fn reload_page(&self, page: u32) {
        let ticket = self.reload_seq.fetch_add(1, Ordering::SeqCst) + 1;
        self.loading.store(true, Ordering::SeqCst);
        *self.error.write().await = None;

        info!("[Favorites] 🔄 加载收藏列表，页码: {}, 序号: {}", page, ticket);
        let result = self.api.fetch_page(page, self.page_size).await;

        if self.reload_seq.load(Ordering::SeqCst) != ticket {
            debug!("[Favorites] 丢弃过期的分页结果，序号: {}", ticket);
            return;
        }

        match result {
            Ok(resp) => {
                let pagination = resp.pagination.clone();
                info!(
                    "[Favorites] ✅ 收藏列表加载完成，页码: {}, 本页条数: {}, 总数: {}",
                    pagination.page,
                    resp.data.len(),
                    pagination.total
                );
                self.current_page.store(pagination.page, Ordering::SeqCst);
                *self.page_state.write().await = FavoritesPage {
                    items: resp.data,
                    pagination,
                };
            }
            Err(e) => {
                let message = e.display_message();
                error!("[Favorites] 收藏列表加载失败: {}", message);
                *self.error.write().await = Some(message);
            }
        }

        self.loading.store(false, Ordering::SeqCst);
    }

    /// 刷新全量位置 ID 集合
    ///
    /// 这个投影只服务于目录排除，尽力而为：失败只记日志，
    /// 不写入展示用错误状态
    pub async fn reload_all_ids(&self) {
        match self.api.fetch_all().await {
            Ok(favorites) => {
                let ids: HashSet<u32> = favorites.iter().map(|f| f.swapi_id).collect();
                if self.ids.replace(ids).await {
                    let sorted = self.ids.sorted().await;
                    info!("[Favorites] 收藏 ID 集合更新，共 {} 条", sorted.len());
                    self.listener.on_favorite_ids_changed(sorted).await;
                }
            }
            Err(e) => {
                error!(
                    "[Favorites] 加载收藏 ID 集合失败: {}",
                    e.display_message()
                );
            }
        }
    }

    /// 添加收藏
    ///
    /// 成功后并发刷新当前页和全量 ID 集合；
    /// 失败时记录错误文案并上抛，调用方据此跳过后续的目录刷新
    pub async fn add(&self, swapi_id: u32) -> Result<FavoriteCharacter, ApiError> {
        self.adding.store(true, Ordering::SeqCst);
        *self.error.write().await = None;

        info!("[Favorites] ➕ 添加收藏，位置 ID: {}", swapi_id);
        let result = self.api.add(swapi_id).await;

        let outcome = match result {
            Ok(favorite) => {
                let page = self.current_page.load(Ordering::SeqCst);
                tokio::join!(self.reload_page(page), self.reload_all_ids());
                Ok(favorite)
            }
            Err(e) => {
                let message = e.display_message();
                error!("[Favorites] 添加收藏失败: {}", message);
                *self.error.write().await = Some(message);
                Err(e)
            }
        };

        self.adding.store(false, Ordering::SeqCst);
        outcome
    }

    /// 删除收藏
    ///
    /// 刷新逻辑与添加一致；删除后当前页可能少一条，
    /// 不做自动回退页码
    pub async fn remove(&self, favorite_id: u64) -> Result<(), ApiError> {
        self.deleting.store(true, Ordering::SeqCst);
        *self.error.write().await = None;

        info!("[Favorites] ➖ 删除收藏，记录 ID: {}", favorite_id);
        let result = self.api.remove(favorite_id).await;

        let outcome = match result {
            Ok(()) => {
                let page = self.current_page.load(Ordering::SeqCst);
                tokio::join!(self.reload_page(page), self.reload_all_ids());
                Ok(())
            }
            Err(e) => {
                let message = e.display_message();
                error!("[Favorites] 删除收藏失败: {}", message);
                *self.error.write().await = Some(message);
                Err(e)
            }
        };

        self.deleting.store(false, Ordering::SeqCst);
        outcome
    }

    /// 翻页，页码是否越界由服务端裁决
    pub async fn set_page(&self, page: u32) {
        self.reload_page(page).await;
    }

    /// 刷新当前页和全量 ID 集合
    pub async fn reload(&self) {
        let page = self.current_page.load(Ordering::SeqCst);
        tokio::join!(self.reload_page(page), self.reload_all_ids());
    }

    /// 当前页收藏记录
    pub async fn items(&self) -> Vec<FavoriteCharacter> {
        self.page_state.read().await.items.clone()
    }

    pub async fn pagination(&self) -> Pagination {
        self.page_state.read().await.pagination.clone()
    }

    pub fn current_page(&self) -> u32 {
        self.current_page.load(Ordering::SeqCst)
    }

    /// 收藏位置 ID 共享集合（目录服务持有同一份）
    pub fn favorite_ids(&self) -> SharedFavoriteIds {
        self.ids.clone()
    }

    pub async fn error(&self) -> Option<String> {
        self.error.read().await.clone()
    }

    pub fn is_loading(&self) -> bool {
        self.loading.load(Ordering::SeqCst)
    }

    pub fn is_adding(&self) -> bool {
        self.adding.load(Ordering::SeqCst)
    }

    pub fn is_deleting(&self) -> bool {
        self.deleting.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swfav::character::models::Character;
    use crate::swfav::error::FieldError;
    use crate::swfav::favorite::types::FavoritesPageResp;
    use async_trait::async_trait;
    use std::sync::atomic::AtomicUsize;
    use tokio::sync::Mutex;

    fn character(swapi_id: u32) -> Character {
        Character {
            name: format!("Character {}", swapi_id),
            height: "175".to_string(),
            mass: "78".to_string(),
            hair_color: "black".to_string(),
            skin_color: "tan".to_string(),
            eye_color: "brown".to_string(),
            birth_year: "32BBY".to_string(),
            gender: "male".to_string(),
        }
    }

    /// 内存收藏库：模拟服务端的存储和分页行为
    struct InMemoryBackend {
        store: Mutex<Vec<FavoriteCharacter>>,
        next_id: AtomicU64,
        fetch_page_calls: AtomicUsize,
    }

    impl InMemoryBackend {
        fn new() -> Self {
            Self {
                store: Mutex::new(Vec::new()),
                next_id: AtomicU64::new(1),
                fetch_page_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl FavoriteBackend for InMemoryBackend {
        async fn fetch_page(
            &self,
            page: u32,
            page_size: u32,
        ) -> Result<FavoritesPageResp, ApiError> {
            self.fetch_page_calls.fetch_add(1, Ordering::SeqCst);
            let store = self.store.lock().await;
            let total = store.len() as u32;
            let start = ((page - 1) * page_size) as usize;
            let end = (start + page_size as usize).min(store.len());
            let data = if start < store.len() {
                store[start..end].to_vec()
            } else {
                Vec::new()
            };
            Ok(FavoritesPageResp {
                success: true,
                data,
                pagination: Pagination {
                    page,
                    page_size,
                    total,
                    total_pages: total.div_ceil(page_size),
                },
                message: None,
                errors: Vec::new(),
            })
        }

        async fn add(&self, swapi_id: u32) -> Result<FavoriteCharacter, ApiError> {
            let mut store = self.store.lock().await;
            if store.iter().any(|f| f.swapi_id == swapi_id) {
                // 重复收藏按服务端的字段级校验错误返回
                return Err(ApiError::Validation {
                    message: String::new(),
                    errors: vec![FieldError {
                        field: "character_id".to_string(),
                        message: "already a favorite".to_string(),
                    }],
                });
            }
            let favorite = FavoriteCharacter {
                id: self.next_id.fetch_add(1, Ordering::SeqCst),
                swapi_id,
                character: character(swapi_id),
                created_at: None,
            };
            store.push(favorite.clone());
            Ok(favorite)
        }

        async fn remove(&self, favorite_id: u64) -> Result<(), ApiError> {
            let mut store = self.store.lock().await;
            let before = store.len();
            store.retain(|f| f.id != favorite_id);
            if store.len() == before {
                return Err(ApiError::NotFound("收藏记录不存在".to_string()));
            }
            Ok(())
        }
    }

    fn make_service(backend: Arc<InMemoryBackend>) -> FavoriteService {
        FavoriteService::new(backend, SharedFavoriteIds::new(), 10)
    }

    #[tokio::test]
    async fn add_then_remove_round_trips_exclusion_set() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = make_service(backend);

        let favorite = service.add(5).await.unwrap();
        assert!(service.favorite_ids().contains(5).await);
        assert_eq!(service.items().await.len(), 1);
        assert_eq!(service.pagination().await.total, 1);

        service.remove(favorite.id).await.unwrap();
        assert!(!service.favorite_ids().contains(5).await);
        assert!(service.items().await.is_empty());
        assert!(!service.is_deleting());
    }

    #[tokio::test]
    async fn rejected_add_records_error_and_skips_reload() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = make_service(backend.clone());

        service.add(5).await.unwrap();
        let calls_before = backend.fetch_page_calls.load(Ordering::SeqCst);

        let result = service.add(5).await;
        assert!(matches!(result, Err(ApiError::Validation { .. })));
        // 错误文案取自服务端的字段级 message
        assert_eq!(service.error().await.as_deref(), Some("already a favorite"));
        assert!(!service.is_adding());
        // 失败路径不触发任何刷新
        assert_eq!(
            backend.fetch_page_calls.load(Ordering::SeqCst),
            calls_before
        );
    }

    #[tokio::test]
    async fn remove_nonexistent_surfaces_not_found() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = make_service(backend);

        let result = service.remove(99).await;
        assert!(matches!(result, Err(ApiError::NotFound(_))));
        assert_eq!(service.error().await.as_deref(), Some("收藏记录不存在"));
        assert!(!service.is_deleting());
    }

    #[tokio::test]
    async fn set_page_replaces_items_and_pagination_together() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = make_service(backend);

        // 1..=12 共 12 条，每页 10 条
        for swapi_id in 1..=12 {
            service.add(swapi_id).await.unwrap();
        }

        service.set_page(2).await;
        let items = service.items().await;
        let pagination = service.pagination().await;
        assert_eq!(items.len(), 2);
        assert_eq!(pagination.page, 2);
        assert_eq!(pagination.total, 12);
        assert_eq!(pagination.total_pages, 2);
        assert_eq!(service.current_page(), 2);
    }

    #[tokio::test]
    async fn listener_fires_on_id_set_change() {
        struct RecordingListener {
            seen: Mutex<Vec<Vec<u32>>>,
        }

        #[async_trait]
        impl FavoriteListener for RecordingListener {
            async fn on_favorite_ids_changed(&self, swapi_ids: Vec<u32>) {
                self.seen.lock().await.push(swapi_ids);
            }
        }

        let listener = Arc::new(RecordingListener {
            seen: Mutex::new(Vec::new()),
        });
        let backend = Arc::new(InMemoryBackend::new());
        let service = FavoriteService::with_listener(
            backend,
            SharedFavoriteIds::new(),
            10,
            listener.clone(),
        );

        service.add(7).await.unwrap();
        service.add(3).await.unwrap();
        // 集合没变时不再触发
        service.reload_all_ids().await;

        let seen = listener.seen.lock().await;
        assert_eq!(*seen, vec![vec![7], vec![3, 7]]);
    }

    #[tokio::test]
    async fn page_left_short_after_remove_is_kept() {
        let backend = Arc::new(InMemoryBackend::new());
        let service = make_service(backend);

        for swapi_id in 1..=11 {
            service.add(swapi_id).await.unwrap();
        }
        service.set_page(2).await;
        let last = service.items().await[0].clone();

        // 第 2 页仅有的一条被删掉后页码不自动回退
        service.remove(last.id).await.unwrap();
        assert_eq!(service.current_page(), 2);
        assert!(service.items().await.is_empty());
        assert_eq!(service.pagination().await.total, 10);
    }
}
