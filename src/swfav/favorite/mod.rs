//! 收藏模块
//!
//! 实现收藏列表的分页展示、全量 ID 投影与增删同步

pub mod api;
pub mod listener;
pub mod models;
pub mod service;
pub mod types;

// 重新导出主要类型和函数
pub use api::{FavoriteApi, FavoriteBackend, FETCH_ALL_PAGE_SIZE, MAX_FETCH_ALL_PAGES};
pub use listener::{EmptyFavoriteListener, FavoriteListener};
pub use models::{FavoriteCharacter, Pagination, SharedFavoriteIds};
pub use service::FavoriteService;
pub use types::{AddFavoriteReq, FavoritesPageResp};
