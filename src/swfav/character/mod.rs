//! 人物目录模块
//!
//! 实现目录的全量拉取、位置 ID 分配与本地搜索过滤

pub mod api;
pub mod models;
pub mod service;
pub mod types;

// 重新导出主要类型和函数
pub use api::{CharacterApi, CharacterBackend, TOTAL_CATALOG_PAGES};
pub use models::{assign_swapi_ids, CatalogCharacter, Character, SearchFilters, SearchType};
pub use service::{filter_characters, CharacterService};
pub use types::CharactersPageResp;
