pub mod character;
pub mod client;
pub mod error;
pub mod favorite;
pub mod health;
pub mod types;

// 重新导出常用类型
pub use character::{
    CatalogCharacter, Character, CharacterService, SearchFilters, SearchType,
};
pub use client::{ClientConfig, SwfavClient};
pub use error::ApiError;
pub use favorite::{FavoriteCharacter, FavoriteService, Pagination, SharedFavoriteIds};
pub use health::check_health;
