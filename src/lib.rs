pub mod swfav;

// 重新导出常用类型和函数，方便外部使用
pub use swfav::{
    character::{CatalogCharacter, Character, CharacterService, SearchFilters, SearchType},
    client::{ClientConfig, SwfavClient},
    error::ApiError,
    favorite::{FavoriteCharacter, FavoriteListener, FavoriteService, SharedFavoriteIds},
    health::check_health,
};
