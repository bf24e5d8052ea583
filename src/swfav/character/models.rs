//! 人物目录本地模型定义

use serde::{Deserialize, Serialize};

/// SWAPI 人物原始数据（上游响应不含任何 ID 字段）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Character {
    pub name: String,
    pub height: String,
    pub mass: String,
    pub hair_color: String,
    pub skin_color: String,
    pub eye_color: String,
    pub birth_year: String,
    pub gender: String,
}

/// 附带位置 ID 的人物记录
///
/// `swapi_id` 是记录在完整有序目录中的 1-based 位置，
/// 在全量拉取时由 [`assign_swapi_ids`] 一次性计算后固化在记录上，
/// 之后随记录传递，绝不针对过滤或重排后的子序列重新计算
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogCharacter {
    pub swapi_id: u32,
    #[serde(flatten)]
    pub character: Character,
}

/// 为完整目录分配位置 ID（全 crate 唯一的换算入口）
///
/// 入参必须是完整、未过滤、按页序拼接的目录
pub fn assign_swapi_ids(characters: Vec<Character>) -> Vec<CatalogCharacter> {
    characters
        .into_iter()
        .enumerate()
        .map(|(index, character)| CatalogCharacter {
            swapi_id: (index + 1) as u32,
            character,
        })
        .collect()
}

/// 搜索类型：按名称或按位置 ID
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchType {
    Name,
    Id,
}

/// 搜索条件（不可变值，整体替换）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchFilters {
    pub search_type: SearchType,
    pub query: String,
}

impl SearchFilters {
    pub fn new(search_type: SearchType, query: impl Into<String>) -> Self {
        Self {
            search_type,
            query: query.into(),
        }
    }

    /// 切换搜索类型时关键字清空
    pub fn with_type(search_type: SearchType) -> Self {
        Self {
            search_type,
            query: String::new(),
        }
    }
}

impl Default for SearchFilters {
    fn default() -> Self {
        Self::with_type(SearchType::Name)
    }
}
