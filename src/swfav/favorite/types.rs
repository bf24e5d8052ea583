//! 收藏 API DTO（请求和响应结构体）

use crate::swfav::error::FieldError;
use crate::swfav::favorite::models::{FavoriteCharacter, Pagination};
use crate::swfav::types::deserialize_vec_or_null;
use serde::{Deserialize, Serialize};

/// 收藏分页列表响应
///
/// 注意：这个接口不走统一的 data 包装，分页信息直接放在顶层
#[derive(Debug, Clone, Deserialize)]
pub struct FavoritesPageResp {
    pub success: bool,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub data: Vec<FavoriteCharacter>,
    #[serde(default)]
    pub pagination: Pagination,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub errors: Vec<FieldError>,
}

/// 添加收藏请求体
#[derive(Debug, Serialize)]
pub struct AddFavoriteReq {
    pub character_id: u32,
}
