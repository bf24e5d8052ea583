//! 人物目录 API DTO

use crate::swfav::character::models::Character;
use crate::swfav::types::deserialize_vec_or_null;
use serde::Deserialize;

/// 人物分页列表响应（统一包装 data 字段的内层结构，SWAPI 风格）
#[derive(Debug, Clone, Deserialize)]
pub struct CharactersPageResp {
    /// 上游声明的目录总人数
    pub count: u32,
    #[serde(default)]
    pub next: Option<String>,
    #[serde(default)]
    pub previous: Option<String>,
    #[serde(deserialize_with = "deserialize_vec_or_null")]
    pub results: Vec<Character>,
}
