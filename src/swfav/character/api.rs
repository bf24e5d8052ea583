//! 人物目录 HTTP API 客户端
//!
//! 负责所有目录相关的 HTTP 请求，以及全量目录的并发聚合

use crate::swfav::character::models::{assign_swapi_ids, CatalogCharacter, Character};
use crate::swfav::character::types::CharactersPageResp;
use crate::swfav::error::ApiError;
use crate::swfav::types::handle_http_response;
use async_trait::async_trait;
use futures_util::future::join_all;
use tracing::{debug, info, warn};
use uuid::Uuid;

/// 上游目录固定为 9 个列表页
pub const TOTAL_CATALOG_PAGES: u32 = 9;

/// 目录数据来源接口
///
/// HTTP 实现见 [`CharacterApi`]，测试中可用桩实现替换
#[async_trait]
pub trait CharacterBackend: Send + Sync {
    /// 拉取目录的一页
    async fn fetch_page(&self, page: u32) -> Result<CharactersPageResp, ApiError>;

    /// 按位置 ID 拉取单个人物
    async fn fetch_character(&self, swapi_id: u32) -> Result<Character, ApiError>;

    /// 并发拉取全部列表页，按页序拼接后分配位置 ID
    ///
    /// 拼接顺序只取决于页码，与各请求的完成先后无关，
    /// 否则位置 ID 语义会被打乱
    async fn fetch_all(&self) -> Result<Vec<CatalogCharacter>, ApiError> {
        let requests: Vec<_> = (1..=TOTAL_CATALOG_PAGES)
            .map(|page| self.fetch_page(page))
            .collect();

        // join_all 的结果顺序与入参顺序一致
        let pages = join_all(requests).await;

        let mut characters = Vec::new();
        let mut declared_count = 0;
        for resp in pages {
            let resp = resp?;
            declared_count = resp.count;
            characters.extend(resp.results);
        }

        // 页数是写死的常量，上游数据量变化时这里会对不上，记录后照常返回
        if declared_count as usize != characters.len() {
            warn!(
                "[CharacterAPI] 目录总数与上游声明不一致，实际: {}, 声明: {}",
                characters.len(),
                declared_count
            );
        }

        Ok(assign_swapi_ids(characters))
    }
}

/// 人物目录 HTTP API 客户端
pub struct CharacterApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl CharacterApi {
    /// 创建新的目录 API 客户端
    ///
    /// `client` 应该已经在外部配置好公共请求头
    pub fn new(client: reqwest::Client, api_base_url: String) -> Self {
        Self {
            client,
            api_base_url,
        }
    }
}

#[async_trait]
impl CharacterBackend for CharacterApi {
    async fn fetch_page(&self, page: u32) -> Result<CharactersPageResp, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/characters", self.api_base_url);

        info!("[CharacterAPI] 📡 请求人物列表，页码: {}", page);
        debug!("[CharacterAPI]   请求URL: {}, 请求ID: {}", url, request_id);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page)])
            .header("X-Request-ID", &request_id)
            .send()
            .await?;

        let envelope = handle_http_response::<CharactersPageResp>(response, "人物列表").await?;
        let data = envelope
            .data
            .ok_or_else(|| ApiError::Decode("响应中缺少 data 字段".to_string()))?;

        info!(
            "[CharacterAPI] ✅ 人物列表响应，页码: {}, 本页人数: {}",
            page,
            data.results.len()
        );

        Ok(data)
    }

    async fn fetch_character(&self, swapi_id: u32) -> Result<Character, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/characters/{}", self.api_base_url, swapi_id);

        info!("[CharacterAPI] 📡 请求单个人物，位置 ID: {}", swapi_id);
        debug!("[CharacterAPI]   请求URL: {}, 请求ID: {}", url, request_id);

        let response = self
            .client
            .get(&url)
            .header("X-Request-ID", &request_id)
            .send()
            .await?;

        let envelope = handle_http_response::<Character>(response, "单个人物").await?;
        let character = envelope
            .data
            .ok_or_else(|| ApiError::Decode("响应中缺少 data 字段".to_string()))?;

        info!("[CharacterAPI] ✅ 单个人物响应: {}", character.name);

        Ok(character)
    }
}
