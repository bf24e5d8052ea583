//! 收藏 HTTP API 客户端
//!
//! 负责所有收藏相关的 HTTP 请求，以及全量收藏的翻页聚合

use crate::swfav::error::ApiError;
use crate::swfav::favorite::models::FavoriteCharacter;
use crate::swfav::favorite::types::{AddFavoriteReq, FavoritesPageResp};
use crate::swfav::types::handle_http_response;
use async_trait::async_trait;
use tracing::{debug, error, info};
use uuid::Uuid;

/// 全量聚合使用的大页大小，尽量减少请求数
pub const FETCH_ALL_PAGE_SIZE: u32 = 100;

/// 全量聚合的翻页硬上限
///
/// 终止条件本来只依赖服务端的 totalPages 字段，
/// 上限防止字段异常的服务端把循环拖成死循环
pub const MAX_FETCH_ALL_PAGES: u32 = 50;

/// 收藏数据来源接口
///
/// HTTP 实现见 [`FavoriteApi`]，测试中可用桩实现替换
#[async_trait]
pub trait FavoriteBackend: Send + Sync {
    /// 拉取收藏的一页
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<FavoritesPageResp, ApiError>;

    /// 添加收藏，服务端校验失败以 [`ApiError::Validation`] 返回
    async fn add(&self, swapi_id: u32) -> Result<FavoriteCharacter, ApiError>;

    /// 删除收藏，记录不存在以 [`ApiError::NotFound`] 返回
    async fn remove(&self, favorite_id: u64) -> Result<(), ApiError>;

    /// 大页循环拉取全部收藏，直到 page >= totalPages
    async fn fetch_all(&self) -> Result<Vec<FavoriteCharacter>, ApiError> {
        let mut all = Vec::new();
        let mut page = 1;

        loop {
            let resp = self.fetch_page(page, FETCH_ALL_PAGE_SIZE).await?;
            all.extend(resp.data);

            if resp.pagination.page >= resp.pagination.total_pages {
                break;
            }

            page += 1;
            if page > MAX_FETCH_ALL_PAGES {
                error!(
                    "[FavoriteAPI] 全量收藏翻页超过上限 {}，服务端分页字段异常",
                    MAX_FETCH_ALL_PAGES
                );
                return Err(ApiError::Decode(format!(
                    "收藏分页数据异常：翻页超过上限 {}",
                    MAX_FETCH_ALL_PAGES
                )));
            }
        }

        Ok(all)
    }
}

/// 收藏 HTTP API 客户端
pub struct FavoriteApi {
    client: reqwest::Client,
    api_base_url: String,
}

impl FavoriteApi {
    /// 创建新的收藏 API 客户端
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
impl FavoriteBackend for FavoriteApi {
    async fn fetch_page(&self, page: u32, page_size: u32) -> Result<FavoritesPageResp, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/favorites", self.api_base_url);

        info!(
            "[FavoriteAPI] 📡 请求收藏列表，页码: {}, 每页: {}",
            page, page_size
        );
        debug!("[FavoriteAPI]   请求URL: {}, 请求ID: {}", url, request_id);

        let response = self
            .client
            .get(&url)
            .query(&[("page", page), ("pageSize", page_size)])
            .header("X-Request-ID", &request_id)
            .send()
            .await?;

        let status = response.status();
        let body_bytes = response.bytes().await?;
        let body_str = String::from_utf8_lossy(&body_bytes);
        debug!("[FavoriteAPI] 收藏列表响应 Body: {}", body_str);

        if !status.is_success() {
            error!(
                "[FavoriteAPI] 收藏列表请求失败，HTTP状态: {}, 响应: {}",
                status, body_str
            );
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: body_str.to_string(),
                errors: Vec::new(),
            });
        }

        let resp: FavoritesPageResp = serde_json::from_slice(&body_bytes).map_err(|e| {
            error!(
                "[FavoriteAPI] 收藏列表反序列化失败: {:?}\n原始响应: {}",
                e, body_str
            );
            ApiError::Decode(format!("反序列化响应失败: {:?}", e))
        })?;

        if !resp.success {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: resp.message.unwrap_or_default(),
                errors: resp.errors,
            });
        }

        info!(
            "[FavoriteAPI] ✅ 收藏列表响应，页码: {}, 本页条数: {}, 总数: {}",
            resp.pagination.page,
            resp.data.len(),
            resp.pagination.total
        );

        Ok(resp)
    }

    async fn add(&self, swapi_id: u32) -> Result<FavoriteCharacter, ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/favorites", self.api_base_url);

        info!("[FavoriteAPI] 📡 添加收藏，位置 ID: {}", swapi_id);
        debug!("[FavoriteAPI]   请求URL: {}, 请求ID: {}", url, request_id);

        let response = self
            .client
            .post(&url)
            .header("X-Request-ID", &request_id)
            .json(&AddFavoriteReq {
                character_id: swapi_id,
            })
            .send()
            .await?;

        // 添加接口上的服务端拒绝属于校验失败（ID 越界、重复收藏等），
        // 5xx 仍按一般服务器错误处理
        let envelope = handle_http_response::<FavoriteCharacter>(response, "添加收藏")
            .await
            .map_err(|e| match e {
                ApiError::Upstream {
                    status,
                    message,
                    errors,
                } if status < 500 => ApiError::Validation { message, errors },
                other => other,
            })?;

        let favorite = envelope
            .data
            .ok_or_else(|| ApiError::Decode("响应中缺少 data 字段".to_string()))?;

        info!(
            "[FavoriteAPI] ✅ 收藏已添加，记录 ID: {}, 位置 ID: {}",
            favorite.id, favorite.swapi_id
        );

        Ok(favorite)
    }

    async fn remove(&self, favorite_id: u64) -> Result<(), ApiError> {
        let request_id = Uuid::new_v4().to_string();
        let url = format!("{}/api/favorites/{}", self.api_base_url, favorite_id);

        info!("[FavoriteAPI] 📡 删除收藏，记录 ID: {}", favorite_id);
        debug!("[FavoriteAPI]   请求URL: {}, 请求ID: {}", url, request_id);

        let response = self
            .client
            .delete(&url)
            .header("X-Request-ID", &request_id)
            .send()
            .await?;

        handle_http_response::<serde_json::Value>(response, "删除收藏")
            .await
            .map_err(|e| match e {
                ApiError::Upstream {
                    status: 404,
                    message,
                    ..
                } => ApiError::NotFound(if message.is_empty() {
                    "收藏记录不存在".to_string()
                } else {
                    message
                }),
                other => other,
            })?;

        info!("[FavoriteAPI] ✅ 收藏已删除，记录 ID: {}", favorite_id);

        Ok(())
    }
}
