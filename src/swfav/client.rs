//! 客户端组合层
//!
//! 把目录服务和收藏服务装配在同一个 HTTP 客户端与同一份
//! 收藏 ID 共享集合之上，并暴露展示层级别的操作入口

use crate::swfav::character::api::CharacterApi;
use crate::swfav::character::service::CharacterService;
use crate::swfav::error::ApiError;
use crate::swfav::favorite::api::FavoriteApi;
use crate::swfav::favorite::listener::FavoriteListener;
use crate::swfav::favorite::models::{FavoriteCharacter, SharedFavoriteIds};
use crate::swfav::favorite::service::FavoriteService;
use crate::swfav::health::check_health;
use anyhow::{Context, Result};
use std::sync::Arc;
use tracing::info;

/// 客户端配置
#[derive(Clone, Debug)]
pub struct ClientConfig {
    /// HTTP API 基础地址
    pub api_base_url: String,
    /// 收藏列表每页条数
    pub page_size: u32,
}

impl ClientConfig {
    /// 创建默认配置
    pub fn new(api_base_url: impl Into<String>) -> Self {
        Self {
            api_base_url: api_base_url.into(),
            page_size: 10,
        }
    }

    /// 从环境变量 `SWFAV_API_BASE_URL` 读取基础地址，缺省用本地开发地址
    pub fn from_env() -> Self {
        let api_base_url = std::env::var("SWFAV_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".to_string());
        Self::new(api_base_url)
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}

/// SWAPI 收藏客户端
///
/// 目录服务与收藏服务通过共享的收藏 ID 集合协作：
/// 收藏服务维护集合，目录服务用它剔除已收藏的人物
#[derive(Clone)]
pub struct SwfavClient {
    config: ClientConfig,
    characters: Arc<CharacterService>,
    favorites: Arc<FavoriteService>,
}

impl SwfavClient {
    /// 创建新的客户端（使用默认空监听器）
    pub fn new(config: ClientConfig) -> Result<Self> {
        Self::build(config, None)
    }

    /// 创建新的客户端（带收藏变更监听器）
    pub fn with_listener(config: ClientConfig, listener: Arc<dyn FavoriteListener>) -> Result<Self> {
        Self::build(config, Some(listener))
    }

    fn build(config: ClientConfig, listener: Option<Arc<dyn FavoriteListener>>) -> Result<Self> {
        info!("[Client] 创建客户端，API 地址: {}", config.api_base_url);

        let http_client = reqwest::ClientBuilder::new()
            .default_headers({
                let mut headers = reqwest::header::HeaderMap::new();
                headers.insert(
                    reqwest::header::CONTENT_TYPE,
                    reqwest::header::HeaderValue::from_static("application/json"),
                );
                headers
            })
            .build()
            .context("创建 HTTP 客户端失败")?;

        let ids = SharedFavoriteIds::new();
        let character_api = Arc::new(CharacterApi::new(
            http_client.clone(),
            config.api_base_url.clone(),
        ));
        let favorite_api = Arc::new(FavoriteApi::new(http_client, config.api_base_url.clone()));

        let favorites = match listener {
            Some(listener) => FavoriteService::with_listener(
                favorite_api,
                ids.clone(),
                config.page_size,
                listener,
            ),
            None => FavoriteService::new(favorite_api, ids.clone(), config.page_size),
        };

        Ok(Self {
            characters: Arc::new(CharacterService::new(character_api, ids)),
            favorites: Arc::new(favorites),
            config,
        })
    }

    /// 目录服务
    pub fn characters(&self) -> Arc<CharacterService> {
        self.characters.clone()
    }

    /// 收藏服务
    pub fn favorites(&self) -> Arc<FavoriteService> {
        self.favorites.clone()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// 首轮加载：目录、收藏首页、收藏 ID 集合并发执行
    pub async fn init(&self) {
        info!("[Client] 🔄 首轮加载开始");
        tokio::join!(
            self.characters.reload(),
            self.favorites.reload_page(1),
            self.favorites.reload_all_ids(),
        );
        info!("[Client] ✅ 首轮加载完成");
    }

    /// 添加收藏；成功后重新加载目录，让可见列表反映新的排除集
    ///
    /// 添加失败时错误上抛，目录刷新被跳过
    pub async fn add_favorite(&self, swapi_id: u32) -> Result<FavoriteCharacter, ApiError> {
        let favorite = self.favorites.add(swapi_id).await?;
        self.characters.reload().await;
        Ok(favorite)
    }

    /// 删除收藏（目录的可见列表在下次推导时自动反映集合变化）
    pub async fn remove_favorite(&self, favorite_id: u64) -> Result<(), ApiError> {
        self.favorites.remove(favorite_id).await
    }

    /// 服务端健康检查
    pub async fn health(&self) -> bool {
        check_health(&self.config.api_base_url).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::swfav::character::models::{SearchFilters, SearchType};
    use std::sync::Once;
    use tracing::{error, info};

    static INIT_LOGGER: Once = Once::new();

    fn init_test_logger() {
        INIT_LOGGER.call_once(|| {
            use tracing_subscriber::prelude::*;
            use tracing_subscriber::EnvFilter;

            // 测试中默认打开当前 crate 的 debug，关闭底层 HTTP 客户端的 debug 噪音
            let filter_layer = EnvFilter::new(
                "info,swfav_sdk_rust=debug,hyper_util::client=info,reqwest=info",
            );

            let fmt_layer = tracing_subscriber::fmt::layer()
                .with_file(true)
                .with_line_number(true)
                .with_target(false)
                .with_test_writer();

            tracing_subscriber::registry()
                .with(filter_layer)
                .with(fmt_layer)
                .init();
        });
    }

    /// 对接真实后端的联调用例，默认忽略
    #[tokio::test]
    #[ignore]
    async fn run_against_live_backend() {
        init_test_logger();

        let client = match SwfavClient::new(ClientConfig::from_env()) {
            Ok(client) => client,
            Err(e) => {
                error!("创建客户端失败: {}", e);
                return;
            }
        };

        if !client.health().await {
            error!("服务端不可用，跳过联调");
            return;
        }

        client.init().await;

        let characters = client.characters();
        info!("目录共 {} 人", characters.characters().await.len());

        characters
            .set_filters(SearchFilters::new(SearchType::Name, "sky"))
            .await;
        for record in characters.visible().await {
            info!("命中: #{} {}", record.swapi_id, record.character.name);
        }

        // 添加并删除一条收藏，验证双投影的往返
        if let Ok(favorite) = client.add_favorite(1).await {
            info!("已收藏 #{}，记录 ID: {}", favorite.swapi_id, favorite.id);
            assert!(client.favorites().favorite_ids().contains(1).await);
            client.remove_favorite(favorite.id).await.ok();
        }
    }
}
