//! SWAPI 收藏 CLI 客户端（测试版）
//!
//! 非交互式 CLI，用于测试和展示 SDK 功能：
//! 启动后做健康检查和首轮加载，按参数执行搜索、收藏、取消收藏

use anyhow::Result;
use clap::Parser;
use std::sync::Arc;
use swfav_sdk_rust::swfav::character::models::{SearchFilters, SearchType};
use swfav_sdk_rust::swfav::client::{ClientConfig, SwfavClient};
use swfav_sdk_rust::swfav::favorite::listener::FavoriteListener;
use tracing::{error, info, warn};

/// SWAPI 收藏 CLI 客户端
#[derive(Parser, Debug)]
#[command(name = "swfav-cli")]
#[command(about = "SWAPI 收藏 CLI 客户端 - 用于测试和展示 SDK 功能", long_about = None)]
struct Args {
    /// API 基础地址（默认读环境变量 SWFAV_API_BASE_URL）
    #[arg(short, long)]
    base_url: Option<String>,

    /// 搜索关键字
    #[arg(short, long)]
    query: Option<String>,

    /// 搜索类型：name 或 id
    #[arg(short = 't', long, default_value = "name")]
    search_type: String,

    /// 添加收藏（人物位置 ID）
    #[arg(long)]
    add: Option<u32>,

    /// 删除收藏（收藏记录 ID）
    #[arg(long)]
    remove: Option<u64>,

    /// 收藏列表页码
    #[arg(short, long, default_value = "1")]
    page: u32,

    /// 日志级别（默认: info,swfav_sdk_rust=debug）
    #[arg(long, default_value = "info,swfav_sdk_rust=debug")]
    log_level: String,
}

/// 初始化日志（同时输出到 stdout 和文件）
fn init_logger(log_level: &str) {
    use std::fs::OpenOptions;
    use std::io;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    // 优先使用环境变量 RUST_LOG（如果设置了），否则使用命令行参数
    let filter_layer =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));

    // 创建日志文件（追加模式）
    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open("debug.log")
        .expect("无法创建日志文件 debug.log");

    // 输出到 stdout（控制台），保留 ANSI 颜色代码用于终端显示
    let stdout_layer = tracing_subscriber::fmt::layer()
        .with_writer(io::stdout)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(true);

    // 输出到文件，禁用 ANSI 颜色代码（文件不需要颜色）
    let file_layer = tracing_subscriber::fmt::layer()
        .with_writer(log_file)
        .with_file(true)
        .with_line_number(true)
        .with_target(false)
        .with_ansi(false);

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(stdout_layer)
        .with(file_layer)
        .init();

    info!("[CLI] 📝 日志已同时输出到控制台和文件: debug.log");
}

/// 收藏变更监听器（输出集合变化）
struct CliFavoriteListener;

#[async_trait::async_trait]
impl FavoriteListener for CliFavoriteListener {
    async fn on_favorite_ids_changed(&self, swapi_ids: Vec<u32>) {
        info!("[CLI/Favorite] ⭐ 收藏 ID 集合变更: {:?}", swapi_ids);
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // 初始化日志
    init_logger(&args.log_level);

    info!("[CLI] 🚀 SWAPI 收藏 CLI 客户端（测试模式）");

    let config = match &args.base_url {
        Some(base_url) => ClientConfig::new(base_url.clone()),
        None => ClientConfig::from_env(),
    };
    info!("[CLI] 🌐 API 地址: {}", config.api_base_url);

    let client = SwfavClient::with_listener(config, Arc::new(CliFavoriteListener))?;

    // 健康检查
    if !client.health().await {
        warn!("[CLI] ⚠️ 服务端健康检查未通过，继续尝试加载");
    }

    // 首轮加载
    info!("[CLI] 🔗 正在加载目录和收藏...");
    client.init().await;

    let characters = client.characters();
    let favorites = client.favorites();

    if let Some(message) = characters.error().await {
        error!("[CLI] 目录加载失败: {}", message);
    } else {
        info!("[CLI] 📋 目录共 {} 人", characters.characters().await.len());
    }

    // 搜索
    if let Some(query) = &args.query {
        let search_type = match args.search_type.as_str() {
            "id" => SearchType::Id,
            _ => SearchType::Name,
        };
        characters
            .set_filters(SearchFilters::new(search_type, query.clone()))
            .await;

        let visible = characters.visible().await;
        info!("[CLI] 🔍 搜索 \"{}\" 命中 {} 条:", query, visible.len());
        for record in visible.iter().take(10) {
            info!(
                "[CLI]   - #{} {} ({}, {})",
                record.swapi_id,
                record.character.name,
                record.character.gender,
                record.character.birth_year
            );
        }
    }

    // 添加收藏
    if let Some(swapi_id) = args.add {
        match client.add_favorite(swapi_id).await {
            Ok(favorite) => info!(
                "[CLI] ✅ 已收藏 #{}，记录 ID: {}",
                favorite.swapi_id, favorite.id
            ),
            Err(e) => error!("[CLI] 添加收藏失败: {}", e.display_message()),
        }
    }

    // 删除收藏
    if let Some(favorite_id) = args.remove {
        match client.remove_favorite(favorite_id).await {
            Ok(()) => info!("[CLI] ✅ 已删除收藏，记录 ID: {}", favorite_id),
            Err(e) => error!("[CLI] 删除收藏失败: {}", e.display_message()),
        }
    }

    // 展示收藏列表
    favorites.set_page(args.page).await;
    if let Some(message) = favorites.error().await {
        error!("[CLI] 收藏列表加载失败: {}", message);
        return Ok(());
    }

    let pagination = favorites.pagination().await;
    info!(
        "[CLI] ❤️ 收藏列表（第 {}/{} 页，共 {} 条）:",
        pagination.page, pagination.total_pages, pagination.total
    );
    for favorite in favorites.items().await {
        info!(
            "[CLI]   - 记录 {} | #{} {}",
            favorite.id, favorite.swapi_id, favorite.character.name
        );
    }

    Ok(())
}
