//! 服务端健康检查

use crate::swfav::types::handle_http_response;
use serde::Deserialize;
use tracing::{debug, info, warn};

/// 健康检查响应数据
#[derive(Debug, Deserialize)]
pub struct HealthData {
    pub message: String,
    pub timestamp: String,
}

/// 探测服务端是否可用
///
/// 任何失败（网络、非 2xx、success=false）都按不可用处理，不上抛错误
pub async fn check_health(api_base_url: &str) -> bool {
    let client = reqwest::Client::new();
    let url = format!("{}/health", api_base_url);
    debug!("[Health] 探测服务健康状态: {}", url);

    let response = match client.get(&url).send().await {
        Ok(response) => response,
        Err(e) => {
            warn!("[Health] 健康检查请求失败: {}", e);
            return false;
        }
    };

    match handle_http_response::<HealthData>(response, "健康检查").await {
        Ok(envelope) => {
            if let Some(data) = envelope.data {
                info!("[Health] ✅ 服务健康: {} ({})", data.message, data.timestamp);
            }
            true
        }
        Err(e) => {
            warn!("[Health] 健康检查失败: {}", e.display_message());
            false
        }
    }
}
