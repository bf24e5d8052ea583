//! 通用类型与 HTTP 响应处理

use crate::swfav::error::{ApiError, FieldError};
use serde::{Deserialize, Deserializer};
use tracing::{debug, error};

/// 反序列化数组字段，处理 null 值
pub(crate) fn deserialize_vec_or_null<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    let opt = Option::<Vec<T>>::deserialize(deserializer)?;
    Ok(opt.unwrap_or_default())
}

/// 统一的 API 响应包装结构体（success、data、message、errors）
/// data 字段可能为 null 或缺失，因此使用 Option<T>
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: serde::de::Deserialize<'de>"))]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(default)]
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default, deserialize_with = "deserialize_vec_or_null")]
    pub errors: Vec<FieldError>,
}

/// 通用 HTTP 响应处理函数：校验 HTTP 状态与业务 success 标记，
/// 再反序列化为统一的响应结构体，所有走标准包装的接口共用此方法
pub async fn handle_http_response<T: serde::de::DeserializeOwned>(
    response: reqwest::Response,
    operation_name: &str,
) -> Result<ApiResponse<T>, ApiError> {
    let status = response.status();

    // 读取 body bytes（只能读取一次）
    let body_bytes = response.bytes().await?;
    let body_str = String::from_utf8_lossy(&body_bytes);
    debug!("[HTTP] {}响应 Body: {}", operation_name, body_str);

    if !status.is_success() {
        error!(
            "[HTTP] {}请求失败，HTTP状态: {}, 响应: {}",
            operation_name, status, body_str
        );
        // 失败响应通常也带标准包装，尽量把 message/errors 解析出来
        if let Ok(envelope) = serde_json::from_slice::<ApiResponse<serde_json::Value>>(&body_bytes)
        {
            return Err(ApiError::Upstream {
                status: status.as_u16(),
                message: envelope.message.unwrap_or_default(),
                errors: envelope.errors,
            });
        }
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message: body_str.to_string(),
            errors: Vec::new(),
        });
    }

    let envelope: ApiResponse<T> = serde_json::from_slice(&body_bytes).map_err(|e| {
        error!(
            "[HTTP] {}反序列化失败: {:?}\n原始响应: {}",
            operation_name, e, body_str
        );
        ApiError::Decode(format!("反序列化响应失败: {:?}", e))
    })?;

    if !envelope.success {
        error!(
            "[HTTP] {}服务端返回失败，message: {:?}, errors: {}",
            operation_name,
            envelope.message,
            envelope.errors.len()
        );
        return Err(ApiError::Upstream {
            status: status.as_u16(),
            message: envelope.message.unwrap_or_default(),
            errors: envelope.errors,
        });
    }

    Ok(envelope)
}
