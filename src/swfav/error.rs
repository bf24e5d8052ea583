//! 统一错误类型定义
//!
//! HTTP 客户端层的各种失败统一收敛为 [`ApiError`]，
//! 服务层通过 [`ApiError::display_message`] 归一成可直接展示的文案

use serde::Deserialize;
use thiserror::Error;

/// 字段级校验错误（服务端 errors 数组的元素）
#[derive(Debug, Clone, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// API 统一错误类型
#[derive(Debug, Error)]
pub enum ApiError {
    /// 传输层失败（请求没有拿到响应）
    #[error("请求失败: {0}")]
    Network(#[from] reqwest::Error),

    /// 服务端返回失败响应（success=false 或非 2xx）
    #[error("服务器错误 {status}: {message}")]
    Upstream {
        status: u16,
        message: String,
        errors: Vec<FieldError>,
    },

    /// 添加收藏时的服务端校验失败（如位置 ID 越界、重复收藏）
    #[error("校验失败: {message}")]
    Validation {
        message: String,
        errors: Vec<FieldError>,
    },

    /// 操作了不存在的收藏记录
    #[error("记录不存在: {0}")]
    NotFound(String),

    /// 响应内容不符合约定（反序列化失败、分页字段异常等）
    #[error("{0}")]
    Decode(String),
}

impl ApiError {
    /// 归一成展示层可直接使用的一句话
    ///
    /// 优先级：服务端 message > errors 各条 message 拼接 > 传输层错误文本 > 固定兜底文案
    pub fn display_message(&self) -> String {
        match self {
            ApiError::Upstream {
                message, errors, ..
            }
            | ApiError::Validation { message, errors } => {
                if !message.is_empty() {
                    message.clone()
                } else if !errors.is_empty() {
                    errors
                        .iter()
                        .map(|e| e.message.clone())
                        .collect::<Vec<_>>()
                        .join(", ")
                } else {
                    "未知错误".to_string()
                }
            }
            ApiError::NotFound(message) => {
                if message.is_empty() {
                    "未知错误".to_string()
                } else {
                    message.clone()
                }
            }
            ApiError::Network(e) => e.to_string(),
            ApiError::Decode(message) => message.clone(),
        }
    }
}
