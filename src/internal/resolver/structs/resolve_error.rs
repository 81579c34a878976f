//! 解析相关错误类型。

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResolveError {
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("{stage} 返回异常状态: {status}")]
    Status {
        stage: &'static str,
        status: StatusCode,
    },

    #[error("响应格式异常: {0}")]
    MalformedResponse(String),

    #[error("地址格式错误: {0}")]
    InvalidUrl(#[from] url::ParseError),
}
