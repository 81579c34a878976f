//! 直链元数据探测：HEAD 请求拿总大小与 Range 支持情况。

use reqwest::Client;
use reqwest::header::{ACCEPT_RANGES, CONTENT_LENGTH, HeaderMap};
use url::Url;

use crate::internal::resolver::structs::{DownloadTarget, ResolveError};

use super::file_name::file_name_from_url;

/// 对直链发起 HEAD（跟随重定向），组装成 [`DownloadTarget`]。
///
/// 缺少或无法解析 `Content-Length` 时大小记为 0，下载器据此走单流回退。
pub async fn probe_target(client: &Client, direct_url: &str) -> Result<DownloadTarget, ResolveError> {
    let url = Url::parse(direct_url)?;
    let file_name = file_name_from_url(&url);

    let resp = client.head(url.as_str()).send().await?;
    let status = resp.status();
    if !status.is_success() {
        return Err(ResolveError::Status {
            stage: "元数据探测",
            status,
        });
    }

    // HEAD 响应没有 body，reqwest 的 content_length() 不可靠，直接读响应头
    let headers = resp.headers();
    let total_size = content_length(headers);
    let supports_ranges = accepts_byte_ranges(headers);

    tracing::debug!(
        url = %url,
        file_name = %file_name,
        total_size,
        supports_ranges,
        "直链探测完成"
    );

    Ok(DownloadTarget {
        url: url.to_string(),
        file_name,
        total_size,
        supports_ranges,
    })
}

fn content_length(headers: &HeaderMap) -> u64 {
    headers
        .get(CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(0)
}

fn accepts_byte_ranges(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT_RANGES)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.trim() == "bytes")
}
