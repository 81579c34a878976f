//! 分片下载：发起单段 Range 请求，校验响应后返回供流式读取。

use std::time::Duration;

use reqwest::header::{CONTENT_RANGE, RANGE};
use reqwest::{Client, Response, StatusCode};
use tokio::time::timeout;

use crate::internal::downloader::structs::{ChunkSpec, ChunkTransferError};

/// 发起 Range 请求时的参数（形参超过 3 个时用 struct 承载）。
pub struct FetchRangeParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    pub chunk: &'a ChunkSpec,
    pub range: &'a str,
    pub stall_timeout: Duration,
}

/// 发起单段 Range GET 请求。
///
/// 只接受 206；返回 200 说明服务器忽略了 Range，整段内容无法按偏移拼接，视为该分片失败。
pub async fn fetch_range_response(params: FetchRangeParams<'_>) -> Result<Response, ChunkTransferError> {
    let send = params
        .client
        .get(params.url)
        .header(RANGE, params.range)
        .send();
    let resp = timeout(params.stall_timeout, send)
        .await
        .map_err(|_| ChunkTransferError::Stalled(params.stall_timeout))??;

    match resp.status() {
        StatusCode::PARTIAL_CONTENT => {}
        status if status.is_success() => return Err(ChunkTransferError::RangeIgnored(status)),
        status => return Err(ChunkTransferError::Status(status)),
    }

    if let Some(returned) = resp
        .headers()
        .get(CONTENT_RANGE)
        .and_then(|v| v.to_str().ok())
    {
        if content_range_start(returned) != Some(params.chunk.start) {
            return Err(ChunkTransferError::ContentRangeMismatch {
                requested: params.range.to_string(),
                returned: returned.to_string(),
            });
        }
    }

    Ok(resp)
}

/// 解析 `bytes <start>-<end>/<total>` 的起始偏移。
fn content_range_start(value: &str) -> Option<u64> {
    let span = value.trim().strip_prefix("bytes")?.trim_start();
    let (start, _) = span.split_once('-')?;
    start.trim().parse().ok()
}
