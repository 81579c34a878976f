//! 单次传输（一个分片，或单流回退）的错误类型。

use std::time::Duration;

use reqwest::StatusCode;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ChunkTransferError {
    #[error("HTTP 请求失败: {0}")]
    Request(#[from] reqwest::Error),

    #[error("服务器返回异常状态: {0}")]
    Status(StatusCode),

    #[error("服务器忽略了 Range 请求，返回了完整内容（状态 {0}）")]
    RangeIgnored(StatusCode),

    #[error("返回的 Content-Range 与请求不符: 请求 {requested}，返回 {returned}")]
    ContentRangeMismatch { requested: String, returned: String },

    #[error("收到字节数与预期不符: 预期 {expected}，实际 {actual}")]
    LengthMismatch { expected: u64, actual: u64 },

    #[error("创建文件失败: {0}")]
    CreateFile(std::io::Error),

    #[error("写入文件失败: {0}")]
    WriteFile(std::io::Error),

    #[error("超过 {0:?} 未收到数据")]
    Stalled(Duration),

    #[error("并发许可已关闭")]
    PoolClosed,

    #[error("分片任务异常退出: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
}
