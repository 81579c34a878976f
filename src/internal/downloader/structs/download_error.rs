//! 下载任务级错误类型。

use std::path::PathBuf;

use thiserror::Error;

use crate::internal::resolver::structs::ResolveError;

use super::chunk_transfer_error::ChunkTransferError;

#[derive(Debug, Error)]
pub enum DownloadError {
    #[error("解析下载地址失败: {0}")]
    Resolve(#[from] ResolveError),

    #[error("{} / {total} 个分片下载失败（分片 {failed:?}），已放弃合并", .failed.len())]
    JobAborted { failed: Vec<usize>, total: usize },

    #[error("合并时缺少分片 {index}: {}", .path.display())]
    MergeIntegrity { index: usize, path: PathBuf },

    #[error("合并分片失败: {0}")]
    Merge(std::io::Error),

    #[error("单流下载失败: {0}")]
    Fallback(#[source] ChunkTransferError),

    #[error("创建目标目录失败: {0}")]
    CreateDir(std::io::Error),

    #[error("并发数必须大于 0")]
    InvalidWorkerCount,

    #[error("创建 HTTP 客户端失败: {0}")]
    HttpClient(#[from] reqwest::Error),
}
