use std::path::PathBuf;

/// 单次下载任务的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DownloadResult {
    /// 分片并发下载并按序合并
    Merged {
        path: PathBuf,
        bytes: u64,
        chunks: usize,
    },
    /// 单流回退下载
    Streamed { path: PathBuf, bytes: u64 },
}

impl DownloadResult {
    /// 最终文件路径
    pub fn path(&self) -> &PathBuf {
        match self {
            DownloadResult::Merged { path, .. } | DownloadResult::Streamed { path, .. } => path,
        }
    }

    /// 最终文件字节数
    pub fn bytes(&self) -> u64 {
        match self {
            DownloadResult::Merged { bytes, .. } | DownloadResult::Streamed { bytes, .. } => *bytes,
        }
    }
}
