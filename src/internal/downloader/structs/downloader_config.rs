use std::time::Duration;

/// 默认并发数（同时也是分片数）
pub const DEFAULT_WORKERS: usize = 8;

/// 默认写盘缓冲：1MB，也是进度上报粒度
pub const DEFAULT_BUFFER_SIZE: usize = 1024 * 1024;

/// 默认无数据超时（秒）
pub const DEFAULT_STALL_TIMEOUT_SECS: u64 = 30;

/// 默认连接超时（秒）
pub const DEFAULT_CONNECT_TIMEOUT_SECS: u64 = 10;

#[derive(Debug, Clone)]
pub struct DownloaderConfig {
    /// 并发数，也是分片数；没有单独的线程池大小配置
    pub workers: usize,
    /// 每次写盘的缓冲大小（字节）
    pub buffer_size: usize,
    /// 建立响应、以及每次等待下一段数据的最长时间；超时即判定该分片失败
    pub stall_timeout: Duration,
    /// 连接超时，作用于共享 HTTP 客户端
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for DownloaderConfig {
    fn default() -> Self {
        Self {
            workers: DEFAULT_WORKERS,
            buffer_size: DEFAULT_BUFFER_SIZE,
            stall_timeout: Duration::from_secs(DEFAULT_STALL_TIMEOUT_SECS),
            connect_timeout: Duration::from_secs(DEFAULT_CONNECT_TIMEOUT_SECS),
            user_agent: format!("yadisk-dl/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
