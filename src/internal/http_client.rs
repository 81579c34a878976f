use reqwest::Client;

use crate::internal::downloader::structs::DownloaderConfig;

/// 创建解析器与下载器共用的 HTTP 客户端。
///
/// 客户端内部是 Arc，各分片任务直接 clone 共享连接池。
/// 不开启自动解压：分片按原始字节偏移拼接，解压会破坏长度校验。
pub fn build_http_client(config: &DownloaderConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .connect_timeout(config.connect_timeout)
        .user_agent(config.user_agent.as_str())
        .build()
}
