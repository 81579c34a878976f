//! 解析器 trait：下载器只依赖这一接口，具体的远端 API 可替换。

use async_trait::async_trait;

use crate::internal::resolver::structs::{DownloadTarget, ResolveError};

/// 资源解析器：链接 → {直链, 文件名, 总大小, 是否支持 Range}。
///
/// 大小与 Range 支持必须来自对**直链**的元数据探测（HEAD），而不是原始链接。
#[async_trait]
pub trait ResourceResolver: Send + Sync {
    async fn resolve(&self, link: &str) -> Result<DownloadTarget, ResolveError>;
}
