use async_trait::async_trait;
use reqwest::Client;

use crate::internal::resolver::functions::probe_target;
use crate::internal::resolver::traits::ResourceResolver;

use super::download_target::DownloadTarget;
use super::resolve_error::ResolveError;

/// 直链解析器：链接本身就是可下载地址，只做元数据探测。
#[derive(Debug, Clone)]
pub struct DirectUrlResolver {
    client: Client,
}

impl DirectUrlResolver {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ResourceResolver for DirectUrlResolver {
    async fn resolve(&self, link: &str) -> Result<DownloadTarget, ResolveError> {
        probe_target(&self.client, link.trim()).await
    }
}
