//! Yandex Disk 公开链接解析器。

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;

use crate::internal::resolver::functions::probe_target;
use crate::internal::resolver::traits::ResourceResolver;

use super::download_target::DownloadTarget;
use super::resolve_error::ResolveError;

/// 公共 API 根地址
pub const DEFAULT_API_BASE: &str = "https://cloud-api.yandex.net";

/// 获取下载直链的接口路径
const DOWNLOAD_LINK_PATH: &str = "/v1/disk/public/resources/download";

/// 接口返回体，只关心 `href`
#[derive(Debug, Deserialize)]
struct DownloadLink {
    href: String,
}

/// 通过 Yandex Disk 公共接口把分享链接换成直链，再对直链做元数据探测。
#[derive(Debug, Clone)]
pub struct YandexDiskResolver {
    client: Client,
    api_base: String,
}

impl YandexDiskResolver {
    pub fn new(client: Client) -> Self {
        Self {
            client,
            api_base: DEFAULT_API_BASE.to_string(),
        }
    }

    /// 替换 API 根地址（镜像或本地测试服务器），末尾的 `/` 会被去掉。
    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_base(&self) -> &str {
        &self.api_base
    }

    /// 第一步：分享链接 → 直链
    async fn fetch_direct_url(&self, link: &str) -> Result<String, ResolveError> {
        let api_url = format!("{}{}", self.api_base, DOWNLOAD_LINK_PATH);
        let resp = self
            .client
            .get(&api_url)
            .query(&[("public_key", link)])
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            return Err(ResolveError::Status {
                stage: "下载链接接口",
                status,
            });
        }

        let link: DownloadLink = resp.json().await.map_err(|e| {
            if e.is_decode() {
                ResolveError::MalformedResponse(e.to_string())
            } else {
                ResolveError::Request(e)
            }
        })?;
        if link.href.trim().is_empty() {
            return Err(ResolveError::MalformedResponse("href 为空".to_string()));
        }
        Ok(link.href)
    }
}

#[async_trait]
impl ResourceResolver for YandexDiskResolver {
    async fn resolve(&self, link: &str) -> Result<DownloadTarget, ResolveError> {
        let direct_url = self.fetch_direct_url(link).await?;
        tracing::debug!(direct_url = %direct_url, "已获取下载直链");
        probe_target(&self.client, &direct_url).await
    }
}
