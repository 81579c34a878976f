//! 分片并发下载器
//!
//! 把一个公开分享链接下载成本地文件：解析 → 规划 → 有界并发拉取分片 → 全部结束后判定 → 按序合并。
//! 服务器不支持 Range 或大小未知时，改走单流回退。
//!
//! ## 功能特性
//!
//! - **分片并发下载**：按并发数 N 把文件切成 N 段，每段一个 Range 请求，写入各自的分片文件
//! - **进度聚合**：所有分片共用一个 [`JobProgress`]，通过 `progress()` 获取可监听的句柄
//! - **状态机**：`INIT → RESOLVING → PLANNING → FETCHING → MERGING → DONE`，失败进入 `FAILED`，
//!   通过 `watch_state()` 监听
//! - **单流回退**：大小为 0 或未声明 `Accept-Ranges: bytes` 时，一个 GET 直接写最终文件
//! - **失败不留垃圾**：任一分片失败则放弃合并并清理全部分片；合并失败删除半成品
//!
//! ## 使用示例
//!
//! ```rust,no_run
//! # use yadisk_dl::{DownloaderConfig, RangeDownloader};
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let downloader = RangeDownloader::yandex(DownloaderConfig::default())?.workers(4);
//!
//! let progress = downloader.progress();
//! tokio::spawn(async move {
//!     let mut watcher = progress.watch();
//!     while let Ok(p) = watcher.changed().await {
//!         println!("{:.1}%", p.pct());
//!     }
//! });
//!
//! let result = downloader
//!     .download("https://disk.yandex.ru/d/xxxx", "./downloads")
//!     .await?;
//! println!("已保存到 {}", result.path().display());
//! # Ok(())
//! # }
//! ```
//!
//! ## 内部实现说明
//!
//! - `chunked_download` 子模块：分片拉取、分片文件、合并
//! - `single_download` 子模块：单流回退
//! - `stream_writer` 子模块：两条路径共用的流式写盘

pub(crate) mod chunked_download;
pub(crate) mod single_download;
pub(crate) mod stream_writer;

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::{watch, Mutex};

use crate::internal::http_client::build_http_client;
use crate::internal::resolver::functions::file_name::{sanitize_file_name, UNKNOWN_FILE_NAME};
use crate::internal::resolver::structs::{DownloadTarget, YandexDiskResolver};
use crate::internal::resolver::traits::ResourceResolver;
use crate::internal::states::job_progress::JobProgress;
use crate::internal::states::job_state::{JobState, JobStateCell};

use super::download_error::DownloadError;
use super::download_result::DownloadResult;
use super::downloader_config::DownloaderConfig;
use super::job_strategy::JobStrategy;
use chunked_download::{run_chunked_download, RunChunkedDownloadParams};
use single_download::{run_single_stream_download, SingleStreamParams};

pub use chunked_download::part_store::part_path;

/// 分片并发下载器
///
/// 一个下载器同一时间只执行一个任务；并发调用 `download` 会排队。
/// 进度与状态在每个任务开始时重置。
pub struct RangeDownloader {
    client: Client,
    resolver: Arc<dyn ResourceResolver>,
    config: DownloaderConfig,
    progress: JobProgress,
    state: JobStateCell,
    job_lock: Mutex<()>,
}

impl std::fmt::Debug for RangeDownloader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RangeDownloader")
            .field("config", &self.config)
            .field("state", &self.state.get())
            .finish()
    }
}

impl RangeDownloader {
    /// 用已有的客户端和解析器创建下载器；客户端会被所有分片共享。
    pub fn new(client: Client, resolver: impl ResourceResolver + 'static) -> Self {
        Self {
            client,
            resolver: Arc::new(resolver),
            config: DownloaderConfig::default(),
            progress: JobProgress::new(),
            state: JobStateCell::new(),
            job_lock: Mutex::new(()),
        }
    }

    /// 便捷方法：按配置创建客户端，使用 Yandex Disk 公共接口解析链接。
    pub fn yandex(config: DownloaderConfig) -> Result<Self, DownloadError> {
        let client = build_http_client(&config)?;
        let resolver = YandexDiskResolver::new(client.clone());
        Ok(Self::new(client, resolver).with_config(config))
    }

    pub fn with_config(mut self, config: DownloaderConfig) -> Self {
        self.config = config;
        self
    }

    /// 设置并发数（也是分片数），必须大于 0
    pub fn workers(mut self, workers: usize) -> Self {
        self.config.workers = workers;
        self
    }

    /// 设置写盘缓冲大小（字节）
    pub fn buffer_size(mut self, buffer_size: usize) -> Self {
        self.config.buffer_size = buffer_size;
        self
    }

    /// 设置无数据超时
    pub fn stall_timeout(mut self, stall_timeout: Duration) -> Self {
        self.config.stall_timeout = stall_timeout;
        self
    }

    pub fn config(&self) -> &DownloaderConfig {
        &self.config
    }

    /// 任务进度；返回可共享句柄，`.watch()` 后 `changed().await` 监听。
    pub fn progress(&self) -> JobProgress {
        self.progress.clone()
    }

    /// 当前状态
    pub fn state(&self) -> JobState {
        self.state.get()
    }

    /// 最近一个任务依次经历的状态，从 `Init` 开始
    pub fn state_history(&self) -> Vec<JobState> {
        self.state.history()
    }

    /// 监听状态迁移
    pub fn watch_state(&self) -> watch::Receiver<JobState> {
        self.state.subscribe()
    }

    /// 完整任务：解析链接，再下载到 `dest_dir/<文件名>`。目标目录不存在时自动创建。
    pub async fn download(
        &self,
        link: &str,
        dest_dir: impl AsRef<Path>,
    ) -> Result<DownloadResult, DownloadError> {
        let _job = self.job_lock.lock().await;
        self.begin()?;

        self.state.set(JobState::Resolving);
        let target = match self.resolver.resolve(link).await {
            Ok(target) => target,
            Err(e) => {
                tracing::warn!(error = %e, "解析失败");
                self.state.set(JobState::Failed);
                return Err(e.into());
            }
        };
        tracing::info!(
            file_name = %target.file_name,
            total_size = target.total_size,
            supports_ranges = target.supports_ranges,
            "解析完成"
        );

        self.run_job(&target, dest_dir.as_ref()).await
    }

    /// 跳过解析，直接下载一个已解析好的目标。
    pub async fn download_target(
        &self,
        target: &DownloadTarget,
        dest_dir: impl AsRef<Path>,
    ) -> Result<DownloadResult, DownloadError> {
        let _job = self.job_lock.lock().await;
        self.begin()?;
        self.run_job(target, dest_dir.as_ref()).await
    }

    fn begin(&self) -> Result<(), DownloadError> {
        self.state.set(JobState::Init);
        self.progress.reset(None);
        if self.config.workers == 0 {
            self.state.set(JobState::Failed);
            return Err(DownloadError::InvalidWorkerCount);
        }
        Ok(())
    }

    async fn run_job(&self, target: &DownloadTarget, dest_dir: &Path) -> Result<DownloadResult, DownloadError> {
        if let Err(e) = tokio::fs::create_dir_all(dest_dir).await {
            self.state.set(JobState::Failed);
            return Err(DownloadError::CreateDir(e));
        }
        let file_name = sanitize_file_name(&target.file_name)
            .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string());
        let final_path = dest_dir.join(file_name);

        if target.is_chunkable() {
            self.state.set(JobState::Planning);
        }
        match JobStrategy::select(target, self.config.workers) {
            JobStrategy::Chunked(plan) => {
                run_chunked_download(RunChunkedDownloadParams {
                    client: &self.client,
                    url: &target.url,
                    total: target.total_size,
                    final_path: &final_path,
                    plan,
                    config: &self.config,
                    progress: &self.progress,
                    state: &self.state,
                })
                .await
            }
            JobStrategy::SingleStream => self.run_fallback(target, &final_path).await,
        }
    }

    async fn run_fallback(&self, target: &DownloadTarget, final_path: &Path) -> Result<DownloadResult, DownloadError> {
        self.state.set(JobState::FallbackFetching);
        tracing::info!(
            path = %final_path.display(),
            "大小未知或服务器不支持 Range，改用单流下载"
        );

        let outcome = run_single_stream_download(SingleStreamParams {
            client: &self.client,
            url: &target.url,
            final_path,
            total: target.total_size,
            config: &self.config,
            progress: &self.progress,
        })
        .await;

        match outcome {
            Ok(bytes) => {
                self.state.set(JobState::Done);
                tracing::info!(path = %final_path.display(), bytes, "单流下载完成");
                Ok(DownloadResult::Streamed {
                    path: final_path.to_path_buf(),
                    bytes,
                })
            }
            Err(e) => {
                self.state.set(JobState::Failed);
                tracing::warn!(error = %e, "单流下载失败");
                Err(DownloadError::Fallback(e))
            }
        }
    }
}
