//! 分片下载：多段 Range 请求并发写分片文件 + 进度聚合 + 全部结束后判定 + 按序合并。

use std::path::Path;
use std::sync::Arc;

use reqwest::Client;
use tokio::sync::Semaphore;

use crate::internal::downloader::structs::{ChunkSpec, DownloadError, DownloadResult, DownloaderConfig};
use crate::internal::states::job_progress::JobProgress;
use crate::internal::states::job_state::{JobState, JobStateCell};

use super::merge::merge_parts;
use super::part_store::cleanup_parts;
use super::spawn_tasks::{join_chunk_tasks, spawn_chunk_tasks, SpawnChunkTasksParams};

/// 分片下载入口的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct RunChunkedDownloadParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    pub total: u64,
    pub final_path: &'a Path,
    pub plan: Vec<ChunkSpec>,
    pub config: &'a DownloaderConfig,
    pub progress: &'a JobProgress,
    pub state: &'a JobStateCell,
}

/// 分片下载入口：FETCHING → MERGING → DONE，任一环节失败进入 FAILED。
///
/// 等所有分片都返回后才判定成败，不会因为某个分片失败去取消其他分片。
pub(crate) async fn run_chunked_download(
    params: RunChunkedDownloadParams<'_>,
) -> Result<DownloadResult, DownloadError> {
    let chunk_count = params.plan.len();
    params.progress.reset(Some(params.total));
    params.state.set(JobState::Fetching);

    tracing::info!(
        path = %params.final_path.display(),
        total = params.total,
        chunks = chunk_count,
        "开始分片下载"
    );

    let semaphore = Arc::new(Semaphore::new(params.config.workers.max(1)));
    let handles = spawn_chunk_tasks(SpawnChunkTasksParams {
        client: params.client,
        url: params.url,
        final_path: params.final_path,
        plan: &params.plan,
        semaphore,
        progress: params.progress,
        buffer_size: params.config.buffer_size,
        stall_timeout: params.config.stall_timeout,
    });
    let results = join_chunk_tasks(handles).await;

    let failed: Vec<usize> = results
        .iter()
        .filter(|r| !r.is_success())
        .map(|r| r.index)
        .collect();

    if !failed.is_empty() {
        // 成功分片留下的文件同样清理，失败任务不遗留任何分片
        let removed = cleanup_parts(params.final_path, chunk_count).await;
        tracing::warn!(
            failed = failed.len(),
            total = chunk_count,
            removed,
            "存在失败分片，放弃合并"
        );
        params.state.set(JobState::Failed);
        return Err(DownloadError::JobAborted {
            failed,
            total: chunk_count,
        });
    }

    params.state.set(JobState::Merging);
    match merge_parts(params.final_path, chunk_count).await {
        Ok(bytes) => {
            params.state.set(JobState::Done);
            tracing::info!(path = %params.final_path.display(), bytes, "合并完成");
            Ok(DownloadResult::Merged {
                path: params.final_path.to_path_buf(),
                bytes,
                chunks: chunk_count,
            })
        }
        Err(e) => {
            params.state.set(JobState::Failed);
            tracing::warn!(error = %e, "合并失败");
            Err(e)
        }
    }
}
