//! 分片下载：按规划 spawn 各分片任务，以及等待全部任务结束。

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use reqwest::Client;
use tokio::sync::Semaphore;
use tokio::task::JoinHandle;

use crate::internal::downloader::structs::{ChunkResult, ChunkSpec, ChunkTransferError};
use crate::internal::states::job_progress::JobProgress;

use super::fetch_chunk::{fetch_chunk, FetchChunkParams};
use super::part_store::part_path;

/// 单个分片任务句柄：(分片序号, JoinHandle)。
pub type ChunkTaskHandle = (usize, JoinHandle<ChunkResult>);

/// 生成并 spawn 分片任务时的参数（形参超过 3 个，用 struct 承载）。
pub struct SpawnChunkTasksParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    pub final_path: &'a Path,
    pub plan: &'a [ChunkSpec],
    pub semaphore: Arc<Semaphore>,
    pub progress: &'a JobProgress,
    pub buffer_size: usize,
    pub stall_timeout: Duration,
}

/// 为规划中的每个分片 spawn 一个任务，同时在途的请求数受信号量限制。
pub fn spawn_chunk_tasks(params: SpawnChunkTasksParams<'_>) -> Vec<ChunkTaskHandle> {
    params
        .plan
        .iter()
        .map(|chunk| {
            let fetch_params = FetchChunkParams {
                client: params.client.clone(),
                url: params.url.to_string(),
                chunk: *chunk,
                part_path: part_path(params.final_path, chunk.index),
                progress: params.progress.clone(),
                buffer_size: params.buffer_size,
                stall_timeout: params.stall_timeout,
            };
            let sem = Arc::clone(&params.semaphore);
            let index = chunk.index;
            let handle = tokio::spawn(async move {
                let _permit = match sem.acquire_owned().await {
                    Ok(permit) => permit,
                    Err(_) => return ChunkResult::failure(index, 0, ChunkTransferError::PoolClosed),
                };
                fetch_chunk(fetch_params).await
            });
            (index, handle)
        })
        .collect()
}

/// 等待全部分片任务结束（不因某个失败提前返回），按分片序号返回结果。
///
/// 任务 panic 或被中止同样记为该分片失败。
pub async fn join_chunk_tasks(handles: Vec<ChunkTaskHandle>) -> Vec<ChunkResult> {
    let mut results = Vec::with_capacity(handles.len());
    for (index, handle) in handles {
        let result = match handle.await {
            Ok(result) => result,
            Err(join_err) => ChunkResult::failure(index, 0, ChunkTransferError::TaskJoin(join_err)),
        };
        results.push(result);
    }
    results.sort_by_key(|r| r.index);
    results
}
