//! 分片下载：执行单个分片，请求后流式写入分片文件并累加进度，失败时删除残缺分片。

use std::path::PathBuf;
use std::time::Duration;

use reqwest::Client;
use tokio::fs::File;

use crate::internal::downloader::structs::{ChunkResult, ChunkSpec, ChunkTransferError};
use crate::internal::states::job_progress::JobProgress;

use super::super::stream_writer::{stream_to_file, StreamToFileParams};
use super::part_store::remove_part;
use super::range_request::{fetch_range_response, FetchRangeParams};

/// 执行单个分片时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct FetchChunkParams {
    pub client: Client,
    pub url: String,
    pub chunk: ChunkSpec,
    pub part_path: PathBuf,
    pub progress: JobProgress,
    pub buffer_size: usize,
    pub stall_timeout: Duration,
}

/// 拉取一个分片，结果总是以 [`ChunkResult`] 返回，不会把错误抛出任务边界。
///
/// 只尝试一次：失败即删除该分片文件并返回失败结果，由下载器在全部分片结束后统一判定。
pub(crate) async fn fetch_chunk(params: FetchChunkParams) -> ChunkResult {
    let index = params.chunk.index;
    let mut written = 0u64;

    match fetch_into_part(&params, &mut written).await {
        Ok(()) => {
            tracing::debug!(index, bytes = written, "分片下载完成");
            ChunkResult::success(index, written)
        }
        Err(error) => {
            tracing::warn!(index, error = %error, "分片下载失败");
            if let Err(e) = remove_part(&params.part_path).await {
                tracing::warn!(path = %params.part_path.display(), error = %e, "删除残缺分片失败");
            }
            ChunkResult::failure(index, written, error)
        }
    }
}

async fn fetch_into_part(params: &FetchChunkParams, written: &mut u64) -> Result<(), ChunkTransferError> {
    let mut file = File::create(&params.part_path)
        .await
        .map_err(ChunkTransferError::CreateFile)?;

    // 零长度分片：留一个空分片文件，合并时照常参与
    let Some(range) = params.chunk.range_header() else {
        return Ok(());
    };

    let resp = fetch_range_response(FetchRangeParams {
        client: &params.client,
        url: &params.url,
        chunk: &params.chunk,
        range: &range,
        stall_timeout: params.stall_timeout,
    })
    .await?;

    stream_to_file(StreamToFileParams {
        response: resp,
        file: &mut file,
        buffer_size: params.buffer_size,
        stall_timeout: params.stall_timeout,
        progress: &params.progress,
        written: &mut *written,
    })
    .await?;

    let expected = params.chunk.len();
    if *written != expected {
        return Err(ChunkTransferError::LengthMismatch {
            expected,
            actual: *written,
        });
    }
    Ok(())
}
