//! 单流回退：大小未知或不支持 Range 时，一个 GET 直接流式写最终文件，不分片、不合并。

use std::io::ErrorKind;
use std::path::Path;

use reqwest::Client;
use tokio::fs::File;
use tokio::time::timeout;

use crate::internal::downloader::structs::{ChunkTransferError, DownloaderConfig};
use crate::internal::states::job_progress::JobProgress;

use super::stream_writer::{stream_to_file, StreamToFileParams};

/// 单流下载的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct SingleStreamParams<'a> {
    pub client: &'a Client,
    pub url: &'a str,
    pub final_path: &'a Path,
    /// 解析得到的总大小，0 视为未知
    pub total: u64,
    pub config: &'a DownloaderConfig,
    pub progress: &'a JobProgress,
}

/// 整文件 GET，流式写入并更新进度，返回写入的字节数。
///
/// 失败时删除已写了一部分的最终文件。
pub(crate) async fn run_single_stream_download(params: SingleStreamParams<'_>) -> Result<u64, ChunkTransferError> {
    params
        .progress
        .reset((params.total > 0).then_some(params.total));

    let mut written = 0u64;
    let mut created = false;
    let outcome = stream_whole_body(&params, &mut written, &mut created).await;

    // 只删除本次创建的文件，请求阶段就失败时不动目标路径上已有的文件
    if outcome.is_err() && created {
        if let Err(e) = tokio::fs::remove_file(params.final_path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %params.final_path.display(), error = %e, "删除未完成文件失败");
            }
        }
    }
    outcome.map(|()| written)
}

async fn stream_whole_body(
    params: &SingleStreamParams<'_>,
    written: &mut u64,
    created: &mut bool,
) -> Result<(), ChunkTransferError> {
    let stall_timeout = params.config.stall_timeout;
    let resp = timeout(stall_timeout, params.client.get(params.url).send())
        .await
        .map_err(|_| ChunkTransferError::Stalled(stall_timeout))??;

    let status = resp.status();
    if !status.is_success() {
        return Err(ChunkTransferError::Status(status));
    }

    let mut file = File::create(params.final_path)
        .await
        .map_err(ChunkTransferError::CreateFile)?;
    *created = true;

    stream_to_file(StreamToFileParams {
        response: resp,
        file: &mut file,
        buffer_size: params.config.buffer_size,
        stall_timeout,
        progress: params.progress,
        written: &mut *written,
    })
    .await?;

    // 服务器声明了长度却提前断开时，按截断处理
    if params.total > 0 && *written != params.total {
        return Err(ChunkTransferError::LengthMismatch {
            expected: params.total,
            actual: *written,
        });
    }
    Ok(())
}
