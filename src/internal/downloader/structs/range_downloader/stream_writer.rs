//! 流式写盘：把响应体按固定大小的缓冲写入文件，每写一次缓冲就累加一次任务进度。
//!
//! 分片拉取与单流回退共用这一段。

use std::time::Duration;

use bytes::BytesMut;
use futures_util::StreamExt;
use reqwest::Response;
use tokio::fs::File;
use tokio::io::AsyncWriteExt;
use tokio::time::timeout;

use crate::internal::downloader::structs::ChunkTransferError;
use crate::internal::states::job_progress::JobProgress;

/// 流式写盘时的参数（形参超过 3 个，用 struct 承载）。
pub(crate) struct StreamToFileParams<'a> {
    pub response: Response,
    pub file: &'a mut File,
    pub buffer_size: usize,
    pub stall_timeout: Duration,
    pub progress: &'a JobProgress,
    /// 已落盘的字节数；出错返回时保留出错前的值
    pub written: &'a mut u64,
}

/// 读取整个响应体写入文件；任何一次等待下一段数据超过 `stall_timeout` 即失败。
pub(crate) async fn stream_to_file(params: StreamToFileParams<'_>) -> Result<(), ChunkTransferError> {
    let StreamToFileParams {
        response,
        file,
        buffer_size,
        stall_timeout,
        progress,
        written,
    } = params;

    let buffer_size = buffer_size.max(1);
    let mut stream = response.bytes_stream();
    let mut buf = BytesMut::with_capacity(buffer_size);

    loop {
        let next = timeout(stall_timeout, stream.next())
            .await
            .map_err(|_| ChunkTransferError::Stalled(stall_timeout))?;
        match next {
            Some(Ok(bytes)) => {
                buf.extend_from_slice(&bytes);
                if buf.len() >= buffer_size {
                    flush_buffer(file, &mut buf, progress, written).await?;
                }
            }
            Some(Err(e)) => return Err(ChunkTransferError::Request(e)),
            None => break,
        }
    }

    flush_buffer(file, &mut buf, progress, written).await?;
    file.flush().await.map_err(ChunkTransferError::WriteFile)?;
    Ok(())
}

async fn flush_buffer(
    file: &mut File,
    buf: &mut BytesMut,
    progress: &JobProgress,
    written: &mut u64,
) -> Result<(), ChunkTransferError> {
    if buf.is_empty() {
        return Ok(());
    }
    file.write_all(&buf[..])
        .await
        .map_err(ChunkTransferError::WriteFile)?;
    let len = buf.len() as u64;
    *written += len;
    progress.add(len);
    buf.clear();
    Ok(())
}
