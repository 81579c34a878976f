use super::chunk_transfer_error::ChunkTransferError;

/// 单个分片的执行结果：拉取任务结束时产出，交给下载器统一判定。
///
/// 分片内的错误不会越过任务边界，而是放进 `error` 里返回。
#[derive(Debug)]
pub struct ChunkResult {
    pub index: usize,
    /// 写入分片文件的字节数（失败时为失败前已写入的量）
    pub bytes: u64,
    pub error: Option<ChunkTransferError>,
}

impl ChunkResult {
    pub fn success(index: usize, bytes: u64) -> Self {
        Self {
            index,
            bytes,
            error: None,
        }
    }

    pub fn failure(index: usize, bytes: u64, error: ChunkTransferError) -> Self {
        Self {
            index,
            bytes,
            error: Some(error),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
