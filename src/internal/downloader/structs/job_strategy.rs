use crate::internal::resolver::structs::DownloadTarget;

use super::chunk_spec::{plan_chunks, ChunkSpec};

/// 解析完成后一次性选定的执行策略。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStrategy {
    /// 已知大小且支持 Range：按规划并发拉取后合并
    Chunked(Vec<ChunkSpec>),
    /// 大小未知或不支持 Range：单个流直接写最终文件，不规划、不合并
    SingleStream,
}

impl JobStrategy {
    /// 大小为 0 或不支持 Range 时走回退路径，此时不会调用分片规划。
    pub fn select(target: &DownloadTarget, workers: usize) -> Self {
        if target.is_chunkable() {
            JobStrategy::Chunked(plan_chunks(target.total_size, workers))
        } else {
            JobStrategy::SingleStream
        }
    }
}
