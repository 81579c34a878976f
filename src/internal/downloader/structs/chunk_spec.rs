//! 分片规划：总大小 + 并发数 → 连续、互不重叠且完整覆盖的字节区间序列。

/// 单个分片：起始偏移 + 长度；对外的结束偏移 [`ChunkSpec::end`] 为含上界写法。
///
/// 相邻分片满足 `prev.end() + 1 == next.start`。
/// `len == 0` 表示零长度分片（总大小小于并发数时出现），没有结束偏移，拉取时直接视为成功。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChunkSpec {
    /// 分片序号，从 0 开始，也是合并顺序
    pub index: usize,
    /// 起始偏移（含）
    pub start: u64,
    /// 分片字节数
    pub len: u64,
}

impl ChunkSpec {
    /// 分片字节数
    pub fn len(&self) -> u64 {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// 结束偏移（含）；零长度分片返回 `None`。
    pub fn end(&self) -> Option<u64> {
        (!self.is_empty()).then(|| self.start + self.len - 1)
    }

    /// 下一个分片的起始偏移，即本分片之后的第一个字节
    pub fn next_start(&self) -> u64 {
        self.start + self.len
    }

    /// 生成 Range 请求头：`bytes=start-end`；零长度分片不发请求，返回 `None`。
    pub fn range_header(&self) -> Option<String> {
        self.end()
            .map(|end| format!("bytes={}-{}", self.start, end))
    }
}

/// 按并发数切分：基准长度 `total / workers`，前 `workers - 1` 段各取基准长度，
/// 最后一段吸收整除余数，延伸到最后一个字节 `total - 1`。
///
/// 总是返回恰好 `workers` 段；`total < workers` 时基准长度为 0，前面的分片为空。
/// `workers` 为 0 时返回空序列，由调用方在规划前校验。
pub fn plan_chunks(total: u64, workers: usize) -> Vec<ChunkSpec> {
    if workers == 0 {
        return Vec::new();
    }
    let base = total / workers as u64;
    (0..workers)
        .map(|index| {
            let start = index as u64 * base;
            let len = if index + 1 == workers {
                total - start
            } else {
                base
            };
            ChunkSpec { index, start, len }
        })
        .collect()
}
