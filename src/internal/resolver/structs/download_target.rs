/// 解析结果：解析器产出一次，之后不可变，由下载器在整个任务期间持有。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTarget {
    pub url: String,          // 可直接 GET 的地址
    pub file_name: String,    // 已清洗的文件名（不含路径分隔）
    pub total_size: u64,      // 总大小（字节），未知时为 0
    pub supports_ranges: bool, // 服务器是否声明 `Accept-Ranges: bytes`
}

impl DownloadTarget {
    /// 是否可以走分片并发下载
    pub fn is_chunkable(&self) -> bool {
        self.total_size > 0 && self.supports_ranges
    }
}
