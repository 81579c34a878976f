pub mod chunk_result;
pub mod chunk_spec;
pub mod chunk_transfer_error;
pub mod download_error;
pub mod download_result;
pub mod downloader_config;
pub mod job_strategy;
pub mod range_downloader;

// 重导出公共类型
pub use chunk_result::ChunkResult;
pub use chunk_spec::{plan_chunks, ChunkSpec};
pub use chunk_transfer_error::ChunkTransferError;
pub use download_error::DownloadError;
pub use download_result::DownloadResult;
pub use downloader_config::DownloaderConfig;
pub use job_strategy::JobStrategy;
pub use range_downloader::{part_path, RangeDownloader};
