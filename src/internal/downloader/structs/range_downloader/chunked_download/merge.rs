//! 合并：按分片序号依次把分片文件追加进最终文件，结束后无论成败都清理分片。
//!
//! 分片文件不带偏移信息，字节顺序只由序号决定，必须按 0..n 遍历，不能按目录枚举顺序。

use std::io::ErrorKind;
use std::path::Path;

use tokio::fs::File;
use tokio::io::AsyncWriteExt;

use crate::internal::downloader::structs::DownloadError;

use super::part_store::{cleanup_parts, part_path};

/// 合并 `part_count` 个分片到 `final_path`，返回最终文件字节数。
///
/// 失败时删除写了一半的最终文件（仅限本次创建的）；分片清理在任何出口都会执行。
pub(crate) async fn merge_parts(final_path: &Path, part_count: usize) -> Result<u64, DownloadError> {
    let mut created = false;
    let outcome = concat_parts(final_path, part_count, &mut created).await;

    let removed = cleanup_parts(final_path, part_count).await;
    tracing::debug!(removed, "已清理分片文件");

    if outcome.is_err() && created {
        if let Err(e) = tokio::fs::remove_file(final_path).await {
            if e.kind() != ErrorKind::NotFound {
                tracing::warn!(path = %final_path.display(), error = %e, "删除未完成的合并文件失败");
            }
        }
    }
    outcome
}

async fn concat_parts(final_path: &Path, part_count: usize, created: &mut bool) -> Result<u64, DownloadError> {
    let mut output = File::create(final_path)
        .await
        .map_err(DownloadError::Merge)?;
    *created = true;
    let mut merged = 0u64;

    for index in 0..part_count {
        let path = part_path(final_path, index);
        let mut input = match File::open(&path).await {
            Ok(f) => f,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(DownloadError::MergeIntegrity { index, path });
            }
            Err(e) => return Err(DownloadError::Merge(e)),
        };
        merged += tokio::io::copy(&mut input, &mut output)
            .await
            .map_err(DownloadError::Merge)?;
    }

    output.flush().await.map_err(DownloadError::Merge)?;
    output.sync_all().await.map_err(DownloadError::Merge)?;
    Ok(merged)
}
