//! 分片文件：`<最终路径>.part<序号>`，只在拉取开始到合并（或清理）之间存在。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// 第 `index` 个分片的临时文件路径。
pub fn part_path(final_path: &Path, index: usize) -> PathBuf {
    let mut raw = final_path.as_os_str().to_os_string();
    raw.push(format!(".part{index}"));
    PathBuf::from(raw)
}

/// 删除某个分片文件；文件不存在不算错误。
pub(crate) async fn remove_part(path: &Path) -> std::io::Result<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e),
    }
}

/// 清理本任务的全部分片文件，返回实际删除的数量。
///
/// 可重复调用：已清理过的分片直接跳过；删除失败只记录日志，不中断清理。
pub(crate) async fn cleanup_parts(final_path: &Path, part_count: usize) -> usize {
    let mut removed = 0;
    for index in 0..part_count {
        let path = part_path(final_path, index);
        match remove_part(&path).await {
            Ok(true) => removed += 1,
            Ok(false) => {}
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "删除分片文件失败");
            }
        }
    }
    removed
}
