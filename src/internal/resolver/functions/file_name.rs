use std::path::{Component, Path};

use url::Url;

/// 直链中没有 `filename` 参数时使用的占位文件名
pub const UNKNOWN_FILE_NAME: &str = "unknown_file";

/// 从直链的 `filename` 查询参数取文件名（已做百分号解码）。
///
/// 只保留最后一级路径，空名、`.`、`..` 一律退回占位名，保证最终路径不会逃出目标目录。
pub fn file_name_from_url(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == "filename")
        .and_then(|(_, value)| sanitize_file_name(&value))
        .unwrap_or_else(|| UNKNOWN_FILE_NAME.to_string())
}

pub(crate) fn sanitize_file_name(raw: &str) -> Option<String> {
    // Windows 风格的分隔符也当作路径处理
    let normalized = raw.replace('\\', "/");
    let last = Path::new(&normalized).components().next_back()?;
    match last {
        Component::Normal(name) => {
            let name = name.to_string_lossy().trim().to_string();
            if name.is_empty() { None } else { Some(name) }
        }
        _ => None,
    }
}
