pub mod direct_url_resolver;
pub mod download_target;
pub mod resolve_error;
pub mod yandex_disk_resolver;

// 重导出公共类型
pub use direct_url_resolver::DirectUrlResolver;
pub use download_target::DownloadTarget;
pub use resolve_error::ResolveError;
pub use yandex_disk_resolver::{YandexDiskResolver, DEFAULT_API_BASE};
