//! 解析器领域模块：把公开分享链接翻译成可直接下载的地址及其元数据。
//!
//! 解析失败会在任何分片工作开始前中止整个任务。
//! 对外导出以 [`crate::resolver`] 为准，此处仅做模块划分。

pub mod functions;
pub mod structs;
pub mod traits;
