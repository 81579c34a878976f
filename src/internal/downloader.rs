//! 下载器领域模块：分片规划、分片并发拉取、进度聚合、按序合并，以及不支持 Range 时的单流回退。
//!
//! 使用方式：`RangeDownloader::new(client, resolver).workers(8).download(link, dir).await`
//! 对外导出以 crate 根为准，此处仅做模块划分，不重复 pub use。

pub mod structs;
