mod chunked;
pub(crate) mod fetch_chunk;
pub(crate) mod merge;
pub(crate) mod part_store;
mod range_request;
mod spawn_tasks;

pub(super) use chunked::{run_chunked_download, RunChunkedDownloadParams};
