//! 任务级响应式状态：基于 [`tokio::sync::watch`]，读写不阻塞，外部只读监听。

pub mod job_progress;
pub mod job_state;
