//! # JobProgress
//!
//! 单个下载任务的字节进度：所有并发分片共用一个计数器，只增不减，仅在任务开始时重置。
//!
//! 计数本身是原子累加（不会丢失更新），对外发布的快照通过 [`watch`] 通道广播，
//! 发布时只接受更大的值，因此即使多个分片乱序发布，监听者看到的进度也是单调的。
//!
//! ## 使用示例
//! ```rust,no_run
//! use yadisk_dl::states::job_progress::JobProgress;
//!
//! # async fn example(progress: JobProgress) {
//! let mut watcher = progress.watch();
//! while let Ok(p) = watcher.changed().await {
//!     println!("{} / {:?}，{:.1}%", p.bytes_done, p.total, p.pct());
//! }
//! # }
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use thiserror::Error;
use tokio::sync::watch;
use tokio::sync::watch::error::RecvError;

/// 进度快照：已写入字节数，以及任务开始时已知的总大小。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DownloadProgress {
    /// 已写入磁盘的字节数
    pub bytes_done: u64,
    /// 总大小（字节），单流回退且大小未知时为 `None`
    pub total: Option<u64>,
}

impl DownloadProgress {
    /// 进度百分比（0～100）；总大小为 0 或未知时返回 `f64::NAN`。
    pub fn pct(&self) -> f64 {
        self.total
            .filter(|&t| t > 0)
            .map(|t| (self.bytes_done as f64 / t as f64) * 100.0)
            .unwrap_or(f64::NAN)
    }
}

/// 监听进度时可能出现的错误
#[derive(Debug, Error)]
pub enum ProgressWatchError {
    /// 进度对象已全部销毁，不会再有更新
    #[error("进度已销毁: {0}")]
    Closed(#[from] RecvError),
}

#[derive(Debug)]
struct Inner {
    bytes_done: AtomicU64,
    sender: watch::Sender<DownloadProgress>,
}

/// 任务进度聚合器：可廉价克隆，所有克隆共享同一计数。
#[derive(Clone, Debug)]
pub struct JobProgress {
    inner: Arc<Inner>,
}

impl Default for JobProgress {
    fn default() -> Self {
        Self::new()
    }
}

impl JobProgress {
    pub fn new() -> Self {
        let (sender, _) = watch::channel(DownloadProgress::default());
        Self {
            inner: Arc::new(Inner {
                bytes_done: AtomicU64::new(0),
                sender,
            }),
        }
    }

    /// 任务开始时重置计数，并记录总大小。
    pub(crate) fn reset(&self, total: Option<u64>) {
        self.inner.bytes_done.store(0, Ordering::SeqCst);
        self.inner.sender.send_replace(DownloadProgress {
            bytes_done: 0,
            total,
        });
    }

    /// 累加已写入的字节数，返回累加后的总数。
    pub fn add(&self, len: u64) -> u64 {
        if len == 0 {
            return self.bytes_done();
        }
        let current = self.inner.bytes_done.fetch_add(len, Ordering::SeqCst) + len;
        self.inner.sender.send_if_modified(|snapshot| {
            if current > snapshot.bytes_done {
                snapshot.bytes_done = current;
                true
            } else {
                false
            }
        });
        current
    }

    /// 当前累计字节数（精确值）
    pub fn bytes_done(&self) -> u64 {
        self.inner.bytes_done.load(Ordering::SeqCst)
    }

    /// 最近一次发布的快照
    pub fn snapshot(&self) -> DownloadProgress {
        *self.inner.sender.borrow()
    }

    /// 创建一个监听器，异步等待进度变化。
    pub fn watch(&self) -> ProgressWatcher {
        ProgressWatcher {
            receiver: self.inner.sender.subscribe(),
        }
    }
}

/// 进度监听器
pub struct ProgressWatcher {
    receiver: watch::Receiver<DownloadProgress>,
}

impl ProgressWatcher {
    /// 等待下一次进度变化并返回新快照。
    pub async fn changed(&mut self) -> Result<DownloadProgress, ProgressWatchError> {
        self.receiver.changed().await?;
        Ok(*self.receiver.borrow_and_update())
    }

    /// 同步读取当前快照。
    pub fn borrow(&self) -> DownloadProgress {
        *self.receiver.borrow()
    }
}
