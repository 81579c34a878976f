use std::fmt;
use std::sync::{Mutex, PoisonError};

use tokio::sync::watch;

/// 下载任务状态机的阶段（由下载器内部维护，外部只读监听）
///
/// 分片路径：`Init → Resolving → Planning → Fetching → Merging → Done`；
/// 回退路径：`Init → Resolving → FallbackFetching → Done`；
/// `Failed` 可由 `Resolving`、`Fetching`、`Merging`、`FallbackFetching` 到达。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum JobState {
    #[default]
    Init,
    Resolving,
    Planning,
    Fetching,
    Merging,
    FallbackFetching,
    Done,
    Failed,
}

impl JobState {
    /// 是否为终止状态
    pub fn is_terminal(&self) -> bool {
        matches!(self, JobState::Done | JobState::Failed)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            JobState::Init => "init",
            JobState::Resolving => "resolving",
            JobState::Planning => "planning",
            JobState::Fetching => "fetching",
            JobState::Merging => "merging",
            JobState::FallbackFetching => "fallback_fetching",
            JobState::Done => "done",
            JobState::Failed => "failed",
        }
    }
}

impl fmt::Display for JobState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// 状态发布端：下载器持有，每次状态迁移时广播。
///
/// watch 通道只保留最新值，另记一份本次任务的迁移历史（回到 `Init` 时清空）。
#[derive(Debug)]
pub(crate) struct JobStateCell {
    sender: watch::Sender<JobState>,
    history: Mutex<Vec<JobState>>,
}

impl JobStateCell {
    pub(crate) fn new() -> Self {
        let (sender, _) = watch::channel(JobState::Init);
        Self {
            sender,
            history: Mutex::new(vec![JobState::Init]),
        }
    }

    pub(crate) fn set(&self, state: JobState) {
        let previous = self.sender.send_replace(state);
        {
            let mut history = self.history.lock().unwrap_or_else(PoisonError::into_inner);
            if state == JobState::Init {
                history.clear();
            }
            if history.last() != Some(&state) {
                history.push(state);
            }
        }
        if previous != state {
            tracing::debug!(from = %previous, to = %state, "任务状态迁移");
        }
    }

    pub(crate) fn get(&self) -> JobState {
        *self.sender.borrow()
    }

    /// 本次任务经历过的状态，按迁移顺序
    pub(crate) fn history(&self) -> Vec<JobState> {
        self.history
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub(crate) fn subscribe(&self) -> watch::Receiver<JobState> {
        self.sender.subscribe()
    }
}
