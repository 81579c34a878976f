//! 下载器端到端测试：本地模拟 Yandex 接口 + 文件服务器，覆盖分片成功、分片失败、
//! 单流回退、解析失败与退化规划。

use std::path::Path;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::http::StatusCode;

use crate::internal::downloader::structs::{
    part_path, plan_chunks, ChunkTransferError, DownloadError, DownloadResult, DownloaderConfig,
    RangeDownloader,
};
use crate::internal::states::job_state::JobState;
use crate::tests::{random_payload, MockOptions, MockServer};

const LINK: &str = "https://disk.yandex.ru/d/AbCdEf123";

fn assert_no_parts(final_path: &Path, count: usize) {
    for i in 0..count {
        assert!(!part_path(final_path, i).exists(), "分片 {i} 未清理");
    }
}

#[tokio::test]
async fn chunked_download_reassembles_remote_file() {
    let server = MockServer::start(random_payload(1_000_003), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let result = downloader.download(LINK, dir.path()).await.unwrap();

    let final_path = dir.path().join("payload.bin");
    match &result {
        DownloadResult::Merged { path, bytes, chunks } => {
            assert_eq!(path, &final_path);
            assert_eq!(*bytes, 1_000_003);
            assert_eq!(*chunks, 4);
        }
        other => panic!("预期分片合并，得到 {other:?}"),
    }
    assert_eq!(tokio::fs::read(&final_path).await.unwrap(), server.payload());
    assert_no_parts(&final_path, 4);

    assert_eq!(downloader.state(), JobState::Done);
    assert_eq!(
        downloader.state_history(),
        vec![
            JobState::Init,
            JobState::Resolving,
            JobState::Planning,
            JobState::Fetching,
            JobState::Merging,
            JobState::Done,
        ]
    );
    assert_eq!(downloader.progress().bytes_done(), 1_000_003);
    assert_eq!(downloader.progress().snapshot().total, Some(1_000_003));
    assert_eq!(server.api_requests(), 1);
    assert_eq!(server.last_public_key().as_deref(), Some(LINK));
    assert_eq!(server.range_requests(), 4);
    assert_eq!(server.full_requests(), 0);
}

#[tokio::test]
async fn failing_chunk_aborts_job_without_leftovers() {
    let total = 400_000u64;
    let failing = plan_chunks(total, 4)[2].start;
    let options = MockOptions {
        fail_range_starts: vec![failing],
        ..Default::default()
    };
    let server = MockServer::start(random_payload(total as usize), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let err = downloader.download(LINK, dir.path()).await.unwrap_err();

    match err {
        DownloadError::JobAborted { failed, total } => {
            assert_eq!(failed, vec![2]);
            assert_eq!(total, 4);
        }
        other => panic!("预期 JobAborted，得到 {other:?}"),
    }
    let final_path = dir.path().join("payload.bin");
    assert!(!final_path.exists(), "失败任务不应产生最终文件");
    assert_no_parts(&final_path, 4);
    assert_eq!(downloader.state(), JobState::Failed);
    // 其余分片仍然全部执行完毕
    assert_eq!(server.range_requests(), 4);
}

#[tokio::test]
async fn ignored_ranges_fail_every_chunk() {
    let options = MockOptions {
        ignore_range: true,
        ..Default::default()
    };
    let server = MockServer::start(random_payload(10_000), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(3);

    let err = downloader.download(LINK, dir.path()).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::JobAborted { ref failed, total: 3 } if failed == &vec![0, 1, 2]
    ));
    let final_path = dir.path().join("payload.bin");
    assert!(!final_path.exists());
    assert_no_parts(&final_path, 3);
}

#[tokio::test]
async fn no_range_support_falls_back_to_single_stream() {
    let options = MockOptions {
        supports_ranges: false,
        ..Default::default()
    };
    let server = MockServer::start(random_payload(250_000), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let result = downloader.download(LINK, dir.path()).await.unwrap();

    let final_path = dir.path().join("payload.bin");
    assert!(matches!(result, DownloadResult::Streamed { bytes: 250_000, .. }));
    assert_eq!(result.path(), final_path.as_path());
    assert_eq!(tokio::fs::read(&final_path).await.unwrap(), server.payload());
    assert_no_parts(&final_path, 4);
    assert_eq!(server.range_requests(), 0);
    assert_eq!(server.full_requests(), 1);
    assert_eq!(downloader.progress().bytes_done(), 250_000);
    assert_eq!(downloader.state(), JobState::Done);
}

#[tokio::test]
async fn unknown_size_falls_back_to_single_stream() {
    let options = MockOptions {
        advertise_length: false,
        ..Default::default()
    };
    let server = MockServer::start(random_payload(33_333), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(8);

    let result = downloader.download(LINK, dir.path()).await.unwrap();

    assert!(matches!(result, DownloadResult::Streamed { bytes: 33_333, .. }));
    assert_eq!(server.range_requests(), 0);
    assert_eq!(downloader.progress().bytes_done(), 33_333);
    assert_eq!(downloader.progress().snapshot().total, None);
}

#[tokio::test]
async fn fallback_failure_removes_partial_file() {
    let options = MockOptions {
        supports_ranges: false,
        truncate_full_get: Some(100),
        ..Default::default()
    };
    let server = MockServer::start(random_payload(5000), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let err = downloader.download(LINK, dir.path()).await.unwrap_err();

    assert!(matches!(
        err,
        DownloadError::Fallback(ChunkTransferError::LengthMismatch { expected: 5000, actual: 100 })
    ));
    assert!(!dir.path().join("payload.bin").exists());
    assert_eq!(downloader.state(), JobState::Failed);
}

#[tokio::test]
async fn resolve_failure_fails_job_before_any_transfer() {
    let options = MockOptions {
        api_status: StatusCode::NOT_FOUND,
        ..Default::default()
    };
    let server = MockServer::start(random_payload(1000), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let err = downloader.download(LINK, dir.path()).await.unwrap_err();

    assert!(matches!(err, DownloadError::Resolve(_)));
    assert_eq!(downloader.state(), JobState::Failed);
    assert_eq!(server.head_requests(), 0);
    assert_eq!(server.range_requests() + server.full_requests(), 0);
    let mut entries = tokio::fs::read_dir(dir.path()).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none(), "目标目录应为空");
}

#[tokio::test]
async fn tiny_file_with_many_workers_still_merges() {
    let server = MockServer::start(random_payload(3), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(8);

    let result = downloader.download(LINK, dir.path()).await.unwrap();

    assert!(matches!(result, DownloadResult::Merged { bytes: 3, chunks: 8, .. }));
    let final_path = dir.path().join("payload.bin");
    assert_eq!(tokio::fs::read(&final_path).await.unwrap(), server.payload());
    assert_no_parts(&final_path, 8);
    // 只有最后一个分片非空
    assert_eq!(server.range_requests(), 1);
}

#[tokio::test]
async fn zero_workers_is_rejected() {
    let server = MockServer::start(random_payload(10), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(0);

    let err = downloader.download(LINK, dir.path()).await.unwrap_err();

    assert!(matches!(err, DownloadError::InvalidWorkerCount));
    assert_eq!(downloader.state(), JobState::Failed);
    assert_eq!(server.api_requests(), 0);
}

#[tokio::test]
async fn missing_destination_directory_is_created() {
    let server = MockServer::start(random_payload(2048), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let dest = dir.path().join("nested").join("deeper");
    let downloader = server.downloader(2);

    let result = downloader.download(LINK, &dest).await.unwrap();

    assert_eq!(result.path(), dest.join("payload.bin").as_path());
    assert_eq!(tokio::fs::read(result.path()).await.unwrap(), server.payload());
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn progress_observed_during_download_is_monotonic() {
    let server = MockServer::start(random_payload(600_000), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(6);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let seen_c = Arc::clone(&seen);
    let mut watcher = downloader.progress().watch();
    let observer = tokio::spawn(async move {
        while let Ok(p) = watcher.changed().await {
            seen_c.lock().unwrap().push(p.bytes_done);
        }
    });

    downloader.download(LINK, dir.path()).await.unwrap();
    observer.abort();

    let seen = seen.lock().unwrap();
    assert!(seen.windows(2).all(|w| w[0] <= w[1]), "进度出现回退: {:?}", *seen);
    assert!(seen.iter().all(|&b| b <= 600_000));
    assert_eq!(downloader.progress().bytes_done(), 600_000);
}

#[tokio::test]
async fn state_watch_ends_in_done() {
    let server = MockServer::start(random_payload(4096), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(2);
    let mut states = downloader.watch_state();

    downloader.download(LINK, dir.path()).await.unwrap();

    states.changed().await.unwrap();
    let last = *states.borrow_and_update();
    assert_eq!(last, JobState::Done);
    assert!(last.is_terminal());
}

/// 已解析目标直接下载：不经过 RESOLVING，不请求接口也不做 HEAD。
#[tokio::test]
async fn download_target_skips_resolution() {
    let server = MockServer::start(random_payload(90_001), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(3);

    let result = downloader
        .download_target(&server.target(true), dir.path())
        .await
        .unwrap();

    assert!(matches!(result, DownloadResult::Merged { bytes: 90_001, chunks: 3, .. }));
    assert_eq!(tokio::fs::read(result.path()).await.unwrap(), server.payload());
    assert_eq!(
        downloader.state_history(),
        vec![
            JobState::Init,
            JobState::Planning,
            JobState::Fetching,
            JobState::Merging,
            JobState::Done,
        ]
    );
    assert_eq!(server.api_requests(), 0);
    assert_eq!(server.head_requests(), 0);
    assert_eq!(server.range_requests(), 3);
}

#[tokio::test]
async fn download_target_without_ranges_goes_straight_to_fallback() {
    let server = MockServer::start(random_payload(5000), MockOptions::default()).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(4);

    let result = downloader
        .download_target(&server.target(false), dir.path())
        .await
        .unwrap();

    assert!(matches!(result, DownloadResult::Streamed { bytes: 5000, .. }));
    assert_eq!(
        downloader.state_history(),
        vec![JobState::Init, JobState::FallbackFetching, JobState::Done]
    );
    assert_eq!(server.api_requests(), 0);
    assert_eq!(server.range_requests(), 0);
}

/// 第二个任务开始时历史重新从 `Init` 记起。
#[tokio::test]
async fn state_history_resets_per_job() {
    let options = MockOptions {
        api_status: StatusCode::NOT_FOUND,
        ..Default::default()
    };
    let server = MockServer::start(random_payload(100), options).await;
    let dir = tempfile::tempdir().unwrap();
    let downloader = server.downloader(2);

    downloader.download(LINK, dir.path()).await.unwrap_err();
    assert_eq!(
        downloader.state_history(),
        vec![JobState::Init, JobState::Resolving, JobState::Failed]
    );

    downloader
        .download_target(&server.target(true), dir.path())
        .await
        .unwrap();
    assert_eq!(downloader.state_history().first(), Some(&JobState::Init));
    assert_eq!(downloader.state_history().last(), Some(&JobState::Done));
    assert!(!downloader.state_history().contains(&JobState::Failed));
}

#[test]
fn builder_setters_update_config() {
    let downloader = RangeDownloader::yandex(DownloaderConfig::default())
        .unwrap()
        .workers(3)
        .buffer_size(4096)
        .stall_timeout(Duration::from_secs(7));

    let config = downloader.config();
    assert_eq!(config.workers, 3);
    assert_eq!(config.buffer_size, 4096);
    assert_eq!(config.stall_timeout, Duration::from_secs(7));
    assert_eq!(config.connect_timeout, DownloaderConfig::default().connect_timeout);
    assert_eq!(downloader.state(), JobState::Init);
}
