//! yadisk-dl：按分片并发下载 Yandex Disk 公开文件。

use std::path::PathBuf;
use std::process::ExitCode;
use std::time::Duration;

use clap::Parser;
use indicatif::{ProgressBar, ProgressStyle};
use tracing_subscriber::EnvFilter;

use yadisk_dl::http::build_http_client;
use yadisk_dl::resolver::{DirectUrlResolver, YandexDiskResolver, DEFAULT_API_BASE};
use yadisk_dl::states::job_progress::{DownloadProgress, JobProgress};
use yadisk_dl::{DownloadError, DownloadResult, DownloaderConfig, RangeDownloader};

const PB_STYLE: &str = "{spinner:.blue} [{elapsed_precise}] {wide_bar:.cyan/blue} {bytes}/{total_bytes} ({bytes_per_sec}, {eta})";

const PB_CHARS: &str = "█▓▒░  ";

#[derive(Debug, Parser)]
#[command(
    name = "yadisk-dl",
    version = env!("CARGO_PKG_VERSION"),
    about = "Yandex Disk 多连接并发下载"
)]
struct Cli {
    /// Yandex Disk 公开链接（配合 --direct 时为直链）
    #[arg(short = 'l', long)]
    link: String,

    /// 本地保存目录，不存在时自动创建
    #[arg(short = 'd', long = "download-location", alias = "download_location")]
    download_location: PathBuf,

    /// 并发连接数，也是分片数
    #[arg(short = 't', long, default_value_t = 8, value_parser = clap::value_parser!(u16).range(1..))]
    threads: u16,

    /// 链接本身就是可下载地址，跳过 Yandex 接口
    #[arg(long)]
    direct: bool,

    /// 无数据超时（秒），至少 1 秒
    #[arg(long, default_value_t = 30, value_parser = clap::value_parser!(u64).range(1..))]
    timeout: u64,

    /// Yandex 公共接口根地址
    #[arg(long, default_value = DEFAULT_API_BASE)]
    api_base: String,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(result) => {
            println!(
                "下载完成: {}（{:.2} MB）",
                result.path().display(),
                result.bytes() as f64 / 1024.0 / 1024.0
            );
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("下载失败: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<DownloadResult, DownloadError> {
    let config = DownloaderConfig {
        workers: usize::from(cli.threads),
        stall_timeout: Duration::from_secs(cli.timeout),
        ..Default::default()
    };
    let client = build_http_client(&config)?;

    let downloader = if cli.direct {
        RangeDownloader::new(client.clone(), DirectUrlResolver::new(client))
    } else {
        let resolver = YandexDiskResolver::new(client.clone()).with_api_base(cli.api_base);
        RangeDownloader::new(client, resolver)
    }
    .with_config(config);

    let pb = progress_bar();
    let tracker = tokio::spawn(track_progress(downloader.progress(), pb.clone()));

    let result = downloader.download(&cli.link, &cli.download_location).await;

    tracker.abort();
    finish_bar(&pb, &downloader.progress(), result.is_ok());
    result
}

/// 收尾进度条：监听任务可能还没处理最后一次更新，按精确计数补齐。
fn finish_bar(pb: &ProgressBar, progress: &JobProgress, success: bool) {
    pb.set_position(progress.bytes_done());
    if success {
        pb.finish();
    } else {
        pb.abandon();
    }
}

fn progress_bar() -> ProgressBar {
    let pb = ProgressBar::no_length();
    if let Ok(style) = ProgressStyle::with_template(PB_STYLE) {
        pb.set_style(style.progress_chars(PB_CHARS));
    }
    pb
}

/// 把任务进度同步到进度条，直到进度对象销毁或任务被中止。
async fn track_progress(progress: JobProgress, pb: ProgressBar) {
    let mut watcher = progress.watch();
    apply_progress(&pb, watcher.borrow());
    while let Ok(p) = watcher.changed().await {
        apply_progress(&pb, p);
    }
}

fn apply_progress(pb: &ProgressBar, p: DownloadProgress) {
    if let Some(total) = p.total {
        pb.set_length(total);
    }
    pb.set_position(p.bytes_done);
}
