use std::path::{Path, PathBuf};

use anyhow::Context;
use chrono::{Local, NaiveDate};
use clap::{Parser, ValueEnum};
use fitsync_core::{CancelFlag, Catalog, DataProvider, ResolutionPlan, Session};
use fitsync_garmin::{
    garmin_catalog, render_report, todays_activities, ActivitySummary, GarminConfig,
    JsonDirProvider, ReportInput,
};
use serde::de::DeserializeOwned;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(
    name = "fitsync",
    about = "Tạo báo cáo chỉ số sức khỏe hằng ngày từ bản ghi Garmin đã xuất."
)]
struct Args {
    /// Thư mục bản ghi: `<nguồn>/<YYYY-MM-DD>.json` và `<nguồn>.json`.
    #[arg(short, long)]
    data_dir: PathBuf,

    /// Ngày tham chiếu (YYYY-MM-DD), mặc định là hôm nay.
    #[arg(long)]
    today: Option<NaiveDate>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Ghi kết quả ra file thay vì stdout.
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// File JSON cấu hình cửa sổ tìm lùi.
    #[arg(long)]
    config: Option<PathBuf>,

    /// File JSON catalog thay cho catalog mặc định.
    #[arg(long)]
    catalog: Option<PathBuf>,

    /// Phân giải song song các trường độc lập.
    #[arg(long)]
    parallel: bool,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> anyhow::Result<()> {
    init_tracing();
    let args = Args::parse();

    let today = args.today.unwrap_or_else(|| Local::now().date_naive());
    let config = match &args.config {
        Some(path) => read_json::<GarminConfig>(path)?,
        None => GarminConfig::default(),
    };
    let catalog = match &args.catalog {
        Some(path) => read_json::<Catalog>(path)?,
        None => garmin_catalog(&config),
    };
    let plan = ResolutionPlan::new(catalog).context("Catalog không hợp lệ")?;

    let provider = JsonDirProvider::new(&args.data_dir);
    info!(data_dir = %args.data_dir.display(), %today, "resolving daily metrics");

    let session = Session::new(&plan, &provider, today);
    let cancel = session.cancel_handle();
    let record = if args.parallel {
        session.run_parallel()
    } else {
        session.run()
    };

    let rendered = match args.format {
        OutputFormat::Json => {
            let mut text =
                serde_json::to_string_pretty(&record).context("Không serialize record")?;
            text.push('\n');
            text
        }
        OutputFormat::Text => {
            let activities = session_activities(&provider, today, &cancel);
            render_report(&ReportInput {
                today,
                catalog: plan.catalog(),
                record: &record,
                activities: &activities,
            })
        }
    };

    match &args.output {
        Some(path) => {
            std::fs::write(path, &rendered)
                .with_context(|| format!("Không ghi được file {:?}", path))?;
            info!(path = %path.display(), "report written");
        }
        None => print!("{rendered}"),
    }

    Ok(())
}

/// Phiên đã bị hủy thì không gọi thêm nguồn hoạt động.
fn session_activities(
    provider: &dyn DataProvider,
    today: NaiveDate,
    cancel: &CancelFlag,
) -> Vec<ActivitySummary> {
    if cancel.is_cancelled() {
        return Vec::new();
    }
    todays_activities(provider, today)
}

fn read_json<T: DeserializeOwned>(path: &Path) -> anyhow::Result<T> {
    let data = std::fs::read_to_string(path)
        .with_context(|| format!("Không đọc được file {:?}", path))?;
    serde_json::from_str(&data).with_context(|| format!("File {:?} không phải JSON hợp lệ", path))
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use fitsync_core::{MemoryProvider, ProviderError};
    use fitsync_garmin::sources;
    use serde_json::json;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
    }

    fn provider() -> MemoryProvider {
        MemoryProvider::new().with_record(
            sources::ACTIVITIES,
            day(),
            json!([{"activityName": "Morning Run", "duration": 3125}]),
        )
    }

    #[test]
    fn activities_follow_a_healthy_session() {
        let plan = ResolutionPlan::new(garmin_catalog(&GarminConfig::default())).unwrap();
        let provider = provider();
        let session = Session::new(&plan, &provider, day());
        let cancel = session.cancel_handle();
        session.run();

        let activities = session_activities(&provider, day(), &cancel);
        assert_eq!(activities.len(), 1);
        assert_eq!(activities[0].name, "Morning Run");
    }

    #[test]
    fn cancelled_session_skips_activities() {
        let plan = ResolutionPlan::new(garmin_catalog(&GarminConfig::default())).unwrap();
        let provider =
            provider().with_failure(sources::BODY_COMPOSITION, day(), ProviderError::Unauthorized);
        let session = Session::new(&plan, &provider, day());
        let cancel = session.cancel_handle();
        let record = session.run();

        assert_eq!(record.resolved_count(), 0);
        assert!(session_activities(&provider, day(), &cancel).is_empty());
        assert_eq!(provider.calls_to(sources::ACTIVITIES), 0);
    }
}
