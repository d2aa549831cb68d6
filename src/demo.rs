//! `ledgerlift demo` の実行
//!
//! Webのデモページと同じ `UploadController` を使い、
//! 選択 → 検証 → 送信（段階スピナー表示）→ 結果表示 を端末で行う。
//! Ctrl-Cで送信を中断した場合は teardown して終了する。

use indicatif::{ProgressBar, ProgressStyle};
use ledgerlift_common::payload::{
    ApRecResult, BankRecResult, ExpenseResult, InvoiceExtraction, TenKAnalysis,
};
use ledgerlift_common::upload::StageTimeline;
use ledgerlift_common::{
    ApiClient, DemoKind, DemoSpec, Notice, NoticeLevel, ResultPayload, UploadController,
};
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};
use tokio::task::JoinHandle;

use crate::client::{LocalFile, ReqwestClient};
use crate::error::{LedgerLiftError, Result};
use crate::render;

pub type CliApi = ApiClient<ReqwestClient>;

/// 出力オプション
#[derive(Debug, Clone, Default)]
pub struct DemoOptions {
    pub json: bool,
    pub export: Option<PathBuf>,
    pub report: Option<PathBuf>,
}

/// 引数のファイルを欄に割り当てる
///
/// `欄=パス` は指定の欄へ、素のパスは空いている欄へ順に入る（複数可の欄は残りすべてを受ける）。
pub fn assign_files(spec: &DemoSpec, args: &[String]) -> Result<Vec<(&'static str, Vec<PathBuf>)>> {
    let mut assigned: Vec<(&'static str, Vec<PathBuf>)> =
        spec.slots.iter().map(|slot| (slot.field, Vec::new())).collect();
    let mut bare = Vec::new();

    for arg in args {
        match arg.split_once('=') {
            Some((field, path)) if is_field_name(field) => {
                let Some(entry) = assigned.iter_mut().find(|(f, _)| *f == field) else {
                    let expected: Vec<&str> = spec.slots.iter().map(|s| s.field).collect();
                    return Err(LedgerLiftError::UnknownSlot {
                        field: field.to_string(),
                        expected: expected.join(", "),
                    });
                };
                entry.1.push(PathBuf::from(path));
            }
            _ => bare.push(PathBuf::from(arg)),
        }
    }

    let mut bare = bare.into_iter().peekable();
    for (slot, (_, paths)) in spec.slots.iter().zip(assigned.iter_mut()) {
        if bare.peek().is_none() {
            break;
        }
        if slot.multiple {
            paths.extend(bare.by_ref());
        } else if paths.is_empty() {
            paths.extend(bare.next());
        }
    }
    if let Some(extra) = bare.next() {
        return Err(LedgerLiftError::ExtraFile(extra.display().to_string()));
    }

    Ok(assigned.into_iter().filter(|(_, paths)| !paths.is_empty()).collect())
}

fn is_field_name(value: &str) -> bool {
    !value.is_empty() && value.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
}

fn print_notices(notices: Vec<Notice>) {
    for notice in notices {
        match notice.level {
            NoticeLevel::Success => println!("✔ {}", notice.message),
            NoticeLevel::Error => eprintln!("✘ {}", notice.message),
            NoticeLevel::Info => println!("- {}", notice.message),
        }
    }
}

/// 検証エラーは通知として表示済みなので、終了コード用のエラーだけ返す
fn rejected<R: ResultPayload>(
    controller: &mut UploadController<LocalFile, R>,
    error: ledgerlift_common::Error,
) -> LedgerLiftError {
    let notices = controller.take_notices();
    if notices.is_empty() {
        return error.into();
    }
    print_notices(notices);
    LedgerLiftError::DemoFailed
}

/// 経過時間に合わせて段階名を切り替えるスピナー
struct StageSpinner {
    bar: ProgressBar,
    ticker: JoinHandle<()>,
}

impl StageSpinner {
    fn start(timeline: StageTimeline) -> Self {
        let bar = ProgressBar::new_spinner();
        bar.enable_steady_tick(Duration::from_millis(100));
        bar.set_style(
            ProgressStyle::with_template("{spinner:.cyan} {msg} [{elapsed}]")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );

        let total = timeline.stages().len();
        let target = bar.clone();
        let started = Instant::now();
        let ticker = tokio::spawn(async move {
            let mut interval = tokio::time::interval(Duration::from_millis(200));
            loop {
                interval.tick().await;
                if let Some(position) = timeline.position(started.elapsed()) {
                    target.set_message(format!("[{}/{}] {}...", position.index + 1, total, position.label));
                }
            }
        });

        Self { bar, ticker }
    }

    fn finish(self) {
        self.ticker.abort();
        self.bar.finish_and_clear();
    }
}

async fn run<R: ResultPayload>(
    api: &CliApi,
    spec: &'static DemoSpec,
    assignments: Vec<(&'static str, Vec<PathBuf>)>,
    options: &DemoOptions,
) -> Result<()> {
    let mut controller = UploadController::<LocalFile, R>::new(spec);

    println!("[1/3] ファイルを検証中...");
    for (field, paths) in assignments {
        let files = paths
            .iter()
            .map(LocalFile::open)
            .collect::<Result<Vec<_>>>()?;
        if let Err(e) = controller.select(field, files.clone()) {
            return Err(rejected(&mut controller, e));
        }
        // 検証を通ったファイルだけ中身を読み込む
        let loaded = files.iter().map(LocalFile::load).collect::<Result<Vec<_>>>()?;
        if let Err(e) = controller.select(field, loaded) {
            return Err(rejected(&mut controller, e));
        }
    }
    let submission = match controller.begin_submit() {
        Ok(submission) => submission,
        Err(e) => return Err(rejected(&mut controller, e)),
    };
    println!("✔ {}件のファイル\n", submission.parts().len());

    println!("[2/3] {}を実行中...", spec.title);
    let spinner = StageSpinner::start(spec.timeline());
    let completion = tokio::select! {
        completion = submission.send(api) => completion,
        _ = tokio::signal::ctrl_c() => {
            spinner.finish();
            controller.teardown();
            return Err(LedgerLiftError::Interrupted);
        }
    };
    spinner.finish();

    let event = controller.complete(completion);
    print_notices(controller.take_notices());
    if let Some(event) = event {
        api.track(&event).await;
    }

    if controller.error().is_some() {
        return Err(LedgerLiftError::DemoFailed);
    }
    let Some(result) = controller.result() else {
        return Ok(());
    };

    println!("\n[3/3] 結果");
    if options.json {
        println!("{}", serde_json::to_string_pretty(result)?);
    } else {
        println!("{}", render::render_result(&result.summary_cards(), &result.tables()));
    }

    if let Some(path) = &options.export {
        export(api, spec, result, path).await?;
    }
    if let Some(path) = &options.report {
        write_report(spec, result, path)?;
    }
    Ok(())
}

async fn export<R: ResultPayload>(api: &CliApi, spec: &DemoSpec, result: &R, path: &Path) -> Result<()> {
    let endpoint = spec
        .export_endpoint
        .ok_or_else(|| LedgerLiftError::ExportUnavailable(spec.id.to_string()))?;
    let bytes = api.export(endpoint, result).await?;
    let path = resolve_output(path, spec.export_file_name);
    std::fs::write(&path, bytes)?;
    println!("✔ エクスポートを保存: {}", path.display());
    Ok(())
}

fn write_report<R: ResultPayload>(spec: &DemoSpec, result: &R, path: &Path) -> Result<()> {
    let buffer = ledgerlift_common::report::generate_report_buffer(spec.title, result)
        .map_err(LedgerLiftError::Report)?;
    let path = resolve_output(path, &format!("{}-report.xlsx", spec.id));
    std::fs::write(&path, buffer)?;
    println!("✔ レポートを保存: {}", path.display());
    Ok(())
}

/// 出力先がディレクトリなら既定のファイル名を付ける
pub fn resolve_output(path: &Path, default_name: &str) -> PathBuf {
    if path.is_dir() {
        path.join(default_name)
    } else {
        path.to_path_buf()
    }
}

pub async fn run_demo(api: &CliApi, kind: DemoKind, files: &[String], options: &DemoOptions) -> Result<()> {
    let spec = kind.spec();
    let assignments = assign_files(spec, files)?;
    tracing::debug!(demo = spec.id, slots = assignments.len(), "starting demo");

    match kind {
        DemoKind::Invoice => run::<InvoiceExtraction>(api, spec, assignments, options).await,
        DemoKind::TenK => run::<TenKAnalysis>(api, spec, assignments, options).await,
        DemoKind::BankRec => run::<BankRecResult>(api, spec, assignments, options).await,
        DemoKind::ApRec | DemoKind::ArRec => run::<ApRecResult>(api, spec, assignments, options).await,
        DemoKind::Expenses => run::<ExpenseResult>(api, spec, assignments, options).await,
    }
}

/// `ledgerlift demos` の出力
pub fn describe_demos() -> String {
    let mut out = String::new();
    for spec in DemoSpec::all() {
        out.push_str(&format!("{:<10} {}\n", spec.id, spec.title));
        for slot in spec.slots {
            let multiple = if slot.multiple { "、複数可" } else { "" };
            out.push_str(&format!(
                "           {}={} ({}、最大{}{})\n",
                slot.field,
                slot.label,
                slot.accept.description,
                slot.max_size_label(),
                multiple
            ));
        }
    }
    out
}
