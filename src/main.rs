// ==========================================
// 站点维护报表系统 - 命令行入口
// ==========================================
// 用法:
//   locations-report <records.json> <YYYY-MM> [输出目录]
//
// 读入记录载荷 JSON，导出当月三类报表到输出目录
// （缺省为当前目录）
// ==========================================

use std::fs;
use std::path::PathBuf;

use locations_report::app::AppState;
use locations_report::domain::record::ImportPayload;
use locations_report::domain::types::ReportKind;
use locations_report::{logging, VERSION};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    logging::init();

    tracing::info!("==================================================");
    tracing::info!("站点维护报表系统");
    tracing::info!("系统版本: {}", VERSION);
    tracing::info!("==================================================");

    let mut args = std::env::args().skip(1);
    let (payload_path, month) = match (args.next(), args.next()) {
        (Some(p), Some(m)) => (p, m),
        _ => {
            eprintln!("用法: locations-report <records.json> <YYYY-MM> [输出目录]");
            std::process::exit(2);
        }
    };
    let out_dir = args.next().map(PathBuf::from).unwrap_or_else(|| PathBuf::from("."));

    // 导入记录载荷
    let raw = fs::read_to_string(&payload_path)?;
    let payload: ImportPayload = serde_json::from_str(&raw)?;

    let state = AppState::with_default_config();
    let summary = state.import_api.replace(payload)?;
    tracing::info!("{}", summary.message);

    // 三类报表依次导出
    fs::create_dir_all(&out_dir)?;
    for kind in [ReportKind::Detail, ReportKind::Summary, ReportKind::Spares] {
        let exported = state.export_api.export(kind, &month)?;
        let target = out_dir.join(&exported.filename);
        fs::write(&target, &exported.bytes)?;
        tracing::info!(
            "{}",
            locations_report::i18n::t_with_args("export.done", &[("file", &target.display().to_string())])
        );
    }

    Ok(())
}
