// Small dev utility: dump the top-left grid of each configured report template.
//
// Usage:
//   cargo run --bin template_probe -- [templates_dir] [rows] [cols]
//
// 用于排查模板改版后表头/名目行漂移的问题，不启动任何服务。

use locations_report::config::TemplateConfig;
use locations_report::domain::types::ReportKind;
use locations_report::sheet::{SheetGrid, XlsxSheet};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut args = std::env::args().skip(1);
    let config = match args.next().map(|s| s.trim().to_string()).filter(|s| !s.is_empty()) {
        Some(dir) => TemplateConfig::new(dir),
        None => TemplateConfig::resolve(),
    };
    let max_rows: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(80);
    let max_cols: u32 = args.next().and_then(|s| s.parse().ok()).unwrap_or(40);

    for kind in [ReportKind::Detail, ReportKind::Summary, ReportKind::Spares] {
        println!("{}", "=".repeat(90));
        println!("TEMPLATE: {}", kind.template_file());

        let path = match config.require_template(kind) {
            Ok(path) => path,
            Err(e) => {
                println!("NOT FOUND: {}", e);
                continue;
            }
        };

        let mut book = match locations_report::sheet::xlsx::open_workbook(&path) {
            Ok(book) => book,
            Err(e) => {
                println!("OPEN ERROR: {}", e);
                continue;
            }
        };
        let ws = book.get_active_sheet_mut();
        println!("Sheet: {}", ws.get_name());
        let sheet = XlsxSheet::new(ws);

        let rows = max_rows.min(sheet.max_row());
        let cols = max_cols.min(sheet.max_col());
        println!("-- TOP GRID (first {} rows x {} cols) --", rows, cols);

        // 列号行便于对照定位
        let header: Vec<String> = (1..=cols).map(|c| format!("C{}", c)).collect();
        println!("    | {}", header.join(" | "));
        for row in 1..=rows {
            let values: Vec<String> = (1..=cols)
                .map(|col| sheet.cell_text(row, col).trim().to_string())
                .collect();
            println!("R{:02} | {}", row, values.join(" | "));
        }
    }

    Ok(())
}
