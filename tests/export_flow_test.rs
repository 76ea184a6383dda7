// ==========================================
// 站点维护报表系统 - 端到端导出集成测试
// ==========================================
// 流程: JSON 载荷导入 → 三类报表导出 →
//       重新打开产物工作簿断言单元格
// ==========================================


use locations_report::app::AppState;
use locations_report::config::TemplateConfig;
use locations_report::domain::record::ImportPayload;
use locations_report::domain::types::ReportKind;
use locations_report::{logging, ApiError, ExportError};
use serde_json::json;

// ==========================================
// 辅助函数
// ==========================================

fn setup_state(dir: &std::path::Path) -> AppState {
    logging::init_test();
    test_helpers::write_all_templates(dir);
    AppState::new(TemplateConfig::new(dir))
}

/// 把导出的字节流落盘后重新读入
fn reopen(dir: &std::path::Path, filename: &str, bytes: &[u8]) -> umya_spreadsheet::Spreadsheet {
    let path = dir.join(filename);
    std::fs::write(&path, bytes).expect("写出导出产物失败");
    umya_spreadsheet::reader::xlsx::read(&path).expect("重新读取导出产物失败")
}

fn sample_payload() -> ImportPayload {
    let value = json!({
        "works": [
            {
                "date": "2024-05-01",
                "weekday": "الأربعاء",
                "region": "صنعاء",
                "site": "X",
                "siteOwner": "سبأفون",
                "jobType": "صيانة طارئة",
                "summary": "فحص المولد",
                "oilLiters": 4,
                "oilFilter": true,
                "hoursNow": 120,
                "hoursDiff": 12,
                "spares": [{"name": "قطعة AVR", "qty": 2}],
                "emergency": {"alarm": "A1", "source": "المركز", "category": "كهرباء"},
                "executor": "فريق 1",
                "savedAt": "2024-05-01T09:00:00.000Z"
            },
            {
                "date": "2024-05-02",
                "region": "عمران",
                "site": "شملان-1",
                "jobType": "صيانة دورية",
                "oilLiters": "3.5",
                "hoursDiff": 5,
                "spares": [{"name": "قطعة غير مدرجة", "qty": 1}],
                "savedAt": "2024-05-02T09:00:00.000Z"
            },
            {
                "date": "2024-06-15",
                "region": "صنعاء",
                "site": "خارج الشهر",
                "jobType": "مواد",
                "savedAt": "2024-06-15T09:00:00.000Z"
            }
        ],
        "emergencies": [
            {
                "date": "2024-05-01",
                "region": "صنعاء",
                "site": "X",
                "alarm": "A1-محدث",
                "source": "بلاغ هاتفي",
                "category": "انقطاع",
                "etype": "طارئ",
                "savedAt": "2024-05-01T12:00:00.000Z"
            },
            {
                "date": "2024-05-03",
                "region": "مأرب",
                "site": "دارس-1",
                "alarm": "B2",
                "etype": "إنذار",
                "notes": "ملخص البلاغ",
                "remarks": "تمت المعالجة",
                "savedAt": "2024-05-03T12:00:00.000Z"
            }
        ],
        "grid": [
            {"date": "2024-05-10", "region": "صنعاء", "site": "X", "etype": "عمومي", "kwhPrev": 100, "kwhNow": 150}
        ]
    });
    serde_json::from_value(value).expect("载荷反序列化失败")
}

// ==========================================
// 明细表
// ==========================================

#[test]
fn test_detail_export_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let state = setup_state(dir.path());

    let summary = state.import_api.replace(sample_payload()).unwrap();
    assert_eq!(summary.counts.works, 3);
    assert_eq!(summary.counts.emergencies, 2);
    assert_eq!(summary.counts.grid, 1);

    let exported = state.export_api.export(ReportKind::Detail, "2024-05").unwrap();
    assert_eq!(exported.filename, "detail-2024-05.xlsx");

    let book = reopen(dir.path(), &exported.filename, &exported.bytes);
    let ws = book.get_sheet(&0).unwrap();

    // 合并标题带未被写入，数据从第 4 行开始
    assert_eq!(ws.get_value((1u32, 1u32)), "كشف الصيانة الدورية");
    assert_eq!(ws.get_value((3u32, 4u32)), "2024-05-01");
    assert_eq!(ws.get_value((5u32, 4u32)), "X");
    assert_eq!(ws.get_value((7u32, 4u32)), "صيانة طارئة");
    assert_eq!(ws.get_value((19u32, 4u32)), "قطعة AVR");
    assert_eq!(ws.get_value((20u32, 4u32)), "2");

    // 独立抢修与工单同键 → 并入第 4 行（覆盖内嵌告警），不追加新行
    assert_eq!(ws.get_value((23u32, 4u32)), "A1-محدث");
    assert_eq!(ws.get_value((26u32, 4u32)), "طارئ");

    // 第二条工单为第 5 行；6 月记录不出现
    assert_eq!(ws.get_value((5u32, 5u32)), "شملان-1");
    assert_eq!(ws.get_value((1u32, 5u32)), "2");

    // 无匹配键的独立抢修追加为第 6 行
    assert_eq!(ws.get_value((5u32, 6u32)), "دارس-1");
    assert_eq!(ws.get_value((23u32, 6u32)), "B2");
    assert_eq!(ws.get_value((8u32, 6u32)), "ملخص البلاغ");
    assert_eq!(ws.get_value((27u32, 6u32)), "تمت المعالجة");
    assert_eq!(ws.get_value((1u32, 6u32)), "3");

    // 不存在第 7 行数据
    assert_eq!(ws.get_value((5u32, 7u32)), "");
}

// ==========================================
// 汇总表
// ==========================================

#[test]
fn test_summary_export_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let state = setup_state(dir.path());
    state.import_api.replace(sample_payload()).unwrap();

    let exported = state.export_api.export(ReportKind::Summary, "2024-05").unwrap();
    let book = reopen(dir.path(), &exported.filename, &exported.bytes);
    let ws = book.get_sheet(&0).unwrap();

    // 表头第 2 行，数据自第 3 行按词表顺序
    // صيانة دورية（第 2 项 → 第 4 行）: عمران 1
    assert_eq!(ws.get_value((2u32, 4u32)), "صيانة دورية");
    assert_eq!(ws.get_value((5u32, 4u32)), "1");
    assert_eq!(ws.get_value((7u32, 4u32)), "1");

    // صيانة طارئة（第 3 项 → 第 5 行）:
    // 工单 1 (صنعاء) + 独立抢修 2 (صنعاء، مأرب) = 3
    assert_eq!(ws.get_value((4u32, 5u32)), "2"); // صنعاء
    assert_eq!(ws.get_value((6u32, 5u32)), "1"); // مأرب
    assert_eq!(ws.get_value((7u32, 5u32)), "3");
}

// ==========================================
// 备件清册
// ==========================================

#[test]
fn test_spares_export_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    let state = setup_state(dir.path());
    state.import_api.replace(sample_payload()).unwrap();

    let exported = state.export_api.export(ReportKind::Spares, "2024-05").unwrap();
    let book = reopen(dir.path(), &exported.filename, &exported.bytes);
    let ws = book.get_sheet(&0).unwrap();

    // KPI: ساعات 12 (صنعاء) + 5 (عمران) = 17
    assert_eq!(ws.get_value((7u32, 5u32)), "17");
    assert_eq!(ws.get_value((4u32, 5u32)), "12");
    assert_eq!(ws.get_value((5u32, 5u32)), "5");
    // KPI: الزيت 4 + 3.5 = 7.5؛ فلاتر الزيت 1
    assert_eq!(ws.get_value((7u32, 6u32)), "7.5");
    assert_eq!(ws.get_value((7u32, 7u32)), "1");

    // 名目行: AVR（自由文本 "قطعة AVR" 归一命中）
    assert_eq!(ws.get_value((7u32, 10u32)), "2");
    assert_eq!(ws.get_value((4u32, 10u32)), "2");
    // 未命中的名称落入杂项行
    assert_eq!(ws.get_value((7u32, 12u32)), "1");
    assert_eq!(ws.get_value((5u32, 12u32)), "1");
    // كونتاكتور 无记录 → 行保持空
    assert_eq!(ws.get_value((7u32, 11u32)), "");
}

// ==========================================
// 失败路径与清空
// ==========================================

#[test]
fn test_missing_template_and_invalid_month() {
    let dir = tempfile::tempdir().unwrap();
    logging::init_test();
    // 只生成明细模板
    test_helpers::write_detail_template(&dir.path().join("detail.xlsx"));
    let state = AppState::new(TemplateConfig::new(dir.path()));

    let err = state.export_api.export(ReportKind::Summary, "2024-05").unwrap_err();
    assert!(matches!(
        err,
        ApiError::Export(ExportError::TemplateMissing { .. })
    ));

    let err = state.export_api.export(ReportKind::Detail, "may-2024").unwrap_err();
    assert!(matches!(err, ApiError::InvalidMonth(_)));
}

#[test]
fn test_clear_then_export_writes_no_rows() {
    let dir = tempfile::tempdir().unwrap();
    let state = setup_state(dir.path());
    state.import_api.replace(sample_payload()).unwrap();
    state.import_api.clear().unwrap();

    let exported = state.export_api.export(ReportKind::Detail, "2024-05").unwrap();
    let book = reopen(dir.path(), &exported.filename, &exported.bytes);
    let ws = book.get_sheet(&0).unwrap();
    assert_eq!(ws.get_value((3u32, 4u32)), "");
    assert_eq!(ws.get_value((5u32, 4u32)), "");
}
