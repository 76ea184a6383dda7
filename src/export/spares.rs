// ==========================================
// 站点维护报表系统 - 备件消耗清册引擎
// ==========================================
// 职责: 分区域 KPI 汇总 + 自由文本备件名归一后的
//       数量汇总 → 清册模板按名目行写入
// 口径: 备件名按归一化双向包含匹配到封闭名目，
//       未命中归入杂项；模板中不存在的名目行
//       静默跳过（模板不必枚举所有备件）
// ==========================================

use tracing::debug;

use crate::domain::record::WorkRecord;
use crate::domain::types::{Region, ReportKind, SpareLabel};
use crate::export::error::{ExportError, ExportResult};
use crate::sheet::grid::{CellValue, SheetGrid};
use crate::sheet::locate::{find_column, find_label_row, LABEL_SCAN_ROWS};
use crate::sheet::normalize::normalize;

/// 说明列的标签变体
const STATEMENT_VARIANTS: &[&str] = &["البيان", "البند", "الوصف"];

/// 说明列扫描窗口（行）
const STATEMENT_SCAN_ROWS: u32 = 220;

/// 说明列缺省表头行
const DEFAULT_HEADER_ROW: u32 = 5;

// KPI 行的标签变体（模板各版本措辞不一）
const KPI_HOURS: &[&str] = &[
    "مجموع ساعات عمل المولدات",
    "ساعات عمل المولدات",
    "ساعاتالمولد",
];
const KPI_OIL: &[&str] = &[
    "كميات الزيوت المستهلكة",
    "الزيت المستهلك",
    "الزيوت المستهلكة",
];
const KPI_OIL_FILTERS: &[&str] = &[
    "عدد فلاتر الزيت",
    "فلاتر الزيت",
    "اجمالي فلاتر الزيت",
    "إجمالي فلاتر الزيت",
];
const KPI_DIESEL_FILTERS: &[&str] = &[
    "عدد فلاتر الديزل",
    "فلاتر الديزل",
    "اجمالي فلاتر الديزل",
    "إجمالي فلاتر الديزل",
];
const KPI_AIR_FILTERS: &[&str] = &[
    "عدد فلاتر الهواء",
    "فلاتر الهواء",
    "اجمالي فلاتر الهواء",
    "إجمالي فلاتر الهواء",
];

// ==========================================
// SparesRollup - 分区域汇总
// ==========================================
#[derive(Debug, Clone)]
pub struct SparesRollup {
    pub hours: [f64; Region::ALL.len()],
    pub oil: [f64; Region::ALL.len()],
    pub oil_filters: [f64; Region::ALL.len()],
    pub diesel_filters: [f64; Region::ALL.len()],
    pub air_filters: [f64; Region::ALL.len()],
    parts: [[f64; Region::ALL.len()]; SpareLabel::ALL.len()],
    parts_seen: [bool; SpareLabel::ALL.len()],
}

impl SparesRollup {
    fn new() -> Self {
        Self {
            hours: [0.0; Region::ALL.len()],
            oil: [0.0; Region::ALL.len()],
            oil_filters: [0.0; Region::ALL.len()],
            diesel_filters: [0.0; Region::ALL.len()],
            air_filters: [0.0; Region::ALL.len()],
            parts: [[0.0; Region::ALL.len()]; SpareLabel::ALL.len()],
            parts_seen: [false; SpareLabel::ALL.len()],
        }
    }

    /// 汇总一个月的工单
    pub fn aggregate(works: &[WorkRecord]) -> Self {
        let mut rollup = Self::new();
        for work in works {
            let region = Region::from_label(&work.region).index();
            rollup.hours[region] += work.hours_diff.unwrap_or(0.0);
            rollup.oil[region] += work.oil_liters.unwrap_or(0.0);
            if work.oil_filter {
                rollup.oil_filters[region] += 1.0;
            }
            if work.diesel_filter {
                rollup.diesel_filters[region] += 1.0;
            }
            if work.air_filter {
                rollup.air_filters[region] += 1.0;
            }
            for spare in &work.spares {
                let name = spare.name.trim();
                if name.is_empty() {
                    continue;
                }
                let label = match_label(name);
                rollup.parts[label.index()][region] += spare.qty.unwrap_or(0.0);
                rollup.parts_seen[label.index()] = true;
            }
        }
        rollup
    }

    /// 某名目的分区域数量（记录中未出现时为 None）
    pub fn part(&self, label: SpareLabel) -> Option<&[f64; Region::ALL.len()]> {
        if self.parts_seen[label.index()] {
            Some(&self.parts[label.index()])
        } else {
            None
        }
    }
}

/// 自由文本备件名 → 封闭名目
///
/// 归一化后双向包含（自由文本含名目，或名目含自由文本），
/// 按词表顺序取首个命中；未命中与空文本归入杂项
pub fn match_label(name: &str) -> SpareLabel {
    let normalized = normalize(name);
    if normalized.is_empty() {
        return SpareLabel::Other;
    }
    for label in SpareLabel::ALL {
        let known = normalize(label.label());
        if normalized.contains(&known) || known.contains(&normalized) {
            return label;
        }
    }
    SpareLabel::Other
}

/// 导出统计（日志用）
#[derive(Debug, Clone, Default)]
pub struct SparesStats {
    pub header_row: u32,
    pub kpi_rows: usize,
    pub part_rows: usize,
    pub skipped_rows: usize,
}

// ==========================================
// SparesExporter - 清册引擎
// ==========================================
pub struct SparesExporter;

impl SparesExporter {
    /// 向清册模板写入一个月的 KPI 与备件汇总
    pub fn export<S: SheetGrid + ?Sized>(
        sheet: &mut S,
        works: &[WorkRecord],
    ) -> ExportResult<SparesStats> {
        let template = ReportKind::Spares.template_file();
        let rollup = SparesRollup::aggregate(works);

        // 1) 说明列（البيان）为结构锚点
        let statement_col = find_column(sheet, STATEMENT_VARIANTS, STATEMENT_SCAN_ROWS)
            .ok_or_else(|| ExportError::StatementColumnMissing {
                template: template.to_string(),
            })?;

        // 2) 表头行 = 说明列里标签所在行（精确匹配，缺省第 5 行）
        let normalized_variants: Vec<String> =
            STATEMENT_VARIANTS.iter().map(|v| normalize(v)).collect();
        let mut header_row = DEFAULT_HEADER_ROW;
        let top_row = STATEMENT_SCAN_ROWS.min(sheet.max_row());
        for row in 1..=top_row {
            let value = normalize(&sheet.cell_text(row, statement_col));
            if normalized_variants.iter().any(|v| *v == value) {
                header_row = row;
                break;
            }
        }

        // 3) 合计列与区域列（精确匹配，序号列 م 跳过）
        let skip = normalize("م");
        let total_label = normalize("الكل");
        let unit_label = normalize("الوحدة");
        let mut total_col: Option<u32> = None;
        let mut unit_col: Option<u32> = None;
        let mut region_cols: Vec<(Region, u32)> = Vec::new();
        for col in 1..=sheet.max_col() {
            let value = normalize(&sheet.cell_text(header_row, col));
            if value == skip {
                continue;
            }
            if value == total_label {
                total_col = Some(col);
            }
            if value == unit_label {
                unit_col = Some(col);
            }
            for region in Region::ALL {
                if value == normalize(region.label()) {
                    // 标签重复出现时后者生效
                    match region_cols.iter_mut().find(|(r, _)| *r == region) {
                        Some(entry) => entry.1 = col,
                        None => region_cols.push((region, col)),
                    }
                }
            }
        }
        if region_cols.is_empty() {
            return Err(ExportError::RegionColumnsMissing {
                template: template.to_string(),
            });
        }
        // 无 الكل 时合计落在 الوحدة 左侧一列
        let total_col = match (total_col, unit_col) {
            (Some(col), _) => col,
            (None, Some(col)) => col.saturating_sub(1).max(1),
            (None, None) => {
                return Err(ExportError::TotalColumnMissing {
                    template: template.to_string(),
                })
            }
        };

        let mut stats = SparesStats {
            header_row,
            ..SparesStats::default()
        };

        // 4) KPI 行
        let kpis: [(&[&str], &[f64; Region::ALL.len()]); 5] = [
            (KPI_HOURS, &rollup.hours),
            (KPI_OIL, &rollup.oil),
            (KPI_OIL_FILTERS, &rollup.oil_filters),
            (KPI_DIESEL_FILTERS, &rollup.diesel_filters),
            (KPI_AIR_FILTERS, &rollup.air_filters),
        ];
        for (variants, values) in kpis {
            if Self::write_label_row(sheet, variants, values, total_col, &region_cols) {
                stats.kpi_rows += 1;
            } else {
                stats.skipped_rows += 1;
            }
        }

        // 5) 备件名目行（词表顺序，保证输出确定性）
        for label in SpareLabel::ALL {
            let Some(values) = rollup.part(label) else {
                continue;
            };
            if Self::write_label_row(sheet, &[label.label()], values, total_col, &region_cols) {
                stats.part_rows += 1;
            } else {
                stats.skipped_rows += 1;
            }
        }

        debug!(
            header_row = stats.header_row,
            kpi_rows = stats.kpi_rows,
            part_rows = stats.part_rows,
            skipped = stats.skipped_rows,
            "备件清册填充完成"
        );
        Ok(stats)
    }

    /// 定位名目行并写入合计+分区域值；模板无此行时跳过
    fn write_label_row<S: SheetGrid + ?Sized>(
        sheet: &mut S,
        variants: &[&str],
        values: &[f64; Region::ALL.len()],
        total_col: u32,
        region_cols: &[(Region, u32)],
    ) -> bool {
        let Some(row) = find_label_row(sheet, variants, LABEL_SCAN_ROWS) else {
            return false;
        };
        let total: f64 = values.iter().sum();
        sheet.write_safe(row, total_col, &CellValue::Number(total));
        for (region, col) in region_cols {
            sheet.write_safe(row, *col, &CellValue::Number(values[region.index()]));
        }
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::SpareUsage;
    use crate::sheet::grid::MemorySheet;

    // 清册测试模板：第 3 行表头 م | البيان | الأمانة | صنعاء | عمران | مأرب | الكل | الوحدة
    fn spares_template() -> MemorySheet {
        let mut sheet = MemorySheet::new(40, 9);
        sheet.set_text(3, 1, "م");
        sheet.set_text(3, 2, "البيان");
        for (i, region) in Region::ALL.iter().enumerate() {
            sheet.set_text(3, (3 + i) as u32, region.label());
        }
        sheet.set_text(3, 7, "الكل");
        sheet.set_text(3, 8, "الوحدة");
        // KPI 行
        sheet.set_text(5, 2, "مجموع ساعات عمل المولدات");
        sheet.set_text(6, 2, "كميات الزيوت المستهلكة");
        sheet.set_text(7, 2, "عدد فلاتر الزيت");
        // 名目行（含模板未枚举的名目）
        sheet.set_text(10, 2, "AVR");
        sheet.set_text(11, 2, "كونتاكتور");
        sheet.set_text(12, 2, "قطع غيار اخرى متنوعة");
        sheet
    }

    fn work(region: &str) -> WorkRecord {
        let mut w = WorkRecord::default();
        w.date = "2024-05-01".into();
        w.region = region.into();
        w
    }

    #[test]
    fn test_match_label_bidirectional_containment() {
        // 自由文本含名目
        assert_eq!(match_label("قطعة AVR جديدة"), SpareLabel::Avr);
        // 名目含自由文本
        assert_eq!(match_label("سلف"), SpareLabel::StarterMotor);
        // 空白修饰不影响匹配
        assert_eq!(match_label(" كونتاكتور "), SpareLabel::Contactor);
        // 完全无关 → 杂项
        assert_eq!(match_label("قطعة مجهولة"), SpareLabel::Other);
        assert_eq!(match_label(""), SpareLabel::Other);
    }

    #[test]
    fn test_rollup_sums_by_region_and_label() {
        let mut w1 = work("صنعاء");
        w1.hours_diff = Some(5.0);
        w1.oil_liters = Some(8.0);
        w1.oil_filter = true;
        w1.spares = vec![
            SpareUsage {
                name: "AVR".into(),
                qty: Some(1.0),
            },
            SpareUsage {
                name: "قطعة AVR احتياطية".into(),
                qty: Some(2.0),
            },
        ];
        let mut w2 = work("مأرب");
        w2.hours_diff = Some(3.5);
        w2.spares = vec![SpareUsage {
            name: "AVR".into(),
            qty: Some(4.0),
        }];

        let rollup = SparesRollup::aggregate(&[w1, w2]);
        assert_eq!(rollup.hours[Region::Sanaa.index()], 5.0);
        assert_eq!(rollup.hours[Region::Marib.index()], 3.5);
        assert_eq!(rollup.oil_filters[Region::Sanaa.index()], 1.0);
        // 两条自由文本归入同一名目后数量相加
        let avr = rollup.part(SpareLabel::Avr).unwrap();
        assert_eq!(avr[Region::Sanaa.index()], 3.0);
        assert_eq!(avr[Region::Marib.index()], 4.0);
        assert!(rollup.part(SpareLabel::Contactor).is_none());
    }

    #[test]
    fn test_export_writes_kpi_and_part_rows() {
        let mut sheet = spares_template();
        let mut w = work("صنعاء");
        w.hours_diff = Some(12.0);
        w.oil_liters = Some(6.0);
        w.oil_filter = true;
        w.spares = vec![SpareUsage {
            name: "AVR".into(),
            qty: Some(2.0),
        }];
        let mut w2 = work("عمران");
        w2.hours_diff = Some(4.0);
        w2.spares = vec![SpareUsage {
            name: "بطارية غير مدرجة".into(),
            qty: Some(1.0),
        }];

        let stats = SparesExporter::export(&mut sheet, &[w, w2]).unwrap();
        assert_eq!(stats.header_row, 3);

        // KPI: ساعات — 合计 + 分区域
        assert_eq!(sheet.cell_text(5, 7), "16");
        assert_eq!(sheet.cell_text(5, 4), "12"); // صنعاء
        assert_eq!(sheet.cell_text(5, 5), "4"); // عمران
        assert_eq!(sheet.cell_text(5, 3), "0");
        // KPI: الزيت 与 فلاتر الزيت
        assert_eq!(sheet.cell_text(6, 7), "6");
        assert_eq!(sheet.cell_text(7, 4), "1");
        // 名目行: AVR
        assert_eq!(sheet.cell_text(10, 7), "2");
        assert_eq!(sheet.cell_text(10, 4), "2");
        // 未匹配名目落入杂项行
        assert_eq!(sheet.cell_text(12, 7), "1");
        assert_eq!(sheet.cell_text(12, 5), "1");
        // كونتاكتور 行无记录 → 不写
        assert_eq!(sheet.cell_text(11, 7), "");

        // 5 个 KPI 中模板只有 3 行，其余跳过
        assert_eq!(stats.kpi_rows, 3);
        assert_eq!(stats.part_rows, 2);
        assert_eq!(stats.skipped_rows, 2);
    }

    #[test]
    fn test_total_col_falls_back_to_unit_minus_one() {
        let mut sheet = MemorySheet::new(20, 9);
        sheet.set_text(3, 2, "البيان");
        for (i, region) in Region::ALL.iter().enumerate() {
            sheet.set_text(3, (3 + i) as u32, region.label());
        }
        sheet.set_text(3, 8, "الوحدة"); // 无 الكل
        sheet.set_text(6, 2, "عدد فلاتر الهواء");

        let mut w = work("مأرب");
        w.air_filter = true;
        SparesExporter::export(&mut sheet, &[w]).unwrap();
        // 合计写入 الوحدة 左侧（第 7 列）
        assert_eq!(sheet.cell_text(6, 7), "1");
    }

    #[test]
    fn test_missing_structure_errors() {
        let mut no_statement = MemorySheet::new(5, 5);
        no_statement.set_text(1, 1, "جدول فارغ");
        let err = SparesExporter::export(&mut no_statement, &[]).unwrap_err();
        assert!(matches!(err, ExportError::StatementColumnMissing { .. }));

        let mut no_regions = MemorySheet::new(5, 5);
        no_regions.set_text(3, 2, "البيان");
        let err = SparesExporter::export(&mut no_regions, &[]).unwrap_err();
        assert!(matches!(err, ExportError::RegionColumnsMissing { .. }));

        let mut no_total = MemorySheet::new(5, 6);
        no_total.set_text(3, 2, "البيان");
        no_total.set_text(3, 3, "الأمانة");
        let err = SparesExporter::export(&mut no_total, &[]).unwrap_err();
        assert!(matches!(err, ExportError::TotalColumnMissing { .. }));
    }
}
