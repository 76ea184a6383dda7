// ==========================================
// 站点维护报表系统 - 月度任务汇总表引擎
// ==========================================
// 职责: 作业类型 × 区域 计数矩阵 → 汇总模板
// 口径: 工单按作业类型词表归类（未知 → أخرى）；
//       独立抢修一律计入「صيانة طارئة」行，
//       不再按其自身类型细分（领域规则）
// ==========================================

use tracing::debug;

use crate::domain::record::{EmergencyRecord, WorkRecord};
use crate::domain::types::{JobType, Region, ReportKind};
use crate::export::error::{ExportError, ExportResult};
use crate::sheet::grid::{CellValue, SheetGrid};
use crate::sheet::locate::HEADER_SCAN_ROWS;
use crate::sheet::normalize::normalize;

/// 汇总计数矩阵（封闭词表 × 封闭词表）
#[derive(Debug, Clone)]
pub struct SummaryMatrix {
    counts: [[u32; Region::ALL.len()]; JobType::ALL.len()],
}

impl SummaryMatrix {
    pub fn new() -> Self {
        Self {
            counts: [[0; Region::ALL.len()]; JobType::ALL.len()],
        }
    }

    /// 工单计数（未知作业类型并入 أخرى）
    pub fn add_work(&mut self, work: &WorkRecord) {
        let job = JobType::from_label(&work.job_type);
        let region = Region::from_label(&work.region);
        self.counts[job.index()][region.index()] += 1;
    }

    /// 独立抢修计数（固定计入 صيانة طارئة 行）
    pub fn add_emergency(&mut self, emergency: &EmergencyRecord) {
        let region = Region::from_label(&emergency.region);
        self.counts[JobType::Emergency.index()][region.index()] += 1;
    }

    pub fn count(&self, job: JobType, region: Region) -> u32 {
        self.counts[job.index()][region.index()]
    }

    pub fn total(&self, job: JobType) -> u32 {
        self.counts[job.index()].iter().sum()
    }
}

impl Default for SummaryMatrix {
    fn default() -> Self {
        Self::new()
    }
}

/// 导出统计（日志用）
#[derive(Debug, Clone, Default)]
pub struct SummaryStats {
    pub header_row: u32,
    pub works: usize,
    pub emergencies: usize,
}

// ==========================================
// SummaryExporter - 汇总表引擎
// ==========================================
pub struct SummaryExporter;

impl SummaryExporter {
    /// 向汇总模板写入一个月的计数矩阵
    pub fn export<S: SheetGrid + ?Sized>(
        sheet: &mut S,
        works: &[WorkRecord],
        emergencies: &[EmergencyRecord],
    ) -> ExportResult<SummaryStats> {
        let template = ReportKind::Summary.template_file();

        // 1) 表头行 = 命中标签（المهام/الكل/各区域）最多的行
        let header_row = Self::find_header_row(sheet).ok_or_else(|| {
            ExportError::HeaderResolution {
                template: template.to_string(),
                detail: "صف العناوين".to_string(),
            }
        })?;

        // 2) 列解析（精确匹配，序号列 م 跳过）
        let mut task_col: Option<u32> = None;
        let mut total_col: Option<u32> = None;
        let mut region_cols: Vec<(Region, u32)> = Vec::new();
        let skip = normalize("م");
        let task_label = normalize("المهام");
        let total_label = normalize("الكل");
        for col in 1..=sheet.max_col() {
            let value = normalize(&sheet.cell_text(header_row, col));
            if value == skip {
                continue;
            }
            if value == task_label {
                task_col = Some(col);
            }
            if value == total_label {
                total_col = Some(col);
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
        let min_region_col = region_cols.iter().map(|(_, c)| *c).min().unwrap_or(2);
        let max_region_col = region_cols.iter().map(|(_, c)| *c).max().unwrap_or(2);
        // 缺失时按区域列推算：任务列在左、合计列在右
        let task_col = task_col.unwrap_or_else(|| min_region_col.saturating_sub(1).max(1));
        let total_col = total_col.unwrap_or(max_region_col + 1);

        // 3) 计数矩阵
        let mut matrix = SummaryMatrix::new();
        for work in works {
            matrix.add_work(work);
        }
        for emergency in emergencies {
            matrix.add_emergency(emergency);
        }

        // 4) 按词表行顺序写出（表头下一行起，每类型一行）
        let mut row = header_row + 1;
        for job in JobType::ALL {
            // 模板预印的任务标签原样保留，仅空单元格补写
            if sheet.cell_text(row, task_col).trim().is_empty() {
                sheet.write_safe(row, task_col, &CellValue::text(job.label()));
            }
            sheet.write_safe(row, total_col, &CellValue::Int(matrix.total(job) as i64));
            for (region, col) in &region_cols {
                sheet.write_safe(row, *col, &CellValue::Int(matrix.count(job, *region) as i64));
            }
            row += 1;
        }

        let stats = SummaryStats {
            header_row,
            works: works.len(),
            emergencies: emergencies.len(),
        };
        debug!(
            header_row = stats.header_row,
            works = stats.works,
            emergencies = stats.emergencies,
            "汇总表填充完成"
        );
        Ok(stats)
    }

    /// 命中标签数最多的行（并列取先出现者）
    fn find_header_row<S: SheetGrid + ?Sized>(sheet: &S) -> Option<u32> {
        let mut wanted: Vec<String> = vec![normalize("المهام"), normalize("الكل")];
        wanted.extend(Region::ALL.iter().map(|r| normalize(r.label())));

        let mut best: Option<(u32, usize)> = None;
        let top_row = HEADER_SCAN_ROWS.min(sheet.max_row());
        for row in 1..=top_row {
            let hits = (1..=sheet.max_col())
                .filter(|&col| {
                    let value = normalize(&sheet.cell_text(row, col));
                    !value.is_empty() && wanted.iter().any(|w| *w == value)
                })
                .count();
            if hits > 0 && best.map(|(_, h)| hits > h).unwrap_or(true) {
                best = Some((row, hits));
            }
        }
        best.map(|(row, _)| row)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::grid::MemorySheet;

    // 汇总测试模板：第 2 行表头 م | المهام | الأمانة | صنعاء | عمران | مأرب | الكل
    fn summary_template() -> MemorySheet {
        let mut sheet = MemorySheet::new(30, 8);
        sheet.set_text(1, 2, "ملخص المهام الشهرية");
        sheet.set_text(2, 1, "م");
        sheet.set_text(2, 2, "المهام");
        for (i, region) in Region::ALL.iter().enumerate() {
            sheet.set_text(2, (3 + i) as u32, region.label());
        }
        sheet.set_text(2, 7, "الكل");
        sheet
    }

    fn work(job: &str, region: &str) -> WorkRecord {
        let mut w = WorkRecord::default();
        w.date = "2024-05-01".into();
        w.job_type = job.into();
        w.region = region.into();
        w
    }

    fn emergency(region: &str) -> EmergencyRecord {
        let mut e = EmergencyRecord::default();
        e.date = "2024-05-01".into();
        e.region = region.into();
        e.etype = "انقطاع تيار".into(); // 自身类型被忽略
        e
    }

    #[test]
    fn test_counts_matrix_and_totals() {
        let mut sheet = summary_template();
        let works = vec![
            work("صيانة دورية", "صنعاء"),
            work("صيانة دورية", "صنعاء"),
            work("صيانة دورية", "مأرب"),
            work("صيانة طارئة", "الأمانة"),
        ];
        let emergencies = vec![emergency("عمران"), emergency("صنعاء")];

        SummaryExporter::export(&mut sheet, &works, &emergencies).unwrap();

        // صيانة دورية 为词表第 2 项 → 第 4 行
        assert_eq!(sheet.cell_text(4, 2), "صيانة دورية");
        assert_eq!(sheet.cell_text(4, 4), "2"); // صنعاء
        assert_eq!(sheet.cell_text(4, 6), "1"); // مأرب
        assert_eq!(sheet.cell_text(4, 7), "3"); // 合计

        // 抢修一律计入 صيانة طارئة（第 3 项 → 第 5 行），与工单合并
        assert_eq!(sheet.cell_text(5, 3), "1"); // الأمانة（工单）
        assert_eq!(sheet.cell_text(5, 4), "1"); // صنعاء（抢修）
        assert_eq!(sheet.cell_text(5, 5), "1"); // عمران（抢修）
        assert_eq!(sheet.cell_text(5, 7), "3");
    }

    #[test]
    fn test_unknown_job_counts_under_other() {
        let mut sheet = summary_template();
        let works = vec![work("نوع غير معروف", "صنعاء"), work("", "صنعاء")];
        SummaryExporter::export(&mut sheet, &works, &[]).unwrap();

        // أخرى 为词表末项 → 表头下第 14 行
        let other_row = 2 + JobType::ALL.len() as u32;
        assert_eq!(sheet.cell_text(other_row, 2), "أخرى");
        assert_eq!(sheet.cell_text(other_row, 4), "2");
    }

    #[test]
    fn test_unknown_region_coerces_to_first() {
        let mut sheet = summary_template();
        let works = vec![work("مواد", "الحديدة")];
        SummaryExporter::export(&mut sheet, &works, &[]).unwrap();

        let materials_row = 2 + 1 + JobType::Materials.index() as u32;
        assert_eq!(sheet.cell_text(materials_row, 3), "1"); // 并入首个区域
    }

    #[test]
    fn test_preprinted_labels_preserved() {
        let mut sheet = summary_template();
        // 模板预印了第一行任务标签（措辞与词表不同）
        sheet.set_text(3, 2, "الصيانة المخططة (شهري)");
        SummaryExporter::export(&mut sheet, &[], &[]).unwrap();
        assert_eq!(sheet.cell_text(3, 2), "الصيانة المخططة (شهري)");
        // 未预印的行补写词表标签
        assert_eq!(sheet.cell_text(4, 2), "صيانة دورية");
    }

    #[test]
    fn test_header_row_is_densest_hit_row() {
        let mut sheet = summary_template();
        // 标题行里孤立出现一个区域名，不应被当成表头
        sheet.set_text(1, 5, "صنعاء");
        let stats = SummaryExporter::export(&mut sheet, &[], &[]).unwrap();
        assert_eq!(stats.header_row, 2);
    }

    #[test]
    fn test_missing_structure_errors() {
        let mut empty = MemorySheet::new(5, 5);
        empty.set_text(1, 1, "لا شيء");
        let err = SummaryExporter::export(&mut empty, &[], &[]).unwrap_err();
        assert!(matches!(err, ExportError::HeaderResolution { .. }));

        // 有表头词但没有任何区域列
        let mut no_regions = MemorySheet::new(5, 5);
        no_regions.set_text(2, 2, "المهام");
        no_regions.set_text(2, 3, "الكل");
        let err = SummaryExporter::export(&mut no_regions, &[], &[]).unwrap_err();
        assert!(matches!(err, ExportError::RegionColumnsMissing { .. }));
    }
}
