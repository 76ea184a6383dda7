// ==========================================
// 站点维护报表系统 - 日常维护明细表引擎
// ==========================================
// 职责: 工单+抢修记录 → 明细模板逐行填充
// 要点:
//   1) 按 (日期, 保存时间) 稳定升序
//   2) 逐(区域,站点)维护小时表基线，行差 = max(0, Δ)
//   3) 一条工单按备件行项展开为多个子行
//   4) 行落位经可写行游标，保证严格递增且避开合并带
//   5) 独立抢修按 (日期,区域,站点) 键并入既有行，
//      无匹配时追加新行并登记键
// ==========================================

use std::collections::HashMap;

use tracing::debug;

use crate::domain::record::{EmergencyRecord, WorkRecord};
use crate::domain::types::{JobType, ReportKind};
use crate::export::error::{ExportError, ExportResult};
use crate::sheet::cursor::first_writable_row;
use crate::sheet::grid::{CellValue, SheetGrid};
use crate::sheet::locate::{
    locate_columns, locate_columns_fallback, DETAIL_HEADER_SCAN_ROWS, FALLBACK_SCAN_ROWS,
    HEADER_SCAN_ROWS,
};
use crate::sheet::normalize::normalize;

// ==========================================
// DetailField - 明细表逻辑字段
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DetailField {
    Index,
    Day,
    Date,
    Region,
    Site,
    Owner,
    Job,
    Summary,
    Oil,
    FilterOil,
    FilterDiesel,
    FilterAir,
    HoursNow,
    HoursDiff,
    L1,
    L2,
    L3,
    Kwh,
    Spare,
    Qty,
    Executor,
    Driver,
    Notes,
    EmergAlarm,
    EmergSource,
    EmergCategory,
    EmergType,
    GridPrev,
    GridNow,
    GridDiff,
    GridKwhr,
    GridHours,
}

// 各逻辑字段可接受的标签变体（模板各版本的措辞/空白不一致）
const DETAIL_HEADERS: &[(DetailField, &[&str])] = &[
    (DetailField::Index, &["م"]),
    (DetailField::Day, &["اليوم"]),
    (DetailField::Date, &["التاريخ", "تاريخ"]),
    (DetailField::Region, &["المنطقة", "المنطقه"]),
    (DetailField::Site, &["الموقع"]),
    (DetailField::Owner, &["تبعية الموقع", "تبعيةالموقع", "التبعية"]),
    (DetailField::Job, &["نوع العمل", "نوعالعمل"]),
    (
        DetailField::Summary,
        &[
            "العمل المنجز",
            "العملالمنجز(ملخصفقط)",
            "العمل المنجز (ملخص فقط)",
            "ملخص العمل",
        ],
    ),
    (
        DetailField::Oil,
        &["الزيت (لتر)", "الزيت(لتر)", "كمية الزيت", "كميةالزيت"],
    ),
    (DetailField::FilterOil, &["فلتر الزيت", "فلترالزيت"]),
    (DetailField::FilterDiesel, &["فلتر الديزل", "فلترالديزل"]),
    (DetailField::FilterAir, &["فلتر الهواء", "فلترالهواء"]),
    (
        DetailField::HoursNow,
        &["عداد الساعات", "عدادالساعات", "ساعات المولد", "ساعاتالمولد"],
    ),
    (
        DetailField::HoursDiff,
        &[
            "فارق القراءة",
            "فارقالقراءة",
            "فارق القراءة (تغيير الزيت)",
            "فارقالقراءة(تغييرالزيت)",
            "فرق الساعات",
            "فرقالساعات",
        ],
    ),
    (DetailField::L1, &["L1", "L1(A)"]),
    (DetailField::L2, &["L2", "L2(A)"]),
    (DetailField::L3, &["L3", "L3(A)"]),
    (DetailField::Kwh, &["KWh", "KWH", "قراءةKWh", "KWh(حالي)"]),
    (DetailField::Spare, &["اسم القطعة", "اسم القطعه", "الصنف"]),
    (DetailField::Qty, &["الكمية", "الكميه"]),
    (DetailField::Executor, &["المنفذ للعمل", "المنفذ"]),
    (DetailField::Driver, &["السائق"]),
    (DetailField::Notes, &["ملاحظات", "الملاحظات"]),
    (DetailField::EmergAlarm, &["الإنذار", "الانذار"]),
    (DetailField::EmergSource, &["مصدر البلاغ", "مصدرالبلاغ"]),
    (DetailField::EmergCategory, &["تصنيف المشكلة", "تصنيفالمشكلة"]),
    (DetailField::EmergType, &["النوع", "نوع الطارئ"]),
    (
        DetailField::GridPrev,
        &["القراءة السابقة", "القراءةالسابقة", "KWh السابقة", "KWhالسابقة"],
    ),
    (
        DetailField::GridNow,
        &[
            "الحالية",
            "القراءة الحالية",
            "القراءةالحالية",
            "KWh الحالية",
            "KWhالحالية",
        ],
    ),
    (
        DetailField::GridDiff,
        &["الاستهلاك (KWh)", "الاستهلاكKWh", "فرقKWh", "فرقالKWh"],
    ),
    (DetailField::GridKwhr, &["kWhr", "KWhr", "kWhr(اختياري)"]),
    (
        DetailField::GridHours,
        &[
            "عداد ساعات الكهرباء",
            "عدادساعاتالكهرباء",
            "ساعات الكهرباء",
            "ساعاتالكهرباء",
        ],
    ),
];

// ==========================================
// RowKey - 行合并键
// ==========================================
// 归一化的 (日期前缀, 区域, 站点)；一次导出内
// 一个键至多对应一个明细行
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RowKey {
    date: String,
    region: String,
    site: String,
}

impl RowKey {
    pub fn new(date: &str, region: &str, site: &str) -> Self {
        Self {
            date: normalize(date).chars().take(10).collect(),
            region: normalize(region),
            site: normalize(site),
        }
    }

    fn is_empty(&self) -> bool {
        self.date.is_empty() && self.region.is_empty() && self.site.is_empty()
    }
}

/// 导出统计（日志用）
#[derive(Debug, Clone, Default)]
pub struct DetailStats {
    pub header_row: u32,
    pub work_rows: usize,
    pub merged_emergencies: usize,
    pub appended_emergencies: usize,
}

// ==========================================
// DetailExporter - 明细表引擎
// ==========================================
pub struct DetailExporter;

impl DetailExporter {
    /// 向明细模板写入一个月的工单与抢修记录
    ///
    /// 结构性失败（必填列无法定位）发生在任何写入之前
    pub fn export<S: SheetGrid + ?Sized>(
        sheet: &mut S,
        mut works: Vec<WorkRecord>,
        mut emergencies: Vec<EmergencyRecord>,
    ) -> ExportResult<DetailStats> {
        // 1) 严格时间升序（旧 → 新；同日按保存时间，日期不可解析的最先）
        works.sort_by_key(WorkRecord::sort_key);
        emergencies.sort_by_key(EmergencyRecord::sort_key);

        // 2) 表头列解析（含回退），必填: 日期/站点
        let cols = Self::resolve_columns(sheet)?;
        let date_col = cols[&DetailField::Date];

        // 3) 表头行 = 日期标签所在行
        let header_row = Self::find_header_row(sheet, date_col);

        let mut targets: Vec<u32> = cols.values().copied().collect();
        targets.sort_unstable();
        targets.dedup();

        // 4) 首个全列可写的数据行
        let mut row = first_writable_row(sheet, &targets, header_row + 1);

        let mut stats = DetailStats {
            header_row,
            ..DetailStats::default()
        };
        let mut index: i64 = 1;
        let mut last_hours: HashMap<String, f64> = HashMap::new();

        // 5) 写入工单（每个备件行项一行），逐行经游标推进
        for work in &works {
            let region = work.region.trim();
            let site = work.site.trim();
            let baseline_key = format!("{}__{}", normalize(region), normalize(site));

            let hours_now = work.hours_now.unwrap_or(0.0);
            let last = last_hours.get(&baseline_key).copied().unwrap_or(0.0);
            let hours_diff = (hours_now - last).max(0.0);
            if hours_now > 0.0 {
                // 更低的乱序读数不回拨基线
                last_hours.insert(baseline_key, hours_now);
            }

            let mut base = Self::base_row(work, index, region, site, hours_now, hours_diff);

            // 内嵌抢修：作业类型为「صيانة طارئة」时填入抢修列
            // （此路径没有独立的抢修类型字段，النوع 列留空）
            if work.job_type.trim() == JobType::Emergency.label() {
                if let Some(info) = &work.emergency {
                    base.insert(DetailField::EmergAlarm, CellValue::text(info.alarm.clone()));
                    base.insert(DetailField::EmergSource, CellValue::text(info.source.clone()));
                    base.insert(
                        DetailField::EmergCategory,
                        CellValue::text(info.category.clone()),
                    );
                    base.insert(DetailField::EmergType, CellValue::Empty);
                }
            }

            // 无备件行项时也要有一个空行项
            let one_empty = [Default::default()];
            let spares: &[crate::domain::record::SpareUsage] = if work.spares.is_empty() {
                &one_empty
            } else {
                &work.spares
            };

            for spare in spares {
                base.insert(DetailField::Spare, CellValue::text(spare.name.clone()));
                base.insert(DetailField::Qty, CellValue::from_opt_number(spare.qty));
                for (field, col) in &cols {
                    if let Some(value) = base.get(field) {
                        sheet.write_safe(row, *col, value);
                    }
                }
                stats.work_rows += 1;
                row = first_writable_row(sheet, &targets, row + 1);
            }
            index += 1;
        }

        // 6) 从已写区间建 键→行 索引，供独立抢修并入
        let mut row_by_key: HashMap<RowKey, u32> = HashMap::new();
        let region_col = cols.get(&DetailField::Region).copied().unwrap_or(1);
        let site_col = cols.get(&DetailField::Site).copied().unwrap_or(1);
        for written_row in (header_row + 1)..row {
            let key = RowKey::new(
                &sheet.cell_text(written_row, date_col),
                &sheet.cell_text(written_row, region_col),
                &sheet.cell_text(written_row, site_col),
            );
            if !key.is_empty() {
                row_by_key.insert(key, written_row);
            }
        }

        // 7) 独立抢修（旧路径）：键命中则就地并入，否则追加
        for emergency in &emergencies {
            let region = emergency.region.trim();
            let site = emergency.site.trim();
            let date_prefix: String = emergency.date.chars().take(10).collect();
            let key = RowKey::new(&date_prefix, region, site);

            let payload = [
                (DetailField::EmergAlarm, CellValue::text(emergency.alarm.clone())),
                (DetailField::EmergSource, CellValue::text(emergency.source.clone())),
                (
                    DetailField::EmergCategory,
                    CellValue::text(emergency.category.clone()),
                ),
                (DetailField::EmergType, CellValue::text(emergency.etype.clone())),
            ];

            if let Some(&existing_row) = row_by_key.get(&key) {
                // 同日同站点已有工单行：仅补写抢修列，不新增行
                for (field, value) in &payload {
                    if let Some(col) = cols.get(field) {
                        sheet.write_safe(existing_row, *col, value);
                    }
                }
                stats.merged_emergencies += 1;
                continue;
            }

            let mut base: HashMap<DetailField, CellValue> = HashMap::from([
                (DetailField::Index, CellValue::Int(index)),
                (DetailField::Day, CellValue::Empty),
                (DetailField::Date, CellValue::text(emergency.date.clone())),
                (DetailField::Region, CellValue::text(region)),
                (DetailField::Site, CellValue::text(site)),
                (DetailField::Owner, CellValue::text(emergency.site_owner.clone())),
                (DetailField::Job, CellValue::Empty),
                (DetailField::Summary, CellValue::text(emergency.notes.clone())),
                (DetailField::Oil, CellValue::Empty),
                (DetailField::FilterOil, CellValue::Empty),
                (DetailField::FilterDiesel, CellValue::Empty),
                (DetailField::FilterAir, CellValue::Empty),
                (DetailField::HoursNow, CellValue::Empty),
                (DetailField::HoursDiff, CellValue::Empty),
                (DetailField::L1, CellValue::Empty),
                (DetailField::L2, CellValue::Empty),
                (DetailField::L3, CellValue::Empty),
                (DetailField::Kwh, CellValue::Empty),
                (DetailField::Executor, CellValue::Empty),
                (DetailField::Driver, CellValue::Empty),
                (DetailField::Notes, CellValue::text(emergency.remarks.clone())),
            ]);
            base.extend(payload);

            for (field, col) in &cols {
                if let Some(value) = base.get(field) {
                    sheet.write_safe(row, *col, value);
                }
            }
            // 登记键：同键的后续抢修并入此行而不是再追加
            row_by_key.insert(key, row);
            row = first_writable_row(sheet, &targets, row + 1);
            index += 1;
            stats.appended_emergencies += 1;
        }

        debug!(
            header_row = stats.header_row,
            work_rows = stats.work_rows,
            merged = stats.merged_emergencies,
            appended = stats.appended_emergencies,
            "明细表填充完成"
        );
        Ok(stats)
    }

    /// 表头列解析：常规扫描 → 密度回退 → 结构性失败
    fn resolve_columns<S: SheetGrid + ?Sized>(
        sheet: &S,
    ) -> ExportResult<HashMap<DetailField, u32>> {
        let mut cols = locate_columns(sheet, DETAIL_HEADERS, DETAIL_HEADER_SCAN_ROWS);
        if !cols.contains_key(&DetailField::Date) || !cols.contains_key(&DetailField::Site) {
            let fallback = locate_columns_fallback(
                sheet,
                DETAIL_HEADERS,
                &[DetailField::Date, DetailField::Site],
                FALLBACK_SCAN_ROWS,
            );
            if !fallback.is_empty() {
                cols = fallback;
            }
        }
        if !cols.contains_key(&DetailField::Date) || !cols.contains_key(&DetailField::Site) {
            return Err(ExportError::HeaderResolution {
                template: ReportKind::Detail.template_file().to_string(),
                detail: "التاريخ/الموقع".to_string(),
            });
        }
        Ok(cols)
    }

    /// 表头行 = 日期列标签所在行（缺省第 1 行）
    fn find_header_row<S: SheetGrid + ?Sized>(sheet: &S, date_col: u32) -> u32 {
        let needle = normalize("التاريخ");
        let top_row = HEADER_SCAN_ROWS.min(sheet.max_row());
        for row in 1..=top_row {
            if normalize(&sheet.cell_text(row, date_col)).contains(&needle) {
                return row;
            }
        }
        1
    }

    /// 工单行的共享字段（备件名/数量逐行项覆盖）
    fn base_row(
        work: &WorkRecord,
        index: i64,
        region: &str,
        site: &str,
        hours_now: f64,
        hours_diff: f64,
    ) -> HashMap<DetailField, CellValue> {
        let check = |flag: bool| {
            if flag {
                CellValue::text("✓")
            } else {
                CellValue::Empty
            }
        };

        let mut base: HashMap<DetailField, CellValue> = HashMap::from([
            (DetailField::Index, CellValue::Int(index)),
            (DetailField::Day, CellValue::text(work.weekday.clone())),
            (DetailField::Date, CellValue::text(work.date.clone())),
            (DetailField::Region, CellValue::text(region)),
            (DetailField::Site, CellValue::text(site)),
            (DetailField::Owner, CellValue::text(work.site_owner.clone())),
            (DetailField::Job, CellValue::text(work.job_type.clone())),
            (DetailField::Summary, CellValue::text(work.summary.clone())),
            (DetailField::Oil, CellValue::from_opt_number(work.oil_liters)),
            (DetailField::FilterOil, check(work.oil_filter)),
            (DetailField::FilterDiesel, check(work.diesel_filter)),
            (DetailField::FilterAir, check(work.air_filter)),
            (DetailField::HoursNow, CellValue::Number(hours_now)),
            (DetailField::HoursDiff, CellValue::Number(hours_diff)),
            (DetailField::L1, CellValue::from_opt_number(work.l1)),
            (DetailField::L2, CellValue::from_opt_number(work.l2)),
            (DetailField::L3, CellValue::from_opt_number(work.l3)),
            (DetailField::Kwh, CellValue::from_opt_number(work.kwh_now)),
            (DetailField::Executor, CellValue::text(work.executor.clone())),
            (DetailField::Driver, CellValue::text(work.driver.clone())),
            (DetailField::Notes, CellValue::text(work.notes.clone())),
        ]);

        // 电网抄表（可选）
        let grid = work.grid.clone().unwrap_or_default();
        base.insert(DetailField::GridPrev, CellValue::from_opt_number(grid.kwh_prev));
        base.insert(DetailField::GridNow, CellValue::from_opt_number(grid.kwh_now));
        base.insert(DetailField::GridDiff, CellValue::from_opt_number(grid.kwh_diff));
        base.insert(DetailField::GridKwhr, CellValue::from_opt_number(grid.kwhr));
        base.insert(DetailField::GridHours, CellValue::from_opt_number(grid.hours));
        base
    }
}
