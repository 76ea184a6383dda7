// ==========================================
// 站点维护报表系统 - xlsx 适配层
// ==========================================
// 职责: umya-spreadsheet 工作表 → SheetGrid
// 说明: 模板以原格式读入、原格式写回（样式、
//       列宽、表视图等随 round-trip 保留）；
//       合并区域在适配器构造时一次性解析
// ==========================================

use std::io::Cursor;
use std::path::Path;

use anyhow::{anyhow, Context, Result};
use umya_spreadsheet::{Spreadsheet, Worksheet};

use crate::sheet::grid::{kind_in_regions, CellKind, CellValue, MergedRegion, SheetGrid};

// ==========================================
// A1 坐标解析
// ==========================================

/// 列字母 → 1 基列号（"A"→1, "AB"→28）
fn col_from_letters(letters: &str) -> Option<u32> {
    if letters.is_empty() {
        return None;
    }
    let mut col: u32 = 0;
    for ch in letters.chars() {
        let upper = ch.to_ascii_uppercase();
        if !upper.is_ascii_uppercase() {
            return None;
        }
        col = col.checked_mul(26)?.checked_add(upper as u32 - 'A' as u32 + 1)?;
    }
    Some(col)
}

/// "B7" → (行, 列)
fn parse_a1_cell(cell: &str) -> Option<(u32, u32)> {
    let split = cell.find(|c: char| c.is_ascii_digit())?;
    let (letters, digits) = cell.split_at(split);
    let col = col_from_letters(letters)?;
    let row: u32 = digits.parse().ok()?;
    if row == 0 {
        return None;
    }
    Some((row, col))
}

/// "A1:D2"（或退化的 "A1"）→ 合并区域
pub fn parse_a1_range(range: &str) -> Option<MergedRegion> {
    let mut parts = range.split(':');
    let start = parse_a1_cell(parts.next()?.trim())?;
    let end = match parts.next() {
        Some(cell) => parse_a1_cell(cell.trim())?,
        None => start,
    };
    Some(MergedRegion::new(
        start.0.min(end.0),
        start.1.min(end.1),
        start.0.max(end.0),
        start.1.max(end.1),
    ))
}

// ==========================================
// 工作簿读写
// ==========================================

/// 读入模板工作簿
pub fn open_workbook(path: &Path) -> Result<Spreadsheet> {
    umya_spreadsheet::reader::xlsx::read(path)
        .with_context(|| format!("无法读取模板工作簿: {}", path.display()))
}

/// 工作簿序列化为字节流（调用方决定文件名/去向）
pub fn workbook_to_bytes(book: &Spreadsheet) -> Result<Vec<u8>> {
    let mut cursor = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(book, &mut cursor)
        .map_err(|e| anyhow!("工作簿序列化失败: {}", e))?;
    Ok(cursor.into_inner())
}

// ==========================================
// XlsxSheet - 工作表适配器
// ==========================================
pub struct XlsxSheet<'a> {
    ws: &'a mut Worksheet,
    merges: Vec<MergedRegion>,
}

impl<'a> XlsxSheet<'a> {
    /// 包装一个已打开的工作表；合并区域在此处一次性解析
    pub fn new(ws: &'a mut Worksheet) -> Self {
        let merges = ws
            .get_merge_cells()
            .iter()
            .filter_map(|range| parse_a1_range(&range.get_range()))
            .collect();
        Self { ws, merges }
    }

    pub fn merges(&self) -> &[MergedRegion] {
        &self.merges
    }
}

impl SheetGrid for XlsxSheet<'_> {
    fn max_row(&self) -> u32 {
        self.ws.get_highest_row()
    }

    fn max_col(&self) -> u32 {
        self.ws.get_highest_column()
    }

    fn cell_text(&self, row: u32, col: u32) -> String {
        // umya 坐标为 (列, 行)
        self.ws.get_value((col, row))
    }

    fn cell_kind(&self, row: u32, col: u32) -> CellKind {
        kind_in_regions(&self.merges, row, col)
    }

    fn set_cell(&mut self, row: u32, col: u32, value: &CellValue) {
        let cell = self.ws.get_cell_mut((col, row));
        match value {
            CellValue::Empty => {
                cell.set_value_string("");
            }
            CellValue::Text(s) => {
                cell.set_value_string(s);
            }
            CellValue::Int(i) => {
                cell.set_value_number(*i as f64);
            }
            CellValue::Number(n) => {
                cell.set_value_number(*n);
            }
        }
    }
}
