// ==========================================
// 站点维护报表系统 - 可写行游标
// ==========================================
// 职责: 从起始行向下找到首个对全部目标列
//       都可同时落笔的行（任何目标列都不是
//       合并非锚点成员），保证一条记录占据
//       恰好一个物理行、不会渗入无关合并带
// ==========================================

use crate::sheet::grid::{CellKind, SheetGrid};

/// 首个全目标列可写的行
///
/// 同参数重复调用结果一致；start_row 增大时结果单调不减
pub fn first_writable_row<S: SheetGrid + ?Sized>(
    sheet: &S,
    target_cols: &[u32],
    start_row: u32,
) -> u32 {
    let mut row = start_row.max(1);
    loop {
        let blocked = target_cols
            .iter()
            .any(|&col| matches!(sheet.cell_kind(row, col), CellKind::MergedMember(_)));
        if !blocked {
            return row;
        }
        row = row.saturating_add(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sheet::grid::{MemorySheet, MergedRegion};

    fn sheet_with_mid_band() -> MemorySheet {
        // 第 4-5 行横跨 1..=4 列的合并带（数据段之间的装饰行）
        let mut sheet = MemorySheet::new(12, 6);
        sheet.add_merge(MergedRegion::new(4, 1, 5, 4));
        sheet
    }

    #[test]
    fn test_skips_merged_band() {
        let sheet = sheet_with_mid_band();
        assert_eq!(first_writable_row(&sheet, &[1, 2, 3], 3), 3);
        // 第 4 行的锚点在 (4,1)，列 2/3 为成员 → 整带跳过
        assert_eq!(first_writable_row(&sheet, &[1, 2, 3], 4), 6);
        assert_eq!(first_writable_row(&sheet, &[2], 5), 6);
    }

    #[test]
    fn test_anchor_column_is_writable() {
        let sheet = sheet_with_mid_band();
        // 只锁定锚点列时第 4 行本身可写
        assert_eq!(first_writable_row(&sheet, &[1], 4), 4);
    }

    #[test]
    fn test_idempotent_and_monotone() {
        let sheet = sheet_with_mid_band();
        let first = first_writable_row(&sheet, &[1, 2], 4);
        assert_eq!(first, first_writable_row(&sheet, &[1, 2], 4));
        let mut prev = 0;
        for start in 1..10 {
            let row = first_writable_row(&sheet, &[1, 2], start);
            assert!(row >= prev);
            assert!(row >= start);
            prev = row;
        }
    }

    #[test]
    fn test_start_row_floor_is_one() {
        let sheet = MemorySheet::new(3, 3);
        assert_eq!(first_writable_row(&sheet, &[1], 0), 1);
    }
}
