// ==========================================
// 站点维护报表系统 - 表头/名目行定位
// ==========================================
// 职责: 以模糊标签匹配解析模板坐标
// 匹配口径: 归一化后的子串包含（模板为人工维护
//           的表格，标点/空白跨版本不一致，精确
//           匹配过脆，词法相似度误报过多）
// ==========================================

use std::collections::HashMap;
use std::hash::Hash;

use crate::sheet::grid::SheetGrid;
use crate::sheet::normalize::normalize;

/// 默认表头扫描窗口（行）
pub const HEADER_SCAN_ROWS: u32 = 240;

/// 明细模板的加宽扫描窗口（行）
pub const DETAIL_HEADER_SCAN_ROWS: u32 = 400;

/// 回退式表头行猜测的扫描窗口（行）
pub const FALLBACK_SCAN_ROWS: u32 = 60;

/// 名目行扫描窗口（行）
pub const LABEL_SCAN_ROWS: u32 = 800;

/// 解析逻辑字段 → 列号（行优先扫描，全部命中即提前结束）
///
/// 每个字段给出一组可接受的标签变体；单元格归一化文本
/// 包含任一归一化变体即命中，首个命中的列生效。
/// 返回命中的子集；必填字段缺失由调用方裁决
pub fn locate_columns<K, S>(sheet: &S, wanted: &[(K, &[&str])], row_limit: u32) -> HashMap<K, u32>
where
    K: Copy + Eq + Hash,
    S: SheetGrid + ?Sized,
{
    let normalized: Vec<(K, Vec<String>)> = wanted
        .iter()
        .map(|(key, variants)| (*key, variants.iter().map(|v| normalize(v)).collect()))
        .collect();

    let mut resolved: HashMap<K, u32> = HashMap::new();
    let top_row = row_limit.min(sheet.max_row());
    for row in 1..=top_row {
        for col in 1..=sheet.max_col() {
            let value = normalize(&sheet.cell_text(row, col));
            if value.is_empty() {
                continue;
            }
            for (key, variants) in &normalized {
                if resolved.contains_key(key) {
                    continue;
                }
                if variants
                    .iter()
                    .any(|v| !v.is_empty() && value.contains(v.as_str()))
                {
                    resolved.insert(*key, col);
                }
            }
        }
        if resolved.len() == wanted.len() {
            break;
        }
    }
    resolved
}

/// 回退策略: 猜测真实表头行后在该行内重新解析全部字段
///
/// 候选行 = 同时含有每个必填字段任一变体的行；
/// 其中非空单元格最多者视为真实表头行
/// （"标签最密的行才是表头" 启发式）。
/// 无候选行时返回空表
pub fn locate_columns_fallback<K, S>(
    sheet: &S,
    wanted: &[(K, &[&str])],
    mandatory: &[K],
    row_limit: u32,
) -> HashMap<K, u32>
where
    K: Copy + Eq + Hash,
    S: SheetGrid + ?Sized,
{
    let normalized: Vec<(K, Vec<String>)> = wanted
        .iter()
        .map(|(key, variants)| (*key, variants.iter().map(|v| normalize(v)).collect()))
        .collect();

    let mut header_row: Option<u32> = None;
    let mut best_density = 0usize;
    let top_row = row_limit.min(sheet.max_row());
    for row in 1..=top_row {
        let row_values: Vec<String> = (1..=sheet.max_col())
            .map(|col| normalize(&sheet.cell_text(row, col)))
            .collect();

        let qualifies = mandatory.iter().all(|key| {
            normalized
                .iter()
                .find(|(k, _)| k == key)
                .map(|(_, variants)| {
                    row_values.iter().any(|value| {
                        variants
                            .iter()
                            .any(|v| !v.is_empty() && value.contains(v.as_str()))
                    })
                })
                .unwrap_or(false)
        });
        if !qualifies {
            continue;
        }

        let density = row_values.iter().filter(|v| !v.is_empty()).count();
        if density > best_density {
            best_density = density;
            header_row = Some(row);
        }
    }

    let mut resolved: HashMap<K, u32> = HashMap::new();
    let Some(row) = header_row else {
        return resolved;
    };
    for col in 1..=sheet.max_col() {
        let value = normalize(&sheet.cell_text(row, col));
        if value.is_empty() {
            continue;
        }
        for (key, variants) in &normalized {
            if resolved.contains_key(key) {
                continue;
            }
            if variants
                .iter()
                .any(|v| !v.is_empty() && value.contains(v.as_str()))
            {
                resolved.insert(*key, col);
            }
        }
    }
    resolved
}

/// 单字段列定位（如备件清册的「البيان」列）
pub fn find_column<S>(sheet: &S, variants: &[&str], row_limit: u32) -> Option<u32>
where
    S: SheetGrid + ?Sized,
{
    let normalized: Vec<String> = variants.iter().map(|v| normalize(v)).collect();
    let top_row = row_limit.min(sheet.max_row());
    for row in 1..=top_row {
        for col in 1..=sheet.max_col() {
            let value = normalize(&sheet.cell_text(row, col));
            if value.is_empty() {
                continue;
            }
            if normalized
                .iter()
                .any(|v| !v.is_empty() && value.contains(v.as_str()))
            {
                return Some(col);
            }
        }
    }
    None
}

/// 名目行定位：首个含任一变体的行（KPI/备件行等非表头目标）
pub fn find_label_row<S>(sheet: &S, variants: &[&str], row_limit: u32) -> Option<u32>
where
    S: SheetGrid + ?Sized,
{
    let normalized: Vec<String> = variants.iter().map(|v| normalize(v)).collect();
    let top_row = row_limit.min(sheet.max_row());
    for row in 1..=top_row {
        for col in 1..=sheet.max_col() {
            let value = normalize(&sheet.cell_text(row, col));
            if normalized
                .iter()
                .any(|v| !v.is_empty() && value.contains(v.as_str()))
            {
                return Some(row);
            }
        }
    }
    None
}
