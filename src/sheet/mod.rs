// ==========================================
// 站点维护报表系统 - 工作表层
// ==========================================
// 职责: 模板网格抽象
// 组成: 文本归一化 / 网格特征(合并单元格) /
//       表头与名目行定位 / 可写行游标 / xlsx 适配
// ==========================================

pub mod cursor;
pub mod grid;
pub mod locate;
pub mod normalize;
pub mod xlsx;

pub use cursor::first_writable_row;
pub use grid::{CellKind, CellValue, MemorySheet, MergedRegion, SheetGrid};
pub use locate::{find_column, find_label_row, locate_columns, locate_columns_fallback};
pub use normalize::normalize;
pub use xlsx::XlsxSheet;
