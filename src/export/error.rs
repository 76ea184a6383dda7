// ==========================================
// 站点维护报表系统 - 导出层错误类型
// ==========================================
// 工具: thiserror 派生宏
// 约定: 此处的变体均为结构性致命错误，报告给
//       调用方后不重试、不产出部分结果
// ==========================================

use thiserror::Error;

/// 导出层错误类型
#[derive(Error, Debug)]
pub enum ExportError {
    // ===== 模板文件错误 =====
    #[error("模板文件不存在: {path}")]
    TemplateMissing { path: String },

    #[error("工作簿读取失败: {detail}")]
    WorkbookRead { detail: String },

    #[error("工作簿写出失败: {detail}")]
    WorkbookWrite { detail: String },

    // ===== 模板结构错误 =====
    #[error("无法定位模板 {template} 的表头列: {detail}")]
    HeaderResolution { template: String, detail: String },

    #[error("模板 {template} 中未找到区域列")]
    RegionColumnsMissing { template: String },

    #[error("模板 {template} 中未找到合计列（الكل 与 الوحدة 均缺失）")]
    TotalColumnMissing { template: String },

    #[error("模板 {template} 中未找到说明列（البيان）")]
    StatementColumnMissing { template: String },

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ExportResult<T> = Result<T, ExportError>;
