// ==========================================
// 站点维护报表系统 - API 层
// ==========================================
// 职责: 面向调用方的业务接口（导入/清空/导出）
// ==========================================

pub mod error;
pub mod export_api;
pub mod import_api;

pub use error::{ApiError, ApiResult};
pub use export_api::{ExportApi, ExportedWorkbook};
pub use import_api::{ImportApi, ImportSummary};
