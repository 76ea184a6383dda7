// ==========================================
// 站点维护报表系统 - 核心库
// ==========================================
// 技术栈: Rust + umya-spreadsheet
// 系统定位: 模板驱动的月度维护报表导出
// ==========================================

// 初始化国际化系统（阿拉伯语为默认界面语言）
rust_i18n::i18n!("locales", fallback = "ar");

// ==========================================
// 模块声明
// ==========================================

// 领域层 - 记录与封闭词表
pub mod domain;

// 数据仓储层 - 内存记录存储
pub mod repository;

// 工作表层 - 模板网格抽象（归一化/定位/合并单元格/游标）
pub mod sheet;

// 导出层 - 三类报表引擎
pub mod export;

// 配置层 - 模板路径解析
pub mod config;

// 日志系统
pub mod logging;

// 国际化
pub mod i18n;

// API 层 - 业务接口
pub mod api;

// 应用层 - 状态装配
pub mod app;

// ==========================================
// 重导出核心类型
// ==========================================

// 领域类型
pub use domain::types::{JobType, Region, ReportKind, SpareLabel};

// 领域记录
pub use domain::record::{
    EmergencyInfo, EmergencyRecord, GridReading, GridRecord, ImportPayload, SpareUsage, WorkRecord,
};

// 工作表抽象
pub use sheet::{CellKind, CellValue, MemorySheet, MergedRegion, SheetGrid};

// 导出引擎
pub use export::{DetailExporter, ExportError, ExportResult, SparesExporter, SummaryExporter};

// API
pub use api::{ApiError, ApiResult, ExportApi, ExportedWorkbook, ImportApi};

// ==========================================
// 常量定义
// ==========================================

// 系统版本
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

// 系统名称
pub const APP_NAME: &str = "站点维护报表系统";
