// ==========================================
// 站点维护报表系统 - 领域层
// ==========================================
// 职责: 记录类型与封闭词表
// ==========================================

pub mod record;
pub mod types;

pub use record::{
    EmergencyInfo, EmergencyRecord, GridReading, GridRecord, ImportPayload, SpareUsage, WorkRecord,
};
pub use types::{JobType, Region, ReportKind, SpareLabel};
