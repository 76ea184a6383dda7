// ==========================================
// 站点维护报表系统 - 数据仓储层
// ==========================================
// 职责: 进程内记录存储（导出的唯一数据来源）
// ==========================================

pub mod record_store;

pub use record_store::{RecordStore, SharedRecordStore, StoreCounts};
