// ==========================================
// 站点维护报表系统 - 导出 API
// ==========================================
// 职责: 报表导出编排（按月取快照 → 打开模板 →
//       引擎填充 → 序列化为字节流 + 文件名）
// 约定: 结构性失败发生在任何写入之前；工作簿
//       只在内存中变更，字节流去向由调用方决定
// ==========================================

use tracing::info;

use crate::api::error::{validate_month, ApiError, ApiResult};
use crate::config::template_config::TemplateConfig;
use crate::domain::record::{EmergencyRecord, WorkRecord};
use crate::domain::types::ReportKind;
use crate::export::detail::DetailExporter;
use crate::export::error::ExportError;
use crate::export::spares::SparesExporter;
use crate::export::summary::SummaryExporter;
use crate::repository::record_store::SharedRecordStore;
use crate::sheet::xlsx::{open_workbook, workbook_to_bytes, XlsxSheet};

/// 导出产物（文件名 + xlsx 字节流）
#[derive(Debug, Clone)]
pub struct ExportedWorkbook {
    pub filename: String,
    pub bytes: Vec<u8>,
}

// ==========================================
// ExportApi - 导出接口
// ==========================================
pub struct ExportApi {
    store: SharedRecordStore,
    config: TemplateConfig,
}

impl ExportApi {
    pub fn new(store: SharedRecordStore, config: TemplateConfig) -> Self {
        Self { store, config }
    }

    /// 按报表类型导出
    pub fn export(&self, kind: ReportKind, month: &str) -> ApiResult<ExportedWorkbook> {
        match kind {
            ReportKind::Detail => self.export_detail(month),
            ReportKind::Summary => self.export_summary(month),
            ReportKind::Spares => self.export_spares(month),
        }
    }

    /// 日常维护明细表
    pub fn export_detail(&self, month: &str) -> ApiResult<ExportedWorkbook> {
        validate_month(month)?;
        let (works, emergencies) = self.month_snapshot(month)?;
        info!(
            month,
            works = works.len(),
            emergencies = emergencies.len(),
            "导出明细表"
        );

        let path = self.config.require_template(ReportKind::Detail)?;
        let mut book = open_workbook(&path).map_err(|e| ExportError::WorkbookRead {
            detail: e.to_string(),
        })?;
        {
            let ws = book.get_active_sheet_mut();
            let mut sheet = XlsxSheet::new(ws);
            DetailExporter::export(&mut sheet, works, emergencies)?;
        }
        self.finish(ReportKind::Detail, month, &book)
    }

    /// 月度任务汇总表
    pub fn export_summary(&self, month: &str) -> ApiResult<ExportedWorkbook> {
        validate_month(month)?;
        let (works, emergencies) = self.month_snapshot(month)?;
        info!(
            month,
            works = works.len(),
            emergencies = emergencies.len(),
            "导出汇总表"
        );

        let path = self.config.require_template(ReportKind::Summary)?;
        let mut book = open_workbook(&path).map_err(|e| ExportError::WorkbookRead {
            detail: e.to_string(),
        })?;
        {
            let ws = book.get_active_sheet_mut();
            let mut sheet = XlsxSheet::new(ws);
            SummaryExporter::export(&mut sheet, &works, &emergencies)?;
        }
        self.finish(ReportKind::Summary, month, &book)
    }

    /// 备件消耗清册
    pub fn export_spares(&self, month: &str) -> ApiResult<ExportedWorkbook> {
        validate_month(month)?;
        let (works, _) = self.month_snapshot(month)?;
        info!(month, works = works.len(), "导出备件清册");

        let path = self.config.require_template(ReportKind::Spares)?;
        let mut book = open_workbook(&path).map_err(|e| ExportError::WorkbookRead {
            detail: e.to_string(),
        })?;
        {
            let ws = book.get_active_sheet_mut();
            let mut sheet = XlsxSheet::new(ws);
            SparesExporter::export(&mut sheet, &works)?;
        }
        self.finish(ReportKind::Spares, month, &book)
    }

    /// 取月份快照（临界区内克隆，随后立即放锁）
    fn month_snapshot(
        &self,
        month: &str,
    ) -> ApiResult<(Vec<WorkRecord>, Vec<EmergencyRecord>)> {
        let store = self
            .store
            .lock()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        Ok((
            store.works_for_month(month),
            store.emergencies_for_month(month),
        ))
    }

    fn finish(
        &self,
        kind: ReportKind,
        month: &str,
        book: &umya_spreadsheet::Spreadsheet,
    ) -> ApiResult<ExportedWorkbook> {
        let bytes = workbook_to_bytes(book).map_err(|e| ExportError::WorkbookWrite {
            detail: e.to_string(),
        })?;
        let filename = kind.export_file(month);
        info!(filename = %filename, size = bytes.len(), "报表序列化完成");
        Ok(ExportedWorkbook { filename, bytes })
    }
}
