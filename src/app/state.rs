// ==========================================
// 站点维护报表系统 - 应用状态
// ==========================================
// 职责: 装配共享记录存储与 API 实例
// 说明: 存储是进程内唯一共享可变资源，显式地
//       随 AppState 创建与销毁，不做全局单例
// ==========================================

use std::sync::Arc;

use tracing::info;

use crate::api::export_api::ExportApi;
use crate::api::import_api::ImportApi;
use crate::config::template_config::TemplateConfig;
use crate::repository::record_store::{RecordStore, SharedRecordStore};

/// 应用状态
///
/// 包含共享记录存储与全部 API 实例
pub struct AppState {
    /// 共享记录存储
    pub store: SharedRecordStore,

    /// 模板配置
    pub config: TemplateConfig,

    /// 导入 API
    pub import_api: Arc<ImportApi>,

    /// 导出 API
    pub export_api: Arc<ExportApi>,
}

impl AppState {
    /// 以指定模板配置创建应用状态
    pub fn new(config: TemplateConfig) -> Self {
        info!(
            templates_dir = %config.templates_dir().display(),
            "初始化 AppState"
        );

        let store = RecordStore::shared();
        let import_api = Arc::new(ImportApi::new(store.clone()));
        let export_api = Arc::new(ExportApi::new(store.clone(), config.clone()));

        Self {
            store,
            config,
            import_api,
            export_api,
        }
    }

    /// 以默认模板目录创建应用状态
    pub fn with_default_config() -> Self {
        Self::new(TemplateConfig::resolve())
    }
}
