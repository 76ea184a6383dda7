// ==========================================
// 站点维护报表系统 - 导入 API
// ==========================================
// 职责: 记录载荷的全量替换 / 清空 / 计数
// 并发: 每个变更操作一个临界区；无隔离承诺，
//       后写覆盖先写
// ==========================================

use tracing::info;

use crate::api::error::{ApiError, ApiResult};
use crate::domain::record::ImportPayload;
use crate::i18n::{t, t_with_args};
use crate::repository::record_store::{SharedRecordStore, StoreCounts};

/// 导入结果（计数 + 本地化确认消息）
#[derive(Debug, Clone)]
pub struct ImportSummary {
    pub counts: StoreCounts,
    pub message: String,
}

// ==========================================
// ImportApi - 导入接口
// ==========================================
pub struct ImportApi {
    store: SharedRecordStore,
}

impl ImportApi {
    pub fn new(store: SharedRecordStore) -> Self {
        Self { store }
    }

    /// 全量替换存储内容
    pub fn replace(&self, payload: ImportPayload) -> ApiResult<ImportSummary> {
        let counts = {
            let mut store = self
                .store
                .lock()
                .map_err(|e| ApiError::LockError(e.to_string()))?;
            store.replace(payload)
        };
        info!(
            works = counts.works,
            emergencies = counts.emergencies,
            grid = counts.grid,
            "记录导入完成"
        );
        Ok(ImportSummary {
            counts,
            message: t_with_args(
                "store.imported",
                &[
                    ("works", &counts.works.to_string()),
                    ("emergencies", &counts.emergencies.to_string()),
                    ("grid", &counts.grid.to_string()),
                ],
            ),
        })
    }

    /// 清空存储
    pub fn clear(&self) -> ApiResult<String> {
        {
            let mut store = self
                .store
                .lock()
                .map_err(|e| ApiError::LockError(e.to_string()))?;
            store.clear();
        }
        info!("记录已清空");
        Ok(t("store.cleared"))
    }

    /// 当前各类记录条数
    pub fn counts(&self) -> ApiResult<StoreCounts> {
        let store = self
            .store
            .lock()
            .map_err(|e| ApiError::LockError(e.to_string()))?;
        Ok(store.counts())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::WorkRecord;
    use crate::repository::record_store::RecordStore;

    #[test]
    fn test_replace_then_clear() {
        let store = RecordStore::shared();
        let api = ImportApi::new(store);

        let mut w = WorkRecord::default();
        w.date = "2024-05-01".into();
        let payload = ImportPayload {
            works: vec![w],
            ..ImportPayload::default()
        };

        let summary = api.replace(payload).unwrap();
        assert_eq!(summary.counts.works, 1);
        assert!(summary.message.contains('1'));
        assert_eq!(api.counts().unwrap().works, 1);

        let message = api.clear().unwrap();
        assert!(!message.is_empty());
        assert_eq!(api.counts().unwrap(), StoreCounts::default());
    }
}
