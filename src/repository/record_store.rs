// ==========================================
// 站点维护报表系统 - 内存记录存储
// ==========================================
// 职责: 保存导入的工单/抢修/抄表记录
// 约定: 不跨进程持久化（设计约定）；进程级共享
//       经 Arc<Mutex<_>> 持有，每个变更操作一个
//       临界区；导出读取按月份克隆快照后立即放锁
// ==========================================

use std::sync::{Arc, Mutex};

use crate::domain::record::{EmergencyRecord, GridRecord, ImportPayload, WorkRecord};

/// 进程级共享存储句柄
pub type SharedRecordStore = Arc<Mutex<RecordStore>>;

/// 各类记录的条数
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StoreCounts {
    pub works: usize,
    pub emergencies: usize,
    pub grid: usize,
}

// ==========================================
// RecordStore - 记录存储
// ==========================================
#[derive(Debug, Default)]
pub struct RecordStore {
    works: Vec<WorkRecord>,
    emergencies: Vec<EmergencyRecord>,
    grid: Vec<GridRecord>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// 整体替换（导入即全量覆盖，后写覆盖先写）
    pub fn replace(&mut self, payload: ImportPayload) -> StoreCounts {
        self.works = payload.works;
        self.emergencies = payload.emergencies;
        self.grid = payload.grid;
        self.counts()
    }

    /// 清空全部记录
    pub fn clear(&mut self) {
        self.works.clear();
        self.emergencies.clear();
        self.grid.clear();
    }

    pub fn counts(&self) -> StoreCounts {
        StoreCounts {
            works: self.works.len(),
            emergencies: self.emergencies.len(),
            grid: self.grid.len(),
        }
    }

    /// 指定月份的工单快照
    pub fn works_for_month(&self, month: &str) -> Vec<WorkRecord> {
        self.works.iter().filter(|w| w.in_month(month)).cloned().collect()
    }

    /// 指定月份的独立抢修快照
    pub fn emergencies_for_month(&self, month: &str) -> Vec<EmergencyRecord> {
        self.emergencies
            .iter()
            .filter(|e| e.in_month(month))
            .cloned()
            .collect()
    }

    /// 建立进程级共享句柄
    pub fn shared() -> SharedRecordStore {
        Arc::new(Mutex::new(RecordStore::new()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload() -> ImportPayload {
        let mut w1 = WorkRecord::default();
        w1.date = "2024-05-01".into();
        let mut w2 = WorkRecord::default();
        w2.date = "2024-06-02".into();
        let mut e = EmergencyRecord::default();
        e.date = "2024-05-03".into();
        ImportPayload {
            works: vec![w1, w2],
            emergencies: vec![e],
            grid: vec![GridRecord::default()],
        }
    }

    #[test]
    fn test_replace_and_counts() {
        let mut store = RecordStore::new();
        let counts = store.replace(payload());
        assert_eq!(
            counts,
            StoreCounts {
                works: 2,
                emergencies: 1,
                grid: 1
            }
        );
    }

    #[test]
    fn test_month_snapshots() {
        let mut store = RecordStore::new();
        store.replace(payload());
        assert_eq!(store.works_for_month("2024-05").len(), 1);
        assert_eq!(store.works_for_month("2024-06").len(), 1);
        assert_eq!(store.works_for_month("2024-07").len(), 0);
        assert_eq!(store.emergencies_for_month("2024-05").len(), 1);
    }

    #[test]
    fn test_clear() {
        let mut store = RecordStore::new();
        store.replace(payload());
        store.clear();
        assert_eq!(store.counts(), StoreCounts::default());
    }
}
