// ==========================================
// 站点维护报表系统 - 领域记录模型
// ==========================================
// 职责: JSON 载荷的类型化记录（字段名即线上契约）
// 说明: 前端载荷来源不一，数值字段宽松反序列化
//       （数字/数字字符串/null 均可），缺省一律为空
// ==========================================

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer, Serialize};

// ==========================================
// 宽松数值反序列化
// ==========================================

/// 接受数字、数字字符串或 null 的 Option<f64> 反序列化
fn de_lenient_f64<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<serde_json::Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(serde_json::Value::Null) => None,
        Some(serde_json::Value::Number(n)) => n.as_f64(),
        Some(serde_json::Value::String(s)) => s.trim().parse::<f64>().ok(),
        Some(_) => None,
    })
}

// ==========================================
// ISO 日期解析
// ==========================================

/// 解析记录中的 ISO 日期/时间字符串
///
/// 依次尝试带毫秒的 UTC 时间戳、秒级时间戳、纯日期前缀；
/// 全部失败时返回最早时刻（排序时落在所有可解析记录之前，
/// 不视为错误）
pub fn parse_dt_iso(s: &str) -> NaiveDateTime {
    let s = s.trim();
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.fZ") {
        return dt;
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S") {
        return dt;
    }
    if let Some(prefix) = s.get(..10) {
        if let Ok(d) = NaiveDate::parse_from_str(prefix, "%Y-%m-%d") {
            return d.and_hms_opt(0, 0, 0).unwrap_or(NaiveDateTime::MIN);
        }
    }
    NaiveDateTime::MIN
}

/// 日期字符串是否落在指定月份（"YYYY-MM" 前缀比较）
pub fn date_in_month(date: &str, month: &str) -> bool {
    date.get(..7) == Some(month)
}

// ==========================================
// SpareUsage - 备件行项
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SpareUsage {
    pub name: String, // 自由文本备件名
    #[serde(deserialize_with = "de_lenient_f64")]
    pub qty: Option<f64>, // 数量
}

// ==========================================
// GridReading - 随工单的电网抄表（عمومي/تجاري）
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridReading {
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_prev: Option<f64>, // 上期读数
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_now: Option<f64>, // 本期读数
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_diff: Option<f64>, // 消耗量
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwhr: Option<f64>, // kWhr（可选）
    #[serde(deserialize_with = "de_lenient_f64")]
    pub hours: Option<f64>, // 电表小时数
}

// ==========================================
// EmergencyInfo - 工单内嵌抢修信息
// ==========================================
// 作业类型为「صيانة طارئة」时随工单一并填报
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmergencyInfo {
    pub alarm: String,    // 告警内容
    pub source: String,   // 报修来源
    pub category: String, // 问题分类
}

// ==========================================
// WorkRecord - 维护工单记录
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct WorkRecord {
    pub date: String,    // ISO 日期
    pub weekday: String, // 星期标签
    pub region: String,  // 区域（自由文本，汇总时并入词表）
    pub site: String,    // 站点
    pub site_owner: String, // 站点权属
    pub job_type: String,   // 作业类型标签
    pub summary: String,    // 工作摘要
    #[serde(deserialize_with = "de_lenient_f64")]
    pub oil_liters: Option<f64>, // 机油（升）
    pub oil_filter: bool,    // 机油滤芯更换
    pub diesel_filter: bool, // 柴油滤芯更换
    pub air_filter: bool,    // 空气滤芯更换
    #[serde(deserialize_with = "de_lenient_f64")]
    pub hours_now: Option<f64>, // 小时表当前读数
    #[serde(deserialize_with = "de_lenient_f64")]
    pub hours_diff: Option<f64>, // 读数差（填报端计算，备件清册口径）
    #[serde(deserialize_with = "de_lenient_f64")]
    pub l1: Option<f64>, // 三相电流 L1
    #[serde(deserialize_with = "de_lenient_f64")]
    pub l2: Option<f64>, // 三相电流 L2
    #[serde(deserialize_with = "de_lenient_f64")]
    pub l3: Option<f64>, // 三相电流 L3
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_now: Option<f64>, // kWh 读数
    pub spares: Vec<SpareUsage>, // 备件行项（有序）
    pub grid: Option<GridReading>, // 电网抄表（可选）
    pub emergency: Option<EmergencyInfo>, // 内嵌抢修信息（可选）
    pub executor: String, // 执行人
    pub driver: String,   // 司机
    pub notes: String,    // 备注
    pub saved_at: String, // 保存时间戳
}

impl WorkRecord {
    /// 稳定排序键：(记录日期, 保存时间戳)
    pub fn sort_key(&self) -> (NaiveDateTime, NaiveDateTime) {
        (parse_dt_iso(&self.date), parse_dt_iso(&self.saved_at))
    }

    /// 是否属于指定月份
    pub fn in_month(&self, month: &str) -> bool {
        date_in_month(&self.date, month)
    }
}

// ==========================================
// EmergencyRecord - 独立抢修记录（旧路径）
// ==========================================
// 与工单内嵌抢修信息不同：独立抢修单独填报，
// 导出明细时按 (日期, 区域, 站点) 键并入既有行
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EmergencyRecord {
    pub date: String,
    pub region: String,
    pub site: String,
    pub site_owner: String,
    pub alarm: String,    // 告警内容
    pub source: String,   // 报修来源
    pub category: String, // 问题分类
    pub etype: String,    // 抢修类型
    pub notes: String,
    pub remarks: String,
    pub saved_at: String,
}

impl EmergencyRecord {
    /// 稳定排序键：(记录日期, 保存时间戳)
    pub fn sort_key(&self) -> (NaiveDateTime, NaiveDateTime) {
        (parse_dt_iso(&self.date), parse_dt_iso(&self.saved_at))
    }

    /// 是否属于指定月份
    pub fn in_month(&self, month: &str) -> bool {
        date_in_month(&self.date, month)
    }
}

// ==========================================
// GridRecord - 独立电网抄表记录
// ==========================================
// 仅入库与计数，现有报表不消费
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GridRecord {
    pub date: String,
    pub region: String,
    pub site: String,
    pub site_owner: String,
    pub etype: String, // عمومي / تجاري
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_prev: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_now: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwhr: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub hours: Option<f64>,
    #[serde(deserialize_with = "de_lenient_f64")]
    pub kwh_diff: Option<f64>,
    pub saved_at: String,
}

// ==========================================
// ImportPayload - 导入载荷
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ImportPayload {
    pub works: Vec<WorkRecord>,
    pub emergencies: Vec<EmergencyRecord>,
    pub grid: Vec<GridRecord>,
}
