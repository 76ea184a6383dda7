// ==========================================
// 站点维护报表系统 - 领域类型定义
// ==========================================
// 三个封闭词表（行政区域/作业类型/备件名目）
// 均为配置常量，运行期不扩充；自由文本一律
// 归一到词表成员，未命中归入显式兜底变体
// ==========================================

use serde::{Deserialize, Serialize};
use std::fmt;

// ==========================================
// 行政区域 (Region)
// ==========================================
// 顺序即模板列顺序；词表外取值统一并入首个区域
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Region {
    Amanah, // الأمانة
    Sanaa,  // صنعاء
    Amran,  // عمران
    Marib,  // مأرب
}

impl Region {
    /// 全部区域（模板列顺序）
    pub const ALL: [Region; 4] = [Region::Amanah, Region::Sanaa, Region::Amran, Region::Marib];

    /// 模板中的区域标签
    pub fn label(&self) -> &'static str {
        match self {
            Region::Amanah => "الأمانة",
            Region::Sanaa => "صنعاء",
            Region::Amran => "عمران",
            Region::Marib => "مأرب",
        }
    }

    /// 从记录中的区域字段解析
    ///
    /// 词表外取值并入首个区域（设计约定，非容错兜底）
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        for region in Region::ALL {
            if region.label() == trimmed {
                return region;
            }
        }
        Region::ALL[0]
    }

    /// 枚举序号（用于计数矩阵下标）
    pub fn index(&self) -> usize {
        Region::ALL.iter().position(|r| r == self).unwrap_or(0)
    }
}

impl fmt::Display for Region {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 作业类型 (Job Type)
// ==========================================
// 顺序即月度汇总表的行顺序
// 未知标签归入 Other（أخرى），不作为解析错误
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum JobType {
    Planned,         // صيانة مخططة
    Routine,         // صيانة دورية
    Emergency,       // صيانة طارئة
    Inspection,      // صيانة تفقدية
    EmergencyIntake, // استلام طوارئ
    Outage,          // تعطيل
    Commissioning,   // استلام وتشغيل
    AlarmRelay,      // ترحيل إنذارات
    GridConnect,     // ربط كهرباء
    MeterReading,    // قراءة عدادات
    WorkOrder,       // تكليف عمل
    Materials,       // مواد
    Repairs,         // إصلاحات
    Other,           // أخرى
}

impl JobType {
    /// 全部作业类型（汇总表行顺序）
    pub const ALL: [JobType; 14] = [
        JobType::Planned,
        JobType::Routine,
        JobType::Emergency,
        JobType::Inspection,
        JobType::EmergencyIntake,
        JobType::Outage,
        JobType::Commissioning,
        JobType::AlarmRelay,
        JobType::GridConnect,
        JobType::MeterReading,
        JobType::WorkOrder,
        JobType::Materials,
        JobType::Repairs,
        JobType::Other,
    ];

    /// 模板/记录中的作业类型标签
    pub fn label(&self) -> &'static str {
        match self {
            JobType::Planned => "صيانة مخططة",
            JobType::Routine => "صيانة دورية",
            JobType::Emergency => "صيانة طارئة",
            JobType::Inspection => "صيانة تفقدية",
            JobType::EmergencyIntake => "استلام طوارئ",
            JobType::Outage => "تعطيل",
            JobType::Commissioning => "استلام وتشغيل",
            JobType::AlarmRelay => "ترحيل إنذارات",
            JobType::GridConnect => "ربط كهرباء",
            JobType::MeterReading => "قراءة عدادات",
            JobType::WorkOrder => "تكليف عمل",
            JobType::Materials => "مواد",
            JobType::Repairs => "إصلاحات",
            JobType::Other => "أخرى",
        }
    }

    /// 从记录中的作业类型字段解析（空白/未知 → Other）
    pub fn from_label(label: &str) -> Self {
        let trimmed = label.trim();
        if trimmed.is_empty() {
            return JobType::Other;
        }
        for job in JobType::ALL {
            if job.label() == trimmed {
                return job;
            }
        }
        JobType::Other
    }

    /// 枚举序号（用于计数矩阵下标）
    pub fn index(&self) -> usize {
        JobType::ALL.iter().position(|j| j == self).unwrap_or(0)
    }
}

impl fmt::Display for JobType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 备件名目 (Spare Label)
// ==========================================
// 备件清册模板的行名目；自由文本备件名按
// 归一化后的双向包含匹配到名目，未命中归入
// Other（杂项备件）
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SpareLabel {
    Belts,              // عد السيور
    GeneratorBattery,   // بطارية مولد متعدد السعات
    LogoBattery,        // بطارياة لوجو
    ChargingDynamo,     // دينامو شحن مولد
    StarterMotor,       // سلف مولد
    DieselSolenoid,     // سولونايد ديزل
    Avr,                // AVR
    GeneratorCard,      // كرت تشغيل مولد
    Contactor,          // كونتاكتور
    RectifierModule,    // موديول موحد
    SolarDcModule,      // موديول طاقة شمسية(DC-DC)
    ChargeRegulator,    // منظم شحن (12/48VDC)
    BreakerThreePhase,  // قاطع كهرباء (3Ph-4p/3p)
    BreakerSinglePhase, // قاطع كهرباء (1Ph-2p/1p)
    RelayDc,            // ريلي (12/48VDC)
    RelayAc,            // ريلي (220VAC)
    Charger,            // شاحن كهرباء (220VAC/12VDC)
    Logo,               // LOGO-12VDC
    Spd,                // SPD
    DistributionBoard,  // لوحة توزيع (12/18/24)
    DynamoRegulator,    // منظم شحن دينامو
    Other,              // قطع غيار اخرى متنوعة
}

impl SpareLabel {
    /// 全部名目（匹配优先级顺序，Other 殿后）
    pub const ALL: [SpareLabel; 22] = [
        SpareLabel::Belts,
        SpareLabel::GeneratorBattery,
        SpareLabel::LogoBattery,
        SpareLabel::ChargingDynamo,
        SpareLabel::StarterMotor,
        SpareLabel::DieselSolenoid,
        SpareLabel::Avr,
        SpareLabel::GeneratorCard,
        SpareLabel::Contactor,
        SpareLabel::RectifierModule,
        SpareLabel::SolarDcModule,
        SpareLabel::ChargeRegulator,
        SpareLabel::BreakerThreePhase,
        SpareLabel::BreakerSinglePhase,
        SpareLabel::RelayDc,
        SpareLabel::RelayAc,
        SpareLabel::Charger,
        SpareLabel::Logo,
        SpareLabel::Spd,
        SpareLabel::DistributionBoard,
        SpareLabel::DynamoRegulator,
        SpareLabel::Other,
    ];

    /// 模板中的名目标签
    pub fn label(&self) -> &'static str {
        match self {
            SpareLabel::Belts => "عد السيور",
            SpareLabel::GeneratorBattery => "بطارية مولد متعدد السعات",
            SpareLabel::LogoBattery => "بطارياة لوجو",
            SpareLabel::ChargingDynamo => "دينامو شحن مولد",
            SpareLabel::StarterMotor => "سلف مولد",
            SpareLabel::DieselSolenoid => "سولونايد ديزل",
            SpareLabel::Avr => "AVR",
            SpareLabel::GeneratorCard => "كرت تشغيل مولد",
            SpareLabel::Contactor => "كونتاكتور",
            SpareLabel::RectifierModule => "موديول موحد",
            SpareLabel::SolarDcModule => "موديول طاقة شمسية(DC-DC)",
            SpareLabel::ChargeRegulator => "منظم شحن (12/48VDC)",
            SpareLabel::BreakerThreePhase => "قاطع كهرباء (3Ph-4p/3p)",
            SpareLabel::BreakerSinglePhase => "قاطع كهرباء (1Ph-2p/1p)",
            SpareLabel::RelayDc => "ريلي (12/48VDC)",
            SpareLabel::RelayAc => "ريلي (220VAC)",
            SpareLabel::Charger => "شاحن كهرباء (220VAC/12VDC)",
            SpareLabel::Logo => "LOGO-12VDC",
            SpareLabel::Spd => "SPD",
            SpareLabel::DistributionBoard => "لوحة توزيع (12/18/24)",
            SpareLabel::DynamoRegulator => "منظم شحن دينامو",
            SpareLabel::Other => "قطع غيار اخرى متنوعة",
        }
    }

    /// 枚举序号（用于汇总矩阵下标）
    pub fn index(&self) -> usize {
        SpareLabel::ALL.iter().position(|l| l == self).unwrap_or(0)
    }
}

impl fmt::Display for SpareLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

// ==========================================
// 报表类型 (Report Kind)
// ==========================================
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReportKind {
    Detail,  // 日常维护明细表
    Summary, // 月度任务汇总表
    Spares,  // 备件消耗清册
}

impl ReportKind {
    /// 模板目录下的文件名
    pub fn template_file(&self) -> &'static str {
        match self {
            ReportKind::Detail => "detail.xlsx",
            ReportKind::Summary => "summary.xlsx",
            ReportKind::Spares => "spares.xlsx",
        }
    }

    /// 导出文件名（携带月份）
    pub fn export_file(&self, month: &str) -> String {
        match self {
            ReportKind::Detail => format!("detail-{}.xlsx", month),
            ReportKind::Summary => format!("summary-{}.xlsx", month),
            ReportKind::Spares => format!("spares-{}.xlsx", month),
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportKind::Detail => write!(f, "DETAIL"),
            ReportKind::Summary => write!(f, "SUMMARY"),
            ReportKind::Spares => write!(f, "SPARES"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_region_coercion_to_first() {
        assert_eq!(Region::from_label("صنعاء"), Region::Sanaa);
        assert_eq!(Region::from_label("  عمران "), Region::Amran);
        // 词表外取值并入首个区域
        assert_eq!(Region::from_label("تعز"), Region::Amanah);
        assert_eq!(Region::from_label(""), Region::Amanah);
    }

    #[test]
    fn test_job_type_unknown_is_other() {
        assert_eq!(JobType::from_label("صيانة طارئة"), JobType::Emergency);
        assert_eq!(JobType::from_label("قراءة عدادات"), JobType::MeterReading);
        assert_eq!(JobType::from_label("نوع غير معروف"), JobType::Other);
        assert_eq!(JobType::from_label(""), JobType::Other);
    }

    #[test]
    fn test_enum_orders_are_stable() {
        assert_eq!(Region::ALL.len(), 4);
        assert_eq!(JobType::ALL.len(), 14);
        assert_eq!(SpareLabel::ALL.len(), 22);
        assert_eq!(JobType::ALL[0], JobType::Planned);
        assert_eq!(JobType::ALL[13], JobType::Other);
        assert_eq!(SpareLabel::ALL[21], SpareLabel::Other);
        assert_eq!(Region::Marib.index(), 3);
        assert_eq!(JobType::Emergency.index(), 2);
    }

    #[test]
    fn test_report_kind_file_names() {
        assert_eq!(ReportKind::Detail.template_file(), "detail.xlsx");
        assert_eq!(ReportKind::Spares.export_file("2024-05"), "spares-2024-05.xlsx");
    }
}
