// ==========================================
// 站点维护报表系统 - 模板配置
// ==========================================
// 职责: 报表模板目录解析与模板存在性检查
// 目录优先级: 环境变量 → 工作目录 ./templates →
//             用户数据目录（便于打包安装场景）
// ==========================================

use std::path::{Path, PathBuf};

use crate::domain::types::ReportKind;
use crate::export::error::{ExportError, ExportResult};

/// 模板目录环境变量
pub const TEMPLATES_DIR_ENV: &str = "LOCATIONS_REPORT_TEMPLATES_DIR";

// ==========================================
// TemplateConfig - 模板配置
// ==========================================
#[derive(Debug, Clone)]
pub struct TemplateConfig {
    templates_dir: PathBuf,
}

impl TemplateConfig {
    /// 指定模板目录创建配置
    pub fn new<P: Into<PathBuf>>(templates_dir: P) -> Self {
        Self {
            templates_dir: templates_dir.into(),
        }
    }

    /// 解析默认模板目录
    ///
    /// 允许通过环境变量显式指定（便于调试/测试/CI）；
    /// 其次取工作目录下的 ./templates；都不可用时退到
    /// 用户数据目录下的应用模板目录
    pub fn resolve() -> Self {
        if let Ok(dir) = std::env::var(TEMPLATES_DIR_ENV) {
            let trimmed = dir.trim();
            if !trimmed.is_empty() {
                return Self::new(trimmed);
            }
        }

        let local = PathBuf::from("templates");
        if local.is_dir() {
            return Self::new(local);
        }

        if let Some(data_dir) = dirs::data_dir() {
            let candidate = data_dir.join("locations-report").join("templates");
            if candidate.is_dir() {
                return Self::new(candidate);
            }
        }

        // 保持与历史行为一致的最终回退
        Self::new(local)
    }

    pub fn templates_dir(&self) -> &Path {
        &self.templates_dir
    }

    /// 某报表的模板文件路径（不检查存在性）
    pub fn template_path(&self, kind: ReportKind) -> PathBuf {
        self.templates_dir.join(kind.template_file())
    }

    /// 某报表的模板文件路径（不存在时为结构性错误）
    pub fn require_template(&self, kind: ReportKind) -> ExportResult<PathBuf> {
        let path = self.template_path(kind);
        if !path.is_file() {
            return Err(ExportError::TemplateMissing {
                path: path.display().to_string(),
            });
        }
        Ok(path)
    }
}
