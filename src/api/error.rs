// ==========================================
// 站点维护报表系统 - API 层错误类型
// ==========================================
// 职责: 把导出层错误与接口级校验错误统一呈现
//       给调用方；错误信息必须含显式原因
// ==========================================

use thiserror::Error;

use crate::export::error::ExportError;

/// API 层错误类型
#[derive(Error, Debug)]
pub enum ApiError {
    // ===== 参数校验错误 =====
    #[error("无效的月份参数: {0}（期望 YYYY-MM）")]
    InvalidMonth(String),

    // ===== 并发控制错误 =====
    #[error("记录存储锁获取失败: {0}")]
    LockError(String),

    // ===== 导出错误（结构性失败原样上抛） =====
    #[error(transparent)]
    Export(#[from] ExportError),

    // ===== 通用错误 =====
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result 类型别名
pub type ApiResult<T> = Result<T, ApiError>;

/// 校验月份参数为 "YYYY-MM"
pub fn validate_month(month: &str) -> ApiResult<()> {
    let bytes = month.as_bytes();
    let valid = bytes.len() == 7
        && bytes[4] == b'-'
        && bytes[..4].iter().all(u8::is_ascii_digit)
        && bytes[5..].iter().all(u8::is_ascii_digit);
    if valid {
        Ok(())
    } else {
        Err(ApiError::InvalidMonth(month.to_string()))
    }
}
