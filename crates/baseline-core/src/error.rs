//! 统一错误类型与两种错误处理策略。
//!
//! 约定：
//! - 读路径（注册表读取、基线查询）按 [`ErrorPolicy::Lenient`] 处理：错误被吞掉并降级为明确的“缺失”结果
//! - 写路径（注册表写入）按 [`ErrorPolicy::Strict`] 处理：前置检查失败或系统调用失败都原样返回给调用方
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use thiserror::Error;

/// 核心层错误。
#[derive(Debug, Error)]
pub enum BaselineError {
    /// 完整路径中没有路径分隔符，无法拆分出根键与子键路径。
    #[error("注册表路径格式错误（缺少分隔符）: {0}")]
    MalformedPath(String),
    /// 必填参数为空；在任何系统调用之前检查。
    #[error("参数不能为空: {0}")]
    ArgumentNull(&'static str),
    /// DWORD/QWORD 写入时文本无法解析为数字。
    #[error("无法将 {raw:?} 解析为 {kind}")]
    InvalidNumber { kind: &'static str, raw: String },
    /// 注册表系统调用失败。
    #[error("注册表操作失败: {0}")]
    Registry(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, BaselineError>;

/// 错误处理策略。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorPolicy {
    /// 吞掉错误，返回调用方给定的缺省结果。
    Lenient,
    /// 原样返回错误。
    Strict,
}

impl ErrorPolicy {
    /// 按策略处理一次操作的结果。
    ///
    /// 参数：
    /// - `result`：操作结果
    /// - `fallback`：`Lenient` 策略下出错时使用的缺省值
    ///
    /// 返回值：
    /// - `Lenient`：总是 `Ok`，出错时为 `fallback()`，并以 debug 级别记录错误
    /// - `Strict`：与 `result` 相同
    pub fn settle<T>(self, result: Result<T>, fallback: impl FnOnce() -> T) -> Result<T> {
        match (self, result) {
            (_, Ok(v)) => Ok(v),
            (ErrorPolicy::Lenient, Err(e)) => {
                tracing::debug!(error = %e, "读操作失败，按宽松策略降级");
                Ok(fallback())
            }
            (ErrorPolicy::Strict, Err(e)) => Err(e),
        }
    }
}
