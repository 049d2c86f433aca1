//! 注册表值类型标签与文本值的编解码。
//!
//! 说明：
//! - 编码：调用方给出类型标签（`string`/`expandstring`/`dword`/`qword`/`multistring`）与原始文本，
//!   得到可写入注册表的 [`TypedValue`]；未知标签一律按 `string` 处理
//! - 解码：将 [`TypedValue`] 转为展示用字符串，多字符串以 `,` 连接
//! - DWORD/QWORD 的负载保持为文本，数字解析交给注册表写入层（见 [`parse_dword`]/[`parse_qword`]）
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use crate::error::{BaselineError, Result};

/// 多字符串的分隔符。
pub const MULTI_SEPARATOR: char = ',';

/// 注册表值类型。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueKind {
    String,
    ExpandableString,
    DWord,
    QWord,
    MultiString,
}

impl ValueKind {
    /// 由类型标签得到值类型。
    ///
    /// 标签区分大小写；未知标签返回 [`ValueKind::String`]。
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "string" => ValueKind::String,
            "expandstring" => ValueKind::ExpandableString,
            "dword" => ValueKind::DWord,
            "qword" => ValueKind::QWord,
            "multistring" => ValueKind::MultiString,
            _ => ValueKind::String,
        }
    }

    /// 对应的类型标签。
    pub fn tag(self) -> &'static str {
        match self {
            ValueKind::String => "string",
            ValueKind::ExpandableString => "expandstring",
            ValueKind::DWord => "dword",
            ValueKind::QWord => "qword",
            ValueKind::MultiString => "multistring",
        }
    }
}

/// 带类型的注册表值。负载形状由变体保证与类型一致。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypedValue {
    String(String),
    ExpandableString(String),
    /// 十进制文本，写入时解析。
    DWord(String),
    /// 十进制文本，写入时解析。
    QWord(String),
    MultiString(Vec<String>),
}

impl TypedValue {
    pub fn kind(&self) -> ValueKind {
        match self {
            TypedValue::String(_) => ValueKind::String,
            TypedValue::ExpandableString(_) => ValueKind::ExpandableString,
            TypedValue::DWord(_) => ValueKind::DWord,
            TypedValue::QWord(_) => ValueKind::QWord,
            TypedValue::MultiString(_) => ValueKind::MultiString,
        }
    }
}

/// 按类型标签将原始文本编码为 [`TypedValue`]。
///
/// 参数：
/// - `kind`：类型标签
/// - `raw`：原始文本
///
/// 返回值：
/// - `multistring`：按 `,` 朴素拆分，保留空段（空串得到一个空元素）
/// - 其余类型：原始文本原样作为负载
pub fn encode(kind: &str, raw: &str) -> TypedValue {
    match ValueKind::from_tag(kind) {
        ValueKind::String => TypedValue::String(raw.to_string()),
        ValueKind::ExpandableString => TypedValue::ExpandableString(raw.to_string()),
        ValueKind::DWord => TypedValue::DWord(raw.to_string()),
        ValueKind::QWord => TypedValue::QWord(raw.to_string()),
        ValueKind::MultiString => {
            TypedValue::MultiString(raw.split(MULTI_SEPARATOR).map(str::to_string).collect())
        }
    }
}

/// 将 [`TypedValue`] 解码为展示字符串。
///
/// 多字符串仅在元素之间插入 `,`，没有尾随分隔符；零元素得到空串。
pub fn decode(value: &TypedValue) -> String {
    match value {
        TypedValue::String(s)
        | TypedValue::ExpandableString(s)
        | TypedValue::DWord(s)
        | TypedValue::QWord(s) => s.clone(),
        TypedValue::MultiString(items) => items.join(","),
    }
}

/// 将 DWORD 文本解析为 32 位原始位模式。
///
/// 接受无符号（`0..=u32::MAX`）或有符号（`i32`）十进制文本，前后空白忽略。
///
/// 异常处理：
/// - 无法解析时返回 [`BaselineError::InvalidNumber`]
pub fn parse_dword(raw: &str) -> Result<u32> {
    let t = raw.trim();
    t.parse::<u32>()
        .or_else(|_| t.parse::<i32>().map(|v| v as u32))
        .map_err(|_| BaselineError::InvalidNumber {
            kind: "dword",
            raw: raw.to_string(),
        })
}

/// 将 QWORD 文本解析为 64 位原始位模式（规则同 [`parse_dword`]）。
pub fn parse_qword(raw: &str) -> Result<u64> {
    let t = raw.trim();
    t.parse::<u64>()
        .or_else(|_| t.parse::<i64>().map(|v| v as u64))
        .map_err(|_| BaselineError::InvalidNumber {
            kind: "qword",
            raw: raw.to_string(),
        })
}

/// DWORD 的展示形式（有符号十进制）。
pub fn display_dword(bits: u32) -> String {
    (bits as i32).to_string()
}

/// QWORD 的展示形式（有符号十进制）。
pub fn display_qword(bits: u64) -> String {
    (bits as i64).to_string()
}
