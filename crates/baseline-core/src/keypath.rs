//! 注册表完整路径解析。
//!
//! 输入形如 `HKEY_CURRENT_USER\Software\Foo` 的完整路径，在第一个 `\` 处拆分为
//! 根键选择符与子键路径。根键按子串包含关系选择，规则自上而下逐条判断，
//! 后命中的规则覆盖先命中的规则（例如 `HKEY_USERS` 同时包含 `USER` 与 `USERS`，最终为 [`HiveId::Users`]）。
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::fmt;

use crate::error::{BaselineError, Result};

/// 路径分隔符。
pub const SEPARATOR: char = '\\';

/// 注册表根键。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HiveId {
    /// HKEY_LOCAL_MACHINE（未命中任何规则时的缺省值）。
    LocalMachine,
    /// HKEY_CURRENT_USER。
    CurrentUser,
    /// HKEY_CLASSES_ROOT。
    ClassesRoot,
    /// HKEY_USERS。
    Users,
    /// HKEY_CURRENT_CONFIG。
    CurrentConfig,
}

impl HiveId {
    /// 缩写形式（用于日志与错误信息）。
    pub fn short_name(self) -> &'static str {
        match self {
            HiveId::LocalMachine => "HKLM",
            HiveId::CurrentUser => "HKCU",
            HiveId::ClassesRoot => "HKCR",
            HiveId::Users => "HKU",
            HiveId::CurrentConfig => "HKCC",
        }
    }
}

impl fmt::Display for HiveId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// 根键选择规则，按顺序全部判断，后命中者覆盖先命中者。
const HIVE_RULES: &[(&str, HiveId)] = &[
    ("USER", HiveId::CurrentUser),
    ("ROOT", HiveId::ClassesRoot),
    ("USERS", HiveId::Users),
    ("CONFIG", HiveId::CurrentConfig),
];

/// 已解析的注册表路径。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyPath {
    pub hive: HiveId,
    /// 子键路径（原样保留，不做尾部/重复分隔符归一化）。
    pub sub_path: String,
}

impl KeyPath {
    /// 直接构造（不经过字符串解析）。
    pub fn new(hive: HiveId, sub_path: impl Into<String>) -> Self {
        Self {
            hive,
            sub_path: sub_path.into(),
        }
    }
}

impl fmt::Display for KeyPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.hive, SEPARATOR, self.sub_path)
    }
}

/// 将完整路径解析为 [`KeyPath`]。
///
/// 参数：
/// - `full_path`：完整路径，例如 `HKEY_LOCAL_MACHINE\SYSTEM\CurrentControlSet`
///
/// 返回值：
/// - 根键与第一个分隔符之后的全部内容
///
/// 异常处理：
/// - 不含分隔符或分隔符之后为空时返回 [`BaselineError::MalformedPath`]
pub fn resolve(full_path: &str) -> Result<KeyPath> {
    let (selector, remainder) = full_path
        .split_once(SEPARATOR)
        .ok_or_else(|| BaselineError::MalformedPath(full_path.to_string()))?;
    if remainder.is_empty() {
        return Err(BaselineError::MalformedPath(full_path.to_string()));
    }
    Ok(KeyPath {
        hive: select_hive(selector),
        sub_path: remainder.to_string(),
    })
}

/// 按规则表选择根键。
fn select_hive(selector: &str) -> HiveId {
    HIVE_RULES
        .iter()
        .fold(HiveId::LocalMachine, |hive, (needle, candidate)| {
            if selector.contains(needle) {
                *candidate
            } else {
                hive
            }
        })
}
