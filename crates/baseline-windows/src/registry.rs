//! 注册表读写。
//!
//! 主要用途：
//! - 按完整路径（`根键\子键`）读取单个值，转为展示字符串
//! - 按类型标签写入单个值，子键不存在时自动创建
//!
//! 错误处理：
//! - 读取按宽松策略：子键不存在、读取出错都返回 [`RegistryRead::Unavailable`]；
//!   子键存在但值不存在返回 [`RegistryRead::NotSet`]
//! - 写入按严格策略：参数检查与系统调用错误都返回给调用方
//! - 每次读写都直接访问注册表，不做缓存
//!
//! 权限要求：
//! - 写入 HKLM 通常需要管理员权限
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::io;

use baseline_core::error::{BaselineError, ErrorPolicy, Result};
use baseline_core::keypath::{self, HiveId, KeyPath};
use baseline_core::value::{self, TypedValue};
use tracing::debug;
use winreg::enums::{
    RegType, HKEY_CLASSES_ROOT, HKEY_CURRENT_CONFIG, HKEY_CURRENT_USER, HKEY_LOCAL_MACHINE,
    HKEY_USERS, KEY_READ, KEY_WRITE,
};
use winreg::types::{FromRegValue, ToRegValue};
use winreg::{RegKey, RegValue};

/// 值不存在时的展示文本。
pub const NOT_SET_DISPLAY: &str = "未设置";

/// 一次读取的结果。
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryRead {
    /// 读到的值（展示形式，可能为空串）。
    Value(String),
    /// 子键存在，但没有该名称的值。
    NotSet,
    /// 子键不存在或读取出错。
    Unavailable,
}

impl RegistryRead {
    /// 展示文本：值本身、[`NOT_SET_DISPLAY`] 或空串。
    pub fn display(&self) -> &str {
        match self {
            RegistryRead::Value(v) => v,
            RegistryRead::NotSet => NOT_SET_DISPLAY,
            RegistryRead::Unavailable => "",
        }
    }
}

/// 打开根键。
pub fn hive_key(hive: HiveId) -> RegKey {
    RegKey::predef(match hive {
        HiveId::LocalMachine => HKEY_LOCAL_MACHINE,
        HiveId::CurrentUser => HKEY_CURRENT_USER,
        HiveId::ClassesRoot => HKEY_CLASSES_ROOT,
        HiveId::Users => HKEY_USERS,
        HiveId::CurrentConfig => HKEY_CURRENT_CONFIG,
    })
}

/// 注册表存取（无状态，每次调用都访问系统注册表）。
#[derive(Debug, Clone, Copy, Default)]
pub struct RegistryStore;

impl RegistryStore {
    pub fn new() -> Self {
        Self
    }

    /// 读取 `path` 下名为 `name` 的值。
    ///
    /// 参数：
    /// - `path`：已解析的键路径
    /// - `name`：值名
    ///
    /// 返回值：
    /// - 见 [`RegistryRead`]；空的多字符串读作 `Value("")`
    ///
    /// 异常处理：
    /// - `name` 为空时返回 [`BaselineError::ArgumentNull`]（不访问注册表）；其余错误一律降级
    pub fn get_value(&self, path: &KeyPath, name: &str) -> Result<RegistryRead> {
        if name.is_empty() {
            return Err(BaselineError::ArgumentNull("name"));
        }
        ErrorPolicy::Lenient.settle(read_value(path, name), || RegistryRead::Unavailable)
    }

    /// 按完整路径字符串读取；路径格式错误同样降级为 [`RegistryRead::Unavailable`]。
    pub fn get_value_at(&self, full_path: &str, name: &str) -> Result<RegistryRead> {
        if name.is_empty() {
            return Err(BaselineError::ArgumentNull("name"));
        }
        match keypath::resolve(full_path) {
            Ok(path) => self.get_value(&path, name),
            Err(e) => ErrorPolicy::Lenient.settle(Err(e), || RegistryRead::Unavailable),
        }
    }

    /// 按类型标签写入值，子键不存在时创建（含缺失的中间层级）。
    ///
    /// 参数：
    /// - `path`：已解析的键路径
    /// - `name`：值名
    /// - `raw_value`：原始文本
    /// - `kind`：类型标签（见 [`baseline_core::value::ValueKind::from_tag`]）
    ///
    /// 异常处理：
    /// - `name`/`raw_value` 为空：[`BaselineError::ArgumentNull`]
    /// - DWORD/QWORD 文本非数字：[`BaselineError::InvalidNumber`]
    /// - 打开/创建子键或写入失败：[`BaselineError::Registry`]
    pub fn set_value(&self, path: &KeyPath, name: &str, raw_value: &str, kind: &str) -> Result<()> {
        if name.is_empty() {
            return Err(BaselineError::ArgumentNull("name"));
        }
        if raw_value.is_empty() {
            return Err(BaselineError::ArgumentNull("value"));
        }
        let reg_value = to_reg_value(&value::encode(kind, raw_value))?;
        ErrorPolicy::Strict.settle(write_value(path, name, &reg_value), || ())
    }

    /// 按完整路径字符串写入。
    pub fn set_value_at(&self, full_path: &str, name: &str, raw_value: &str, kind: &str) -> Result<()> {
        let path = keypath::resolve(full_path)?;
        self.set_value(&path, name, raw_value, kind)
    }

    /// 以字符串类型写入。
    pub fn set_string(&self, path: &KeyPath, name: &str, raw_value: &str) -> Result<()> {
        self.set_value(path, name, raw_value, "string")
    }
}

fn read_value(path: &KeyPath, name: &str) -> Result<RegistryRead> {
    let key = hive_key(path.hive).open_subkey_with_flags(&path.sub_path, KEY_READ)?;
    let raw = match key.get_raw_value(name) {
        Ok(raw) => raw,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(RegistryRead::NotSet),
        Err(e) => return Err(e.into()),
    };
    Ok(RegistryRead::Value(value::decode(&from_reg_value(&raw)?)))
}

fn write_value(path: &KeyPath, name: &str, reg_value: &RegValue) -> Result<()> {
    let root = hive_key(path.hive);
    let key = match root.open_subkey_with_flags(&path.sub_path, KEY_READ | KEY_WRITE) {
        Ok(key) => key,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            debug!(path = %path, "子键不存在，创建");
            let (key, _disp) = root.create_subkey(&path.sub_path)?;
            key
        }
        Err(e) => return Err(e.into()),
    };
    key.set_raw_value(name, reg_value)?;
    Ok(())
}

/// 将 [`TypedValue`] 转为注册表原始值；数字在此解析。
fn to_reg_value(v: &TypedValue) -> Result<RegValue> {
    Ok(match v {
        TypedValue::String(s) => s.to_reg_value(),
        TypedValue::ExpandableString(s) => RegValue {
            vtype: RegType::REG_EXPAND_SZ,
            ..s.to_reg_value()
        },
        TypedValue::DWord(raw) => value::parse_dword(raw)?.to_reg_value(),
        TypedValue::QWord(raw) => value::parse_qword(raw)?.to_reg_value(),
        TypedValue::MultiString(items) => items.to_reg_value(),
    })
}

/// 将注册表原始值转为 [`TypedValue`]。
///
/// 异常处理：
/// - 不支持的类型（REG_BINARY 等）返回 `InvalidData` 错误，由读取策略降级
fn from_reg_value(raw: &RegValue) -> Result<TypedValue> {
    Ok(match raw.vtype {
        RegType::REG_SZ => TypedValue::String(String::from_reg_value(raw)?),
        RegType::REG_EXPAND_SZ => TypedValue::ExpandableString(String::from_reg_value(raw)?),
        RegType::REG_DWORD => TypedValue::DWord(value::display_dword(u32::from_reg_value(raw)?)),
        RegType::REG_QWORD => TypedValue::QWord(value::display_qword(u64::from_reg_value(raw)?)),
        RegType::REG_MULTI_SZ => TypedValue::MultiString(Vec::<String>::from_reg_value(raw)?),
        ref other => {
            return Err(io::Error::new(
                io::ErrorKind::InvalidData,
                format!("不支持的注册表值类型: {other:?}"),
            )
            .into())
        }
    })
}
