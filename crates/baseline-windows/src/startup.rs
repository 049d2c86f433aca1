//! 当前用户登录自启动（HKCU Run）。
//!
//! 说明：
//! - 以产品名为值名、本程序路径为值，写入当前用户的 Run 子键
//! - 每次检查/修改后刷新 HKCU，确保写入落盘
//! - Run 子键不存在时不创建（视为当前环境不支持自启动）
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result};
use baseline_core::config::AssistantConfig;
use tracing::{debug, info, warn};
use windows::Win32::System::Registry::{RegFlushKey, HKEY_CURRENT_USER as HKCU_HANDLE};
use winreg::enums::{HKEY_CURRENT_USER, KEY_READ, KEY_WRITE};
use winreg::RegKey;

/// 存入该字面量的自启动项视为未注册。
const NULL_LITERAL: &str = "null";

/// 登录自启动注册器。
#[derive(Debug, Clone)]
pub struct StartupRegistrar {
    product_name: String,
    executable_path: PathBuf,
    run_key: String,
}

impl StartupRegistrar {
    /// 参数：
    /// - `product_name`：值名
    /// - `executable_path`：写入的程序路径
    /// - `run_key`：HKCU 下的 Run 子键路径
    pub fn new(product_name: impl Into<String>, executable_path: impl Into<PathBuf>, run_key: impl Into<String>) -> Self {
        Self {
            product_name: product_name.into(),
            executable_path: executable_path.into(),
            run_key: run_key.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.product_name, &config.executable_path, &config.run_key)
    }

    /// 是否已注册登录自启动。
    ///
    /// 返回值：
    /// - Run 子键存在、存在以产品名命名的字符串值、且该值不是字面量 `null` 时为 `true`
    /// - 其余情况（包括读取出错）为 `false`
    pub fn is_registered_for_startup(&self) -> bool {
        let current = RegKey::predef(HKEY_CURRENT_USER)
            .open_subkey_with_flags(&self.run_key, KEY_READ)
            .and_then(|key| key.get_value::<String, _>(&self.product_name))
            .ok();
        if let Err(e) = flush_current_user() {
            debug!(error = %format!("{e:#}"), "刷新 HKCU 失败，忽略");
        }
        matches!(current.as_deref(), Some(v) if v != NULL_LITERAL)
    }

    /// 注册或取消登录自启动。
    ///
    /// 参数：
    /// - `enabled`：`true` 写入程序路径；`false` 删除该值（不存在时忽略）
    ///
    /// 异常处理：
    /// - Run 子键不存在：记录警告并直接返回 `Ok`
    /// - 打开子键、写入/删除值或刷新失败：返回错误
    pub fn set_registered_for_startup(&self, enabled: bool) -> Result<()> {
        let hkcu = RegKey::predef(HKEY_CURRENT_USER);
        let key = match hkcu.open_subkey_with_flags(&self.run_key, KEY_READ | KEY_WRITE) {
            Ok(key) => key,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                warn!(run_key = %self.run_key, "自启动子键不存在，跳过");
                return Ok(());
            }
            Err(e) => return Err(e).with_context(|| format!("打开自启动子键失败: HKCU\\{}", self.run_key)),
        };

        if enabled {
            let command = self.executable_path.to_string_lossy().into_owned();
            key.set_value(&self.product_name, &command)
                .with_context(|| format!("写入自启动值失败: {}", self.product_name))?;
            info!(name = %self.product_name, %command, "已注册登录自启动");
        } else {
            match key.delete_value(&self.product_name) {
                Ok(()) => info!(name = %self.product_name, "已取消登录自启动"),
                Err(e) if e.kind() == io::ErrorKind::NotFound => {}
                Err(e) => return Err(e).with_context(|| format!("删除自启动值失败: {}", self.product_name)),
            }
        }

        flush_current_user()
    }
}

/// 刷新 HKCU，确保修改写入磁盘。
fn flush_current_user() -> Result<()> {
    unsafe { RegFlushKey(HKCU_HANDLE) }
        .ok()
        .context("刷新 HKCU 失败")
}
