//! 运行配置与目录约定。
//!
//! 目标：
//! - 将安装目录、Roaming 配置目录、产品名等“进程级全局状态”集中为一个显式配置值
//! - 各组件在构造时接收配置，便于测试时注入临时目录
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use serde::{Deserialize, Serialize};

/// Roaming 目录下的产品目录名，同时作为缺省产品名。
///
/// 示例（默认）：
/// - `%APPDATA%\WindowsBaselineAssistant`
pub const VENDOR_DIR: &str = "WindowsBaselineAssistant";

/// secedit 导出文件的缺省文件名。
pub const DEFAULT_EXPORT_FILE: &str = "config.cfg";

/// 当前用户登录自启动列表（位于 HKCU 下）。
pub const RUN_KEY: &str = "SOFTWARE\\Microsoft\\Windows\\CurrentVersion\\Run";

/// 运行配置。
///
/// 字段说明：
/// - `product_name`：产品名（自启动项的值名）
/// - `executable_path`：本程序可执行文件路径（自启动项的值）
/// - `install_dir`：安装目录（外部命令的工作目录）
/// - `roaming_dir`：当前用户 Roaming 下的产品目录（secedit 导出文件所在目录）
/// - `export_file_name`：导出文件名
/// - `run_key`：HKCU 下的自启动子键路径
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssistantConfig {
    pub product_name: String,
    pub executable_path: PathBuf,
    pub install_dir: PathBuf,
    pub roaming_dir: PathBuf,
    pub export_file_name: String,
    pub run_key: String,
}

/// JSON 覆盖文件的结构；缺失字段沿用缺省配置。
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConfigOverrides {
    pub product_name: Option<String>,
    pub executable_path: Option<PathBuf>,
    pub install_dir: Option<PathBuf>,
    pub roaming_dir: Option<PathBuf>,
    pub export_file_name: Option<String>,
    pub run_key: Option<String>,
}

impl AssistantConfig {
    /// 由可执行文件路径与 Roaming 根目录构造缺省配置。
    ///
    /// 参数：
    /// - `executable_path`：本程序路径；其父目录作为安装目录
    /// - `roaming_root`：Roaming 根目录（`%APPDATA%`）
    pub fn with_roots(executable_path: PathBuf, roaming_root: &Path) -> Self {
        let install_dir = executable_path
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."));
        Self {
            product_name: VENDOR_DIR.to_string(),
            executable_path,
            install_dir,
            roaming_dir: roaming_root.join(VENDOR_DIR),
            export_file_name: DEFAULT_EXPORT_FILE.to_string(),
            run_key: RUN_KEY.to_string(),
        }
    }

    /// 从当前进程环境构造缺省配置。
    ///
    /// 异常处理：
    /// - 无法获取当前可执行文件路径，或环境变量 `APPDATA` 不存在时返回错误
    pub fn from_env() -> Result<Self> {
        Self::from_overrides(ConfigOverrides::default())
    }

    /// 读取 JSON 覆盖文件并叠加到缺省配置上。
    ///
    /// 异常处理：
    /// - 文件读取失败、JSON 解析失败（包括未知字段）或缺省配置构造失败时返回错误
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("读取配置文件失败: {}", path.display()))?;
        let overrides: ConfigOverrides = serde_json::from_slice(&bytes)
            .with_context(|| format!("解析配置文件 JSON 失败: {}", path.display()))?;
        Self::from_overrides(overrides)
    }

    /// 由覆盖项构造配置，只在覆盖项缺失时才读取进程环境。
    ///
    /// 说明：
    /// - 提供了 `roaming_dir` 时不需要 `APPDATA`
    /// - 提供了 `executable_path` 时不读取当前可执行文件路径
    ///
    /// 异常处理：
    /// - 需要的环境信息不可用时返回错误
    pub fn from_overrides(overrides: ConfigOverrides) -> Result<Self> {
        let executable_path = match &overrides.executable_path {
            Some(p) => p.clone(),
            None => std::env::current_exe().context("获取当前可执行文件路径失败")?,
        };
        let base = match &overrides.roaming_dir {
            Some(dir) => {
                let mut c = Self::with_roots(executable_path, Path::new(""));
                c.roaming_dir = dir.clone();
                c
            }
            None => {
                let appdata = std::env::var_os("APPDATA").ok_or_else(|| anyhow!("读取 APPDATA 环境变量失败"))?;
                Self::with_roots(executable_path, Path::new(&appdata))
            }
        };
        Ok(base.apply(overrides))
    }

    /// 叠加覆盖项。
    pub fn apply(mut self, o: ConfigOverrides) -> Self {
        if let Some(v) = o.product_name {
            self.product_name = v;
        }
        if let Some(v) = o.executable_path {
            self.executable_path = v;
        }
        if let Some(v) = o.install_dir {
            self.install_dir = v;
        }
        if let Some(v) = o.roaming_dir {
            self.roaming_dir = v;
        }
        if let Some(v) = o.export_file_name {
            self.export_file_name = v;
        }
        if let Some(v) = o.run_key {
            self.run_key = v;
        }
        self
    }

    /// secedit 导出文件的完整路径。
    pub fn export_path(&self) -> PathBuf {
        self.roaming_dir.join(&self.export_file_name)
    }
}

/// 确保目录存在（不存在则递归创建）。
///
/// 异常处理：
/// - 目录创建失败（权限、路径非法等）会返回错误。
pub fn ensure_dir(path: &Path) -> Result<()> {
    std::fs::create_dir_all(path).with_context(|| format!("创建目录失败: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> AssistantConfig {
        AssistantConfig::with_roots(Path::new("tools").join("baseline.exe"), Path::new("roaming"))
    }

    #[test]
    fn defaults_derive_from_roots() {
        let c = sample();
        assert_eq!(c.product_name, VENDOR_DIR);
        assert_eq!(c.install_dir, PathBuf::from("tools"));
        assert_eq!(c.roaming_dir, Path::new("roaming").join(VENDOR_DIR));
        assert_eq!(c.export_path(), Path::new("roaming").join(VENDOR_DIR).join(DEFAULT_EXPORT_FILE));
        assert_eq!(c.run_key, RUN_KEY);
    }

    #[test]
    fn overrides_replace_only_given_fields() {
        let o: ConfigOverrides = serde_json::from_str(r#"{ "product_name": "Other", "export_file_name": "x.inf" }"#).unwrap();
        let c = sample().apply(o);
        assert_eq!(c.product_name, "Other");
        assert_eq!(c.export_file_name, "x.inf");
        assert_eq!(c.run_key, RUN_KEY);
    }

    #[test]
    fn overrides_with_roaming_dir_need_no_environment() {
        let o = ConfigOverrides {
            executable_path: Some(Path::new("bin").join("baseline.exe")),
            roaming_dir: Some(PathBuf::from("custom")),
            ..ConfigOverrides::default()
        };
        let c = AssistantConfig::from_overrides(o).unwrap();
        assert_eq!(c.install_dir, PathBuf::from("bin"));
        assert_eq!(c.roaming_dir, PathBuf::from("custom"));
        assert_eq!(c.export_path(), Path::new("custom").join(DEFAULT_EXPORT_FILE));
    }

    #[test]
    fn unknown_override_field_is_rejected() {
        assert!(serde_json::from_str::<ConfigOverrides>(r#"{ "nope": 1 }"#).is_err());
    }
}
