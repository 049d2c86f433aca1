//! secedit 命令构造与执行。
//!
//! 说明：
//! - 导出：`secedit /export /cfg "<文件>"`，导出当前本机安全策略到 Roaming 目录下的导出文件，
//!   随后由 [`baseline_core::baseline::BaselineLookup`] 按标记查询
//! - 应用：`secedit /configure /db "<数据库>" /cfg "<模板>"`，需要管理员权限
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::Path;

use anyhow::Result;
use baseline_core::config::{self, AssistantConfig};
use tracing::{info, warn};

use crate::process::{CommandRunner, WindowStyle};

/// 构造导出命令。
pub fn export_command(cfg: &Path) -> String {
    format!("secedit /export /cfg \"{}\"", cfg.display())
}

/// 构造应用模板命令。
pub fn configure_command(db: &Path, cfg: &Path) -> String {
    format!("secedit /configure /db \"{}\" /cfg \"{}\"", db.display(), cfg.display())
}

/// 导出本机安全策略到配置中的导出文件。
///
/// 返回值：
/// - secedit 的退出码（启动失败为 [`crate::process::LAUNCH_FAILED`]）
///
/// 异常处理：
/// - Roaming 目录创建失败时返回错误（此时不执行命令）
pub fn export_baseline(runner: &CommandRunner, config: &AssistantConfig) -> Result<i32> {
    config::ensure_dir(&config.roaming_dir)?;
    let target = config.export_path();
    let code = runner.run(&export_command(&target), true, WindowStyle::Hidden);
    if code == 0 {
        info!(path = %target.display(), "安全策略已导出");
    } else {
        warn!(path = %target.display(), code, "secedit 导出返回非零退出码");
    }
    Ok(code)
}

/// 应用安全模板。
///
/// 返回值：
/// - secedit 的退出码（启动失败为 [`crate::process::LAUNCH_FAILED`]）
pub fn apply_baseline(runner: &CommandRunner, db: &Path, cfg: &Path) -> i32 {
    let code = runner.run(&configure_command(db, cfg), true, WindowStyle::Hidden);
    if code != 0 {
        warn!(cfg = %cfg.display(), code, "secedit 应用模板返回非零退出码");
    }
    code
}
