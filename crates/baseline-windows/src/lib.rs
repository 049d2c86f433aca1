//! Windows 平台能力封装（注册表、登录自启动、外部命令、secedit）。
//!
//! 目标：
//! - 将 Windows 专有 API 与系统操作集中封装，避免上层直接依赖 Win32 细节
//! - 读路径宽松降级、写路径严格报错（见 [`baseline_core::error::ErrorPolicy`]）
//!
//! 平台说明：
//! - `registry`/`startup`/`elevation` 仅在 Windows 上编译
//! - `process`/`secedit`/`system` 在其他平台上以等价方式工作（`sh -c`），便于在任意平台验证退出码约定
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

#[cfg(windows)]
pub mod elevation;
pub mod process;
#[cfg(windows)]
pub mod registry;
pub mod secedit;
#[cfg(windows)]
pub mod startup;
pub mod system;
