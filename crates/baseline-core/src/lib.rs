//! Windows 基线助手核心库（平台无关）。
//!
//! 功能：
//! - 注册表完整路径解析（根键 + 子键路径）
//! - 注册表值类型标签与文本值之间的编解码
//! - secedit 导出文件（分节键值文本）的解析与按标记查询
//! - 运行配置（安装目录、Roaming 目录、产品名等）与统一错误类型
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

pub mod baseline;
pub mod config;
pub mod error;
pub mod keypath;
pub mod value;
