//! 权限检测（仅检测，不做提权）。
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use windows::Win32::UI::Shell::IsUserAnAdmin;

/// 判断当前进程是否以管理员权限运行。
///
/// 说明：
/// - `secedit /configure` 与写入 HKLM 通常需要管理员权限；该结果仅用于提示
pub fn is_running_as_admin() -> bool {
    unsafe { IsUserAnAdmin().as_bool() }
}
