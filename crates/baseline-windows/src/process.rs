//! 外部命令执行（通过命令行解释器 `/c` 一次性执行）。
//!
//! 实现策略：
//! - Windows：`CreateProcessW` 启动 `cmd.exe /c <命令>`，可控制是否创建窗口与窗口状态
//! - 其他平台：`sh -c <命令>`，窗口参数忽略
//! - 工作目录固定为构造时注入的安装目录，与调用方进程的当前目录无关
//! - 同步等待子进程退出，没有超时；子进程标准输入/输出/错误指向空设备，不与调用方相连，只返回退出码
//! - 启动或等待失败时记录错误日志并返回 [`LAUNCH_FAILED`]，不向上抛出
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::Result;
use baseline_core::config::AssistantConfig;
use tracing::{debug, error};

/// 启动或等待失败时返回的退出码。
pub const LAUNCH_FAILED: i32 = -1;

/// 子进程窗口状态。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum WindowStyle {
    #[default]
    Normal,
    Hidden,
    Minimized,
    Maximized,
}

impl FromStr for WindowStyle {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "normal" => Ok(WindowStyle::Normal),
            "hidden" => Ok(WindowStyle::Hidden),
            "minimized" => Ok(WindowStyle::Minimized),
            "maximized" => Ok(WindowStyle::Maximized),
            other => Err(format!("未知窗口状态: {other}（可选 normal/hidden/minimized/maximized）")),
        }
    }
}

/// 一次命令执行的全部参数。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandInvocation {
    pub command_line: String,
    /// 为 `true` 时不创建控制台窗口。
    pub hide_window: bool,
    pub window_style: WindowStyle,
    pub working_directory: PathBuf,
}

/// 外部命令执行器。
#[derive(Debug, Clone)]
pub struct CommandRunner {
    working_directory: PathBuf,
}

impl CommandRunner {
    /// 参数：
    /// - `working_directory`：所有命令的工作目录
    pub fn new(working_directory: impl Into<PathBuf>) -> Self {
        Self {
            working_directory: working_directory.into(),
        }
    }

    /// 以安装目录为工作目录。
    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(&config.install_dir)
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// 执行命令并等待退出。
    ///
    /// 参数：
    /// - `command_line`：交给解释器 `/c` 执行的命令行
    /// - `hide_window`：是否不创建窗口
    /// - `style`：窗口状态
    ///
    /// 返回值：
    /// - 子进程退出码；启动/等待失败时为 [`LAUNCH_FAILED`]
    pub fn run(&self, command_line: &str, hide_window: bool, style: WindowStyle) -> i32 {
        let invocation = CommandInvocation {
            command_line: command_line.to_string(),
            hide_window,
            window_style: style,
            working_directory: self.working_directory.clone(),
        };
        self.execute(&invocation)
    }

    /// 执行一次完整描述的调用。
    pub fn execute(&self, invocation: &CommandInvocation) -> i32 {
        match spawn_and_wait(invocation) {
            Ok(code) => {
                debug!(command = %invocation.command_line, code, "外部命令已退出");
                code
            }
            Err(e) => {
                error!(
                    command = %invocation.command_line,
                    cwd = %invocation.working_directory.display(),
                    error = %format!("{e:#}"),
                    "执行外部命令失败"
                );
                LAUNCH_FAILED
            }
        }
    }
}

#[cfg(windows)]
fn spawn_and_wait(invocation: &CommandInvocation) -> Result<i32> {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;

    use anyhow::Context;
    use windows::core::{PCWSTR, PWSTR};
    use windows::Win32::Foundation::{CloseHandle, BOOL, HANDLE, WAIT_FAILED};
    use windows::Win32::Security::SECURITY_ATTRIBUTES;
    use windows::Win32::Storage::FileSystem::{
        CreateFileW, FILE_ATTRIBUTE_NORMAL, FILE_GENERIC_READ, FILE_GENERIC_WRITE,
        FILE_SHARE_READ, FILE_SHARE_WRITE, OPEN_EXISTING,
    };
    use windows::Win32::System::Threading::{
        CreateProcessW, GetExitCodeProcess, WaitForSingleObject, CREATE_NO_WINDOW, INFINITE,
        PROCESS_CREATION_FLAGS, PROCESS_INFORMATION, STARTF_USESHOWWINDOW, STARTF_USESTDHANDLES,
        STARTUPINFOW,
    };
    use windows::Win32::UI::WindowsAndMessaging::{
        SW_HIDE, SW_SHOWMAXIMIZED, SW_SHOWMINIMIZED, SW_SHOWNORMAL,
    };

    /// 句柄守卫：离开作用域时关闭句柄。
    struct HandleGuard(HANDLE);
    impl Drop for HandleGuard {
        fn drop(&mut self) {
            if !self.0.is_invalid() {
                unsafe {
                    let _ = CloseHandle(self.0);
                }
            }
        }
    }

    fn to_wide(s: &OsStr) -> Vec<u16> {
        s.encode_wide().chain(std::iter::once(0)).collect()
    }

    // 子进程的标准输入/输出/错误都指向可继承的 NUL 设备，不与调用方控制台相连。
    let inheritable = SECURITY_ATTRIBUTES {
        nLength: std::mem::size_of::<SECURITY_ATTRIBUTES>() as u32,
        lpSecurityDescriptor: std::ptr::null_mut(),
        bInheritHandle: BOOL::from(true),
    };
    let nul_name = to_wide(OsStr::new("NUL"));
    let nul = unsafe {
        CreateFileW(
            PCWSTR(nul_name.as_ptr()),
            (FILE_GENERIC_READ | FILE_GENERIC_WRITE).0,
            FILE_SHARE_READ | FILE_SHARE_WRITE,
            Some(&inheritable),
            OPEN_EXISTING,
            FILE_ATTRIBUTE_NORMAL,
            HANDLE::default(),
        )
    }
    .context("打开 NUL 设备失败")?;
    let _nul = HandleGuard(nul);

    let show = match invocation.window_style {
        WindowStyle::Normal => SW_SHOWNORMAL,
        WindowStyle::Hidden => SW_HIDE,
        WindowStyle::Minimized => SW_SHOWMINIMIZED,
        WindowStyle::Maximized => SW_SHOWMAXIMIZED,
    };
    let startup = STARTUPINFOW {
        cb: std::mem::size_of::<STARTUPINFOW>() as u32,
        dwFlags: STARTF_USESHOWWINDOW | STARTF_USESTDHANDLES,
        wShowWindow: show.0 as u16,
        hStdInput: nul,
        hStdOutput: nul,
        hStdError: nul,
        ..Default::default()
    };
    let flags = if invocation.hide_window {
        CREATE_NO_WINDOW
    } else {
        PROCESS_CREATION_FLAGS(0)
    };

    // CreateProcessW 可能改写命令行缓冲区，必须是可写的 NUL 结尾宽字符串。
    let mut command_line = to_wide(OsStr::new(&format!("cmd.exe /c {}", invocation.command_line)));
    let cwd = to_wide(invocation.working_directory.as_os_str());
    let mut info = PROCESS_INFORMATION::default();

    unsafe {
        CreateProcessW(
            PCWSTR::null(),
            PWSTR(command_line.as_mut_ptr()),
            None,
            None,
            BOOL::from(true),
            flags,
            None,
            PCWSTR(cwd.as_ptr()),
            &startup,
            &mut info,
        )
        .with_context(|| format!("启动 cmd.exe 失败，工作目录: {}", invocation.working_directory.display()))?;
        let _process = HandleGuard(info.hProcess);
        let _thread = HandleGuard(info.hThread);

        if WaitForSingleObject(info.hProcess, INFINITE) == WAIT_FAILED {
            return Err(std::io::Error::last_os_error()).context("等待子进程退出失败");
        }
        let mut code = 0u32;
        GetExitCodeProcess(info.hProcess, &mut code).context("读取子进程退出码失败")?;
        Ok(code as i32)
    }
}

#[cfg(not(windows))]
fn spawn_and_wait(invocation: &CommandInvocation) -> Result<i32> {
    use std::process::{Command, Stdio};

    use anyhow::{anyhow, Context};

    let status = Command::new("sh")
        .arg("-c")
        .arg(&invocation.command_line)
        .current_dir(&invocation.working_directory)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .with_context(|| format!("启动 sh 失败，工作目录: {}", invocation.working_directory.display()))?;
    status
        .code()
        .ok_or_else(|| anyhow!("子进程被信号终止: {status}"))
}
