//! Windows 基线助手命令行入口。
//!
//! 职责：
//! - 读取运行配置（可选 JSON 覆盖文件），构造各组件
//! - 注册表单值读写、登录自启动开关
//! - 执行外部命令、导出本机安全策略、按标记查询导出结果
//! - 环境自检（管理员权限、系统版本）
//!
//! 展示约定：
//! - 读取类命令只输出展示文本；“未设置”等缺失标记在这里才转为文字
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context, Result};
use baseline_core::baseline::BaselineLookup;
use baseline_core::config::AssistantConfig;
use baseline_windows::process::{CommandRunner, WindowStyle};
use baseline_windows::{secedit, system};
use clap::{Parser, Subcommand};

/// 命令行参数。
#[derive(Debug, Parser)]
#[command(name = "baseline-assistant", version)]
struct Cli {
    /// JSON 配置覆盖文件。
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// 支持的子命令。
#[derive(Debug, Subcommand)]
enum Commands {
    /// 读取注册表值，例如 `get "HKEY_LOCAL_MACHINE\SOFTWARE\Foo" Bar`。
    Get { path: String, name: String },
    /// 写入注册表值（子键不存在时创建）。
    Set {
        path: String,
        name: String,
        value: String,
        /// 类型标签：string/expandstring/dword/qword/multistring。
        #[arg(long, default_value = "string")]
        kind: String,
    },
    /// 登录自启动。
    Startup {
        #[command(subcommand)]
        action: StartupAction,
    },
    /// 在安装目录下执行命令并输出退出码。
    Run {
        command: String,
        #[arg(long, default_value_t = false)]
        hide: bool,
        /// 窗口状态：normal/hidden/minimized/maximized。
        #[arg(long, default_value = "normal")]
        style: WindowStyle,
    },
    /// 导出本机安全策略到 Roaming 目录。
    Export,
    /// 按标记查询导出结果。
    Lookup {
        mark: String,
        #[arg(long, default_value_t = false)]
        json: bool,
    },
    /// 环境自检。
    Doctor,
}

#[derive(Debug, Subcommand)]
enum StartupAction {
    Status,
    Enable,
    Disable,
}

/// 程序入口：初始化日志、加载配置并分发子命令。
fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(
                    "info"
                        .parse::<tracing_subscriber::filter::Directive>()
                        .context("解析日志过滤指令失败")?,
                ),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    // 注册表读写不依赖配置，只有需要目录/产品名的命令才加载。
    let config_path = cli.config;
    let config = || load_config(config_path.as_deref());
    match cli.command {
        Commands::Get { path, name } => get(&path, &name),
        Commands::Set {
            path,
            name,
            value,
            kind,
        } => set(&path, &name, &value, &kind),
        Commands::Startup { action } => startup(&config()?, action),
        Commands::Run {
            command,
            hide,
            style,
        } => {
            let code = CommandRunner::from_config(&config()?).run(&command, hide, style);
            println!("{code}");
            Ok(())
        }
        Commands::Export => export(&config()?),
        Commands::Lookup { mark, json } => lookup(&config()?, &mark, json),
        Commands::Doctor => doctor(&config()?),
    }
}

fn load_config(path: Option<&Path>) -> Result<AssistantConfig> {
    match path {
        Some(path) => AssistantConfig::load(path),
        None => AssistantConfig::from_env(),
    }
}

#[cfg(windows)]
fn get(path: &str, name: &str) -> Result<()> {
    use baseline_windows::registry::RegistryStore;

    let read = RegistryStore::new().get_value_at(path, name)?;
    println!("{}", read.display());
    Ok(())
}

#[cfg(windows)]
fn set(path: &str, name: &str, value: &str, kind: &str) -> Result<()> {
    use baseline_windows::registry::RegistryStore;

    RegistryStore::new()
        .set_value_at(path, name, value, kind)
        .with_context(|| format!("写入注册表失败: {path}\\{name}"))?;
    tracing::info!(%path, %name, %kind, "已写入");
    Ok(())
}

#[cfg(windows)]
fn startup(config: &AssistantConfig, action: StartupAction) -> Result<()> {
    use baseline_windows::startup::StartupRegistrar;

    let registrar = StartupRegistrar::from_config(config);
    match action {
        StartupAction::Status => {}
        StartupAction::Enable => registrar.set_registered_for_startup(true)?,
        StartupAction::Disable => registrar.set_registered_for_startup(false)?,
    }
    println!("{}", registrar.is_registered_for_startup());
    Ok(())
}

#[cfg(not(windows))]
fn get(_path: &str, _name: &str) -> Result<()> {
    Err(anyhow!("注册表读取仅支持 Windows"))
}

#[cfg(not(windows))]
fn set(_path: &str, _name: &str, _value: &str, _kind: &str) -> Result<()> {
    Err(anyhow!("注册表写入仅支持 Windows"))
}

#[cfg(not(windows))]
fn startup(_config: &AssistantConfig, _action: StartupAction) -> Result<()> {
    Err(anyhow!("登录自启动仅支持 Windows"))
}

fn export(config: &AssistantConfig) -> Result<()> {
    let code = secedit::export_baseline(&CommandRunner::from_config(config), config)?;
    if code != 0 {
        return Err(anyhow!("secedit 导出失败，退出码 {code}"));
    }
    println!("{}", config.export_path().display());
    Ok(())
}

fn lookup(config: &AssistantConfig, mark: &str, json: bool) -> Result<()> {
    let lookup = BaselineLookup::from_config(config);
    if json {
        let hit = lookup.lookup(mark);
        println!("{}", serde_json::to_string(&hit).context("序列化查询结果失败")?);
        return Ok(());
    }
    let (section, value) = lookup.find_by_mark(mark);
    println!("{section}\t{value}");
    Ok(())
}

fn doctor(config: &AssistantConfig) -> Result<()> {
    println!("os = {}", system::os_description().unwrap_or_else(|| "未知".to_string()));
    #[cfg(windows)]
    println!("admin = {}", baseline_windows::elevation::is_running_as_admin());
    println!("ipv4 = {}", system::ipv4_addresses().join(","));
    println!("install_dir = {}", config.install_dir.display());
    println!("export_file = {}", config.export_path().display());
    println!("export_exists = {}", config.export_path().is_file());
    Ok(())
}
