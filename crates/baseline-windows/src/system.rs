//! 本机系统信息。
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::net::IpAddr;

use sysinfo::System;
use tracing::debug;

/// 操作系统描述与架构，例如 `Windows 11 Pro 23H2 x86_64`。
///
/// 返回值：
/// - 无法读取系统版本时返回 `None`
pub fn os_description() -> Option<String> {
    let desc = System::long_os_version().or_else(System::name)?;
    Some(format!("{desc} {}", std::env::consts::ARCH))
}

/// 本机已分配地址的网卡上的 IPv4 地址（不含回环地址），按枚举顺序去重。
///
/// 返回值：
/// - 枚举网卡失败时返回空列表（并记录 debug 日志）
pub fn ipv4_addresses() -> Vec<String> {
    match if_addrs::get_if_addrs() {
        Ok(interfaces) => select_ipv4(interfaces.iter().map(|i| (i.is_loopback(), i.ip()))),
        Err(e) => {
            debug!(error = %e, "枚举网卡失败");
            Vec::new()
        }
    }
}

/// 从 `(是否回环, 地址)` 序列中挑出非回环 IPv4 地址。
fn select_ipv4(addrs: impl IntoIterator<Item = (bool, IpAddr)>) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for (loopback, addr) in addrs {
        let IpAddr::V4(v4) = addr else {
            continue;
        };
        if loopback || v4.is_loopback() {
            continue;
        }
        let text = v4.to_string();
        if !out.contains(&text) {
            out.push(text);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    #[test]
    fn keeps_only_non_loopback_ipv4_once() {
        let addrs = [
            (true, IpAddr::V4(Ipv4Addr::LOCALHOST)),
            (false, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
            (false, IpAddr::V6(Ipv6Addr::new(0xfe80, 0, 0, 0, 0, 0, 0, 1))),
            (false, IpAddr::V4(Ipv4Addr::new(10, 0, 0, 5))),
            (false, IpAddr::V4(Ipv4Addr::new(192, 168, 1, 20))),
        ];
        assert_eq!(select_ipv4(addrs), ["192.168.1.20", "10.0.0.5"]);
    }

    #[test]
    fn live_enumeration_excludes_loopback() {
        let addrs = ipv4_addresses();
        assert!(addrs.iter().all(|a| !a.starts_with("127.")), "{addrs:?}");
    }
}
