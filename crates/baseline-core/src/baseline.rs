//! secedit 导出文件的解析与按标记（mark）查询。
//!
//! 文件格式：
//! - `[节名]` 开始一个节，节内为 `键 = 值`
//! - `;` 开头的行为注释，没有 `=` 的行忽略
//! - `secedit /export` 写出的是带 BOM 的 UTF-16LE 文本；同时兼容 UTF-16BE 与 UTF-8
//!
//! 查询语义与 Win32 配置文件读取一致：键名不区分大小写，节内同名键取第一个，
//! 值两侧成对的双引号会被去掉。
//!
//! 作者：Windows 基线助手项目组
//! 创建时间：2026-10-18
//! 修改时间：2026-10-18

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::config::AssistantConfig;

/// 导出文件中的一个节。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineSection {
    pub name: String,
    /// 按文件顺序保存的键值对。
    pub entries: Vec<(String, String)>,
}

impl BaselineSection {
    /// 按键名（不区分大小写）取值，同名取第一个。
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }
}

/// 按文件顺序排列的节序列。
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct BaselineDocument {
    pub sections: Vec<BaselineSection>,
}

/// 一次命中：所在节名与值。
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BaselineHit {
    pub section: String,
    pub value: String,
}

impl BaselineDocument {
    /// 从文件读取并解析。
    ///
    /// 异常处理：
    /// - 文件不存在或不可读时返回错误
    pub fn load(path: &Path) -> Result<Self> {
        let bytes = std::fs::read(path).with_context(|| format!("读取导出文件失败: {}", path.display()))?;
        Ok(Self::parse(&decode_text(&bytes)))
    }

    /// 解析文本内容。第一个节之前的键值行被忽略。
    pub fn parse(text: &str) -> Self {
        let mut sections: Vec<BaselineSection> = Vec::new();
        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with(';') {
                continue;
            }
            if let Some(rest) = line.strip_prefix('[') {
                if let Some(end) = rest.find(']') {
                    sections.push(BaselineSection {
                        name: rest[..end].trim().to_string(),
                        entries: Vec::new(),
                    });
                }
                continue;
            }
            let Some(current) = sections.last_mut() else {
                continue;
            };
            let Some((key, value)) = line.split_once('=') else {
                continue;
            };
            let key = key.trim();
            if key.is_empty() {
                continue;
            }
            current.entries.push((key.to_string(), unquote(value.trim()).to_string()));
        }
        Self { sections }
    }

    /// 按节顺序查找第一个对 `mark` 给出非空值的节。
    pub fn find(&self, mark: &str) -> Option<BaselineHit> {
        self.sections.iter().find_map(|section| {
            section
                .get(mark)
                .filter(|v| !v.is_empty())
                .map(|v| BaselineHit {
                    section: section.name.clone(),
                    value: v.to_string(),
                })
        })
    }
}

/// 基线结果查询（每次查询都重新读取导出文件）。
#[derive(Debug, Clone)]
pub struct BaselineLookup {
    export_path: PathBuf,
}

impl BaselineLookup {
    pub fn new(export_path: impl Into<PathBuf>) -> Self {
        Self {
            export_path: export_path.into(),
        }
    }

    pub fn from_config(config: &AssistantConfig) -> Self {
        Self::new(config.export_path())
    }

    pub fn export_path(&self) -> &Path {
        &self.export_path
    }

    /// 按标记查询。
    ///
    /// 返回值：
    /// - 命中：第一个给出非空值的节
    /// - 未命中或文件不可读：`None`（两者不作区分）
    pub fn lookup(&self, mark: &str) -> Option<BaselineHit> {
        match BaselineDocument::load(&self.export_path) {
            Ok(doc) => doc.find(mark),
            Err(e) => {
                tracing::debug!(error = %format!("{e:#}"), "导出文件不可用");
                None
            }
        }
    }

    /// 按标记查询，返回 `(节名, 值)`；未命中时为 `("", "")`。
    pub fn find_by_mark(&self, mark: &str) -> (String, String) {
        self.lookup(mark)
            .map(|hit| (hit.section, hit.value))
            .unwrap_or_default()
    }
}

/// 按 BOM 识别编码并解码为字符串。
fn decode_text(bytes: &[u8]) -> String {
    match bytes {
        [0xFF, 0xFE, rest @ ..] => decode_utf16(rest, u16::from_le_bytes),
        [0xFE, 0xFF, rest @ ..] => decode_utf16(rest, u16::from_be_bytes),
        [0xEF, 0xBB, 0xBF, rest @ ..] => String::from_utf8_lossy(rest).into_owned(),
        _ => String::from_utf8_lossy(bytes).into_owned(),
    }
}

fn decode_utf16(bytes: &[u8], unit: fn([u8; 2]) -> u16) -> String {
    let units: Vec<u16> = bytes.chunks_exact(2).map(|c| unit([c[0], c[1]])).collect();
    String::from_utf16_lossy(&units)
}

/// 去掉一对包裹值的双引号。
fn unquote(v: &str) -> &str {
    if v.len() >= 2 && v.starts_with('"') && v.ends_with('"') {
        &v[1..v.len() - 1]
    } else {
        v
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "[Unicode]\r\nUnicode=yes\r\n[System Access]\r\nMinimumPasswordAge = 0\r\nNewAdministratorName = \"Administrator\"\r\n; comment = x\r\n[Event Audit]\r\nAuditSystemEvents = 0\r\n[Version]\r\nsignature=\"$CHICAGO$\"\r\nRevision=1\r\n";

    #[test]
    fn parses_sections_in_order() {
        let doc = BaselineDocument::parse(SAMPLE);
        let names: Vec<&str> = doc.sections.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["Unicode", "System Access", "Event Audit", "Version"]);
        assert_eq!(doc.sections[1].entries.len(), 2);
    }

    #[test]
    fn strips_quotes_and_whitespace() {
        let doc = BaselineDocument::parse(SAMPLE);
        let hit = doc.find("NewAdministratorName").unwrap();
        assert_eq!(hit.section, "System Access");
        assert_eq!(hit.value, "Administrator");
        assert_eq!(doc.find("signature").unwrap().value, "$CHICAGO$");
    }

    #[test]
    fn key_match_ignores_case() {
        let doc = BaselineDocument::parse(SAMPLE);
        assert_eq!(doc.find("minimumpasswordage").unwrap().value, "0");
    }

    #[test]
    fn first_section_with_non_empty_value_wins() {
        let doc = BaselineDocument::parse("[A]\nX=\n[B]\nX=1\n[C]\nX=2\n");
        assert_eq!(
            doc.find("X"),
            Some(BaselineHit {
                section: "B".into(),
                value: "1".into()
            })
        );
    }

    #[test]
    fn first_key_occurrence_inside_section_wins() {
        // A 中第一个 X 为空，同节后续的 X=1 不参与；命中落到 B。
        let doc = BaselineDocument::parse("[A]\nX=\nX=1\n[B]\nX=2\n");
        assert_eq!(doc.sections[0].get("X"), Some(""));
        let hit = doc.find("X").unwrap();
        assert_eq!(hit.section, "B");
        assert_eq!(hit.value, "2");
    }

    #[test]
    fn comment_and_orphan_lines_are_ignored() {
        let doc = BaselineDocument::parse("X=0\n[A]\n;X=1\nno equals here\n");
        assert_eq!(doc.find("X"), None);
    }

    #[test]
    fn decodes_utf16le_with_bom() {
        let mut bytes = vec![0xFF, 0xFE];
        for u in "[Section1]\r\nA=1\r\n".encode_utf16() {
            bytes.extend_from_slice(&u.to_le_bytes());
        }
        let doc = BaselineDocument::parse(&decode_text(&bytes));
        assert_eq!(doc.find("A").unwrap().section, "Section1");
    }

    #[test]
    fn decodes_utf16be_with_bom() {
        let mut bytes = vec![0xFE, 0xFF];
        for u in "[Section1]\r\nA=1\r\n".encode_utf16() {
            bytes.extend_from_slice(&u.to_be_bytes());
        }
        let hit = BaselineDocument::parse(&decode_text(&bytes)).find("A").unwrap();
        assert_eq!(hit.section, "Section1");
        assert_eq!(hit.value, "1");
    }

    #[test]
    fn decodes_utf8_with_bom() {
        let mut bytes = vec![0xEF, 0xBB, 0xBF];
        bytes.extend_from_slice("[S]\nK=v\n".as_bytes());
        assert_eq!(decode_text(&bytes), "[S]\nK=v\n");
    }
}
