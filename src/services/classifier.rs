//! 文档分类服务 - 业务能力层
//!
//! 只负责"读一份 CT-e，取出发行方 CNPJ 和签发日期"，不关心文件放到哪里。

use crate::config::{Config, DatePolicy};
use crate::error::ClassificationError;
use crate::models::Classification;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::fs;
use std::path::Path;

const ISSUER_FIELD: &str = "emit/CNPJ";
const TIMESTAMP_FIELD: &str = "ide/dhEmi";

/// 文档分类器
///
/// 要么返回完整的 (发行方, 日期)，要么返回错误，不会有半成品。
pub struct DocumentClassifier {
    namespace: String,
    date_policy: DatePolicy,
    issuer_pattern: Regex,
    date_pattern: Regex,
    /// 错误区和重复区的目录名，不能当作发行方
    reserved_names: [String; 2],
}

impl DocumentClassifier {
    pub fn new(config: &Config) -> Result<Self, regex::Error> {
        Ok(Self {
            namespace: config.namespace.clone(),
            date_policy: config.date_policy,
            // 发行方标识会直接作为目录名，只接受单段安全路径
            issuer_pattern: Regex::new(r"^[0-9A-Za-z][0-9A-Za-z._-]*$")?,
            date_pattern: Regex::new(r"^\d{4}-\d{2}-\d{2}$")?,
            reserved_names: [
                config.errors_dir_name.clone(),
                config.duplicates_dir_name.clone(),
            ],
        })
    }

    /// 读取并分类一个文件
    pub fn classify(&self, path: &Path) -> Result<Classification, ClassificationError> {
        let content = fs::read_to_string(path).map_err(|source| ClassificationError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        self.classify_content(path, &content)
    }

    /// 分类已读入内存的文档；`path` 只用于错误信息
    pub fn classify_content(
        &self,
        path: &Path,
        content: &str,
    ) -> Result<Classification, ClassificationError> {
        let doc = roxmltree::Document::parse(content.trim_start_matches('\u{feff}')).map_err(
            |source| ClassificationError::Parse {
                path: path.to_path_buf(),
                source,
            },
        )?;

        let ns = self.namespace.as_str();
        if !doc
            .descendants()
            .any(|n| n.is_element() && n.tag_name().namespace() == Some(ns))
        {
            return Err(ClassificationError::NamespaceMissing {
                path: path.to_path_buf(),
                namespace: self.namespace.clone(),
            });
        }

        let issuer_id = find_child_text(&doc, ns, "emit", "CNPJ").ok_or_else(|| {
            ClassificationError::FieldMissing {
                path: path.to_path_buf(),
                field: ISSUER_FIELD,
            }
        })?;
        let timestamp = find_child_text(&doc, ns, "ide", "dhEmi").ok_or_else(|| {
            ClassificationError::FieldMissing {
                path: path.to_path_buf(),
                field: TIMESTAMP_FIELD,
            }
        })?;

        if !self.issuer_pattern.is_match(&issuer_id) || self.reserved_names.contains(&issuer_id) {
            return Err(ClassificationError::InvalidIssuer {
                path: path.to_path_buf(),
                value: issuer_id,
            });
        }

        let issue_date = self.issue_date(&timestamp).ok_or_else(|| {
            ClassificationError::InvalidDate {
                path: path.to_path_buf(),
                value: timestamp.clone(),
            }
        })?;

        Ok(Classification::new(issuer_id, issue_date))
    }

    /// 按配置的策略从 dhEmi 得到 `YYYY-MM-DD`
    fn issue_date(&self, timestamp: &str) -> Option<String> {
        let date = match self.date_policy {
            DatePolicy::Truncate => timestamp.split('T').next()?.to_string(),
            DatePolicy::Utc => DateTime::parse_from_rfc3339(timestamp)
                .ok()?
                .with_timezone(&Utc)
                .format("%Y-%m-%d")
                .to_string(),
        };
        self.date_pattern.is_match(&date).then_some(date)
    }
}

/// 等价于 `.//ns:parent/ns:child` 的第一个匹配的文本
fn find_child_text(
    doc: &roxmltree::Document<'_>,
    ns: &str,
    parent: &str,
    child: &str,
) -> Option<String> {
    doc.descendants()
        .filter(|n| n.has_tag_name((ns, parent)))
        .flat_map(|n| n.children())
        .find(|c| c.has_tag_name((ns, child)))
        .and_then(|c| c.text())
        .map(|t| t.trim().to_string())
        .filter(|t| !t.is_empty())
}
