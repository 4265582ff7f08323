//! 批量分拣器 - 编排层
//!
//! ## 职责
//!
//! 1. **扫描**：递归找出源目录下所有文档（扩展名不区分大小写）
//! 2. **逐个处理**：委托 `DocumentFlow`，按结果累加计数
//! 3. **进度**：每处理一份就推送一次进度
//! 4. **清理**：处理完后删除源目录下的空目录（错误区/重复区除外）
//!
//! 单线程顺序执行，文档之间互不依赖。

use crate::config::Config;
use crate::error::SetupError;
use crate::infrastructure::{fs_ops, Notifier, ProgressUpdate};
use crate::models::{Document, RunStats};
use crate::workflow::{DocumentFlow, DocumentOutcome};
use std::io;
use tracing::{debug, warn};
use walkdir::WalkDir;

pub struct BatchWalker<'a, N: Notifier> {
    config: &'a Config,
    notifier: &'a N,
    flow: DocumentFlow,
}

impl<'a, N: Notifier> BatchWalker<'a, N> {
    pub fn new(config: &'a Config, notifier: &'a N) -> Result<Self, regex::Error> {
        Ok(Self {
            config,
            notifier,
            flow: DocumentFlow::new(config)?,
        })
    }

    /// 扫描源目录；结果目录若嵌在源目录里会被跳过
    ///
    /// 符号链接会被跟随，指向文档的链接和普通文档一样处理。
    pub fn scan(&self) -> Result<Vec<Document>, SetupError> {
        let source_dir = &self.config.source_dir;
        let destination_dir = &self.config.destination_dir;
        let mut documents = Vec::new();

        let walker = WalkDir::new(source_dir)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.path().starts_with(destination_dir));

        for entry in walker {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(SetupError::Scan {
                        path: source_dir.clone(),
                        source: io::Error::from(e),
                    });
                }
                Err(e) => {
                    warn!("跳过无法读取的条目: {}", e);
                    continue;
                }
            };
            if entry.file_type().is_file() && self.config.is_document(entry.path()) {
                documents.push(Document::new(entry.into_path(), documents.len() + 1));
            }
        }

        Ok(documents)
    }

    /// 顺序处理所有文档，返回计数
    pub fn run(&self, documents: &[Document]) -> RunStats {
        let mut stats = RunStats {
            found: documents.len(),
            ..Default::default()
        };

        for document in documents {
            let outcome = self.flow.run(document);
            match outcome {
                DocumentOutcome::Placed { .. } => stats.processed += 1,
                DocumentOutcome::Errored { .. } => stats.errors += 1,
            }
            if outcome.is_duplicate() {
                stats.duplicates += 1;
            }

            self.notifier.progress(&ProgressUpdate {
                current: document.index,
                total: stats.found,
                processed: stats.processed,
                errors: stats.errors,
                duplicates: stats.duplicates,
            });
        }

        stats
    }

    /// 删除源目录下变空的目录
    pub fn prune(&self) -> usize {
        let removed = fs_ops::prune_empty_dirs(&self.config.source_dir, |name| {
            self.config.is_holding_dir(name)
        });
        debug!("已清理 {} 个空目录", removed);
        removed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::HeadlessNotifier;
    use std::fs;
    use tempfile::tempdir;

    fn cte(cnpj: &str) -> String {
        format!(
            r#"<cteProc xmlns="http://www.portalfiscal.inf.br/cte"><CTe><infCte>
<ide><dhEmi>2024-03-15T10:00:00-03:00</dhEmi></ide>
<emit><CNPJ>{}</CNPJ></emit></infCte></CTe></cteProc>"#,
            cnpj
        )
    }

    #[test]
    fn test_scan_matches_extension_case_insensitively() {
        let dir = tempdir().unwrap();
        let config = Config::rooted_at(dir.path());
        fs::create_dir_all(config.source_dir.join("a/b")).unwrap();
        fs::write(config.source_dir.join("1.xml"), "").unwrap();
        fs::write(config.source_dir.join("a/2.XML"), "").unwrap();
        fs::write(config.source_dir.join("a/b/3.Xml"), "").unwrap();
        fs::write(config.source_dir.join("a/b/leia.txt"), "").unwrap();

        let notifier = HeadlessNotifier::declining();
        let walker = BatchWalker::new(&config, &notifier).unwrap();
        let documents = walker.scan().unwrap();

        assert_eq!(documents.len(), 3);
        assert_eq!(documents[0].index, 1);
        assert_eq!(documents[2].index, 3);
    }

    #[test]
    fn test_scan_skips_nested_destination() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("entrada");
        let config = Config {
            source_dir: source.clone(),
            destination_dir: source.join("saida"),
            ..Config::default()
        };
        fs::create_dir_all(source.join("saida/11/2024-03-15")).unwrap();
        fs::write(source.join("saida/11/2024-03-15/ja.xml"), "").unwrap();
        fs::write(source.join("novo.xml"), "").unwrap();

        let notifier = HeadlessNotifier::declining();
        let documents = BatchWalker::new(&config, &notifier).unwrap().scan().unwrap();

        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].path, source.join("novo.xml"));
    }

    #[test]
    fn test_run_counts_and_prunes() {
        let dir = tempdir().unwrap();
        let config = Config::rooted_at(dir.path());
        fs::create_dir_all(config.source_dir.join("lote/x")).unwrap();
        fs::write(config.source_dir.join("lote/x/a.xml"), cte("11222333000144")).unwrap();
        fs::write(config.source_dir.join("lote/b.xml"), "<sem-fechar").unwrap();

        let notifier = HeadlessNotifier::declining();
        let walker = BatchWalker::new(&config, &notifier).unwrap();
        let documents = walker.scan().unwrap();
        let stats = walker.run(&documents);

        assert_eq!(
            stats,
            RunStats {
                found: 2,
                processed: 1,
                errors: 1,
                duplicates: 0
            }
        );
        assert!(stats.is_balanced());

        assert_eq!(walker.prune(), 2);
        assert!(config.source_dir.exists());
        assert!(!config.source_dir.join("lote").exists());
    }

    #[test]
    fn test_progress_is_pushed_for_every_document() {
        let dir = tempdir().unwrap();
        let config = Config::rooted_at(dir.path());
        fs::create_dir_all(&config.source_dir).unwrap();
        fs::write(config.source_dir.join("1.xml"), cte("11222333000144")).unwrap();
        fs::write(config.source_dir.join("2.xml"), "<quebrado").unwrap();
        fs::write(config.source_dir.join("3.xml"), cte("11222333000144")).unwrap();
        let occupied = config.destination_dir.join("11222333000144/2024-03-15");
        fs::create_dir_all(&occupied).unwrap();
        fs::write(occupied.join("3.xml"), "antigo").unwrap();

        let notifier = HeadlessNotifier::declining();
        let walker = BatchWalker::new(&config, &notifier).unwrap();
        let stats = walker.run(&walker.scan().unwrap());

        let update = |current, processed, errors, duplicates| ProgressUpdate {
            current,
            total: 3,
            processed,
            errors,
            duplicates,
        };
        assert_eq!(
            notifier.progress_updates(),
            vec![update(1, 1, 0, 0), update(2, 1, 1, 0), update(3, 2, 1, 1)]
        );
        assert_eq!(stats.duplicates, 1);
    }

    #[test]
    fn test_failed_move_after_eviction_still_balances() {
        let dir = tempdir().unwrap();
        let config = Config::rooted_at(dir.path());
        // 文档本身就在目标位置：先被挤进重复区，随后移动失败
        let target = config
            .destination_dir
            .join("11222333000144/2024-03-15/nota.xml");
        fs::create_dir_all(target.parent().unwrap()).unwrap();
        fs::write(&target, cte("11222333000144")).unwrap();

        let notifier = HeadlessNotifier::declining();
        let walker = BatchWalker::new(&config, &notifier).unwrap();
        let stats = walker.run(&[Document::new(target.clone(), 1)]);

        assert_eq!(
            stats,
            RunStats {
                found: 1,
                processed: 0,
                errors: 1,
                duplicates: 1
            }
        );
        assert!(stats.is_balanced());
        let evicted = config.duplicates_dir().join("nota (1).xml");
        assert_eq!(fs::read_to_string(evicted).unwrap(), cte("11222333000144"));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_scan_follows_symlinked_documents() {
        let dir = tempdir().unwrap();
        let config = Config::rooted_at(dir.path());
        fs::create_dir_all(&config.source_dir).unwrap();
        let outside = dir.path().join("fora.xml");
        fs::write(&outside, cte("11222333000144")).unwrap();
        let link = config.source_dir.join("link.xml");
        std::os::unix::fs::symlink(&outside, &link).unwrap();

        let notifier = HeadlessNotifier::declining();
        let walker = BatchWalker::new(&config, &notifier).unwrap();
        let documents = walker.scan().unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].path, link);

        let stats = walker.run(&documents);
        assert_eq!(stats.processed, 1);
        assert!(config
            .destination_dir
            .join("11222333000144/2024-03-15/link.xml")
            .exists());
    }
}
