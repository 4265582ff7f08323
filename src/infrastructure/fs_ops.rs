//! 文件系统辅助函数

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};
use walkdir::WalkDir;

/// 移动单个文件：优先 rename，跨文件系统时退回 copy + remove
///
/// 失败时源文件保持原样，目标位置不留副本。
pub fn move_file(source: &Path, destination: &Path) -> io::Result<()> {
    if fs::rename(source, destination).is_ok() {
        return Ok(());
    }
    copy_then_remove(source, destination, |path| fs::remove_file(path))
}

fn copy_then_remove(
    source: &Path,
    destination: &Path,
    remove_source: impl FnOnce(&Path) -> io::Result<()>,
) -> io::Result<()> {
    fs::copy(source, destination)?;
    if let Err(e) = remove_source(source) {
        // 撤销复制，文件只留在源位置
        if let Err(cleanup) = fs::remove_file(destination) {
            warn!("无法删除残留副本 {}: {}", destination.display(), cleanup);
        }
        return Err(e);
    }
    Ok(())
}

/// 拆分文件名为 (主名, 扩展名)，扩展名带点；以点开头的隐藏文件没有扩展名
pub fn split_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(pos) if pos > 0 => file_name.split_at(pos),
        _ => (file_name, ""),
    }
}

/// `name (k).ext`
pub fn numbered_name(file_name: &str, counter: usize) -> String {
    let (base, ext) = split_name(file_name);
    format!("{} ({}){}", base, counter, ext)
}

/// 在 `dir` 中为 `file_name` 找一个未被占用的路径
///
/// `always_number` 为 true 时从 `(1)` 开始编号；否则原名可用就直接用原名。
/// 编号没有上限，一直递增直到找到空位。
pub fn unique_path(dir: &Path, file_name: &str, always_number: bool) -> PathBuf {
    if !always_number {
        let plain = dir.join(file_name);
        if !plain.exists() {
            return plain;
        }
    }

    let mut counter = 1;
    loop {
        let candidate = dir.join(numbered_name(file_name, counter));
        if !candidate.exists() {
            return candidate;
        }
        counter += 1;
    }
}

/// 自底向上删除 `root` 下的空目录（不含 `root` 本身）
///
/// `keep` 返回 true 的目录名即使为空也保留。返回删除的目录数。
pub fn prune_empty_dirs(root: &Path, keep: impl Fn(&str) -> bool) -> usize {
    let mut removed = 0;
    for entry in WalkDir::new(root)
        .min_depth(1)
        .contents_first(true)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if keep(&name) {
            continue;
        }
        let is_empty = fs::read_dir(entry.path())
            .map(|mut entries| entries.next().is_none())
            .unwrap_or(false);
        if !is_empty {
            continue;
        }
        match fs::remove_dir(entry.path()) {
            Ok(()) => removed += 1,
            Err(e) => debug!("无法删除空目录 {}: {}", entry.path().display(), e),
        }
    }
    removed
}

/// 递归统计 `root` 下满足 `is_document` 的文件数
pub fn count_files(root: &Path, is_document: impl Fn(&Path) -> bool) -> usize {
    WalkDir::new(root)
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_document(e.path()))
        .count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_split_name() {
        assert_eq!(split_name("nota.xml"), ("nota", ".xml"));
        assert_eq!(split_name("a.b.xml"), ("a.b", ".xml"));
        assert_eq!(split_name("sem_extensao"), ("sem_extensao", ""));
        assert_eq!(split_name(".oculto"), (".oculto", ""));
    }

    #[test]
    fn test_unique_path_probes_sequentially() {
        let dir = tempdir().unwrap();
        assert_eq!(
            unique_path(dir.path(), "nota.xml", true),
            dir.path().join("nota (1).xml")
        );

        fs::write(dir.path().join("nota (1).xml"), "a").unwrap();
        fs::write(dir.path().join("nota (2).xml"), "b").unwrap();
        assert_eq!(
            unique_path(dir.path(), "nota.xml", true),
            dir.path().join("nota (3).xml")
        );
    }

    #[test]
    fn test_unique_path_keeps_free_plain_name() {
        let dir = tempdir().unwrap();
        assert_eq!(
            unique_path(dir.path(), "nota.xml", false),
            dir.path().join("nota.xml")
        );

        fs::write(dir.path().join("nota.xml"), "a").unwrap();
        assert_eq!(
            unique_path(dir.path(), "nota.xml", false),
            dir.path().join("nota (1).xml")
        );
    }

    #[test]
    fn test_move_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.xml");
        let dest = dir.path().join("b.xml");
        fs::write(&source, "conteudo").unwrap();

        move_file(&source, &dest).unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "conteudo");
    }

    #[test]
    fn test_failed_source_removal_leaves_no_copy() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.xml");
        let dest = dir.path().join("destino.xml");
        fs::write(&source, "conteudo").unwrap();

        let result = copy_then_remove(&source, &dest, |_| {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "somente leitura"))
        });

        assert_eq!(result.unwrap_err().kind(), io::ErrorKind::PermissionDenied);
        assert_eq!(fs::read_to_string(&source).unwrap(), "conteudo");
        assert!(!dest.exists());
    }

    #[test]
    fn test_copy_fallback_moves_file() {
        let dir = tempdir().unwrap();
        let source = dir.path().join("a.xml");
        let dest = dir.path().join("b.xml");
        fs::write(&source, "conteudo").unwrap();

        copy_then_remove(&source, &dest, |path| fs::remove_file(path)).unwrap();
        assert!(!source.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "conteudo");
    }

    #[test]
    fn test_prune_keeps_holding_dirs_and_non_empty() {
        let dir = tempdir().unwrap();
        let root = dir.path();
        fs::create_dir_all(root.join("a/b/c")).unwrap();
        fs::create_dir_all(root.join("0.Erros")).unwrap();
        fs::create_dir_all(root.join("cheio")).unwrap();
        fs::write(root.join("cheio/x.xml"), "x").unwrap();

        let removed = prune_empty_dirs(root, |name| name == "0.Erros");

        assert_eq!(removed, 3);
        assert!(!root.join("a").exists());
        assert!(root.join("0.Erros").exists());
        assert!(root.join("cheio/x.xml").exists());
        assert!(root.exists());
    }

    #[test]
    fn test_count_files() {
        let dir = tempdir().unwrap();
        fs::create_dir_all(dir.path().join("x/y")).unwrap();
        fs::write(dir.path().join("x/a.xml"), "").unwrap();
        fs::write(dir.path().join("x/y/b.XML"), "").unwrap();
        fs::write(dir.path().join("x/y/c.txt"), "").unwrap();

        let count = count_files(dir.path(), |p| {
            p.extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case("xml"))
        });
        assert_eq!(count, 2);
    }
}
