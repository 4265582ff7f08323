#![allow(dead_code)]

use separador_cte::Config;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

pub struct TestEnv {
    _tmp: TempDir,
    pub root: PathBuf,
    pub config: Config,
}

impl TestEnv {
    pub fn new() -> Self {
        let tmp = TempDir::new().expect("create temp dir");
        let root = tmp.path().to_path_buf();
        let config = Config::rooted_at(&root);
        Self {
            _tmp: tmp,
            root,
            config,
        }
    }

    /// 在源目录下写一个文件，返回其路径
    pub fn source_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.config.source_dir.join(relative), content)
    }

    /// 在结果目录下写一个文件，返回其路径
    pub fn destination_file(&self, relative: &str, content: &str) -> PathBuf {
        write_file(&self.config.destination_dir.join(relative), content)
    }
}

pub fn write_file(path: &Path, content: &str) -> PathBuf {
    fs::create_dir_all(path.parent().expect("parent dir")).expect("create parent");
    fs::write(path, content).expect("write file");
    path.to_path_buf()
}

pub fn cte(cnpj: &str, dh_emi: &str) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<cteProc xmlns="http://www.portalfiscal.inf.br/cte" versao="4.00">
  <CTe>
    <infCte versao="4.00">
      <ide><mod>57</mod><dhEmi>{dh_emi}</dhEmi></ide>
      <emit><CNPJ>{cnpj}</CNPJ><xNome>EMITENTE</xNome></emit>
    </infCte>
  </CTe>
</cteProc>"#
    )
}

pub fn cte_without_issuer(dh_emi: &str) -> String {
    format!(
        r#"<cteProc xmlns="http://www.portalfiscal.inf.br/cte">
  <CTe><infCte><ide><dhEmi>{dh_emi}</dhEmi></ide><emit><xNome>SEM CNPJ</xNome></emit></infCte></CTe>
</cteProc>"#
    )
}
