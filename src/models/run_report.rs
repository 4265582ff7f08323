use chrono::{DateTime, Local};

/// 单次运行的计数器，只由 BatchWalker 修改
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunStats {
    /// 扫描到的文档数
    pub found: usize,
    /// 成功放置的文档数
    pub processed: usize,
    /// 分类或放置失败、移入错误区的文档数
    pub errors: usize,
    /// 因同名被挤入重复区的旧文件数
    pub duplicates: usize,
}

impl RunStats {
    /// 未被中断的运行满足 found == processed + errors
    pub fn is_balanced(&self) -> bool {
        self.found == self.processed + self.errors
    }
}

/// 某个日期文件夹下的文档数
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DateFolder {
    pub name: String,
    pub documents: usize,
}

/// 某个发行方目录的明细
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IssuerBreakdown {
    pub issuer_id: String,
    pub folders: Vec<DateFolder>,
}

/// 运行报告，写出后不再修改
#[derive(Debug, Clone)]
pub struct RunReport {
    pub generated_at: DateTime<Local>,
    pub stats: RunStats,
    /// 事后重新统计结果目录下的文档数，与 `processed` 对照
    pub effectively_separated: usize,
    /// 按发行方、再按日期文件夹名排序
    pub breakdown: Vec<IssuerBreakdown>,
}

impl RunReport {
    /// 渲染成报告文本
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!(
            "Data do processamento: {}\n",
            self.generated_at.format("%d/%m/%Y %H:%M:%S")
        ));
        out.push_str(&format!(
            "Total de arquivos XML encontrados: {}\n",
            self.stats.found
        ));
        out.push_str(&format!(
            "Total de arquivos XML processados: {}\n",
            self.stats.processed
        ));
        out.push_str(&format!(
            "Total de arquivos XML com erros: {}\n",
            self.stats.errors
        ));
        out.push_str(&format!(
            "Total de arquivos XML duplicados: {}\n",
            self.stats.duplicates
        ));
        out.push_str(&format!(
            "Total de arquivos XML efetivamente separados: {}\n",
            self.effectively_separated
        ));
        out.push_str(&format!("|{}|\n\n\n", "--".repeat(30)));
        out.push_str("Relatório de arquivos separados por CNPJ e Data de Emissão:\n\n");

        let blocks: Vec<String> = self
            .breakdown
            .iter()
            .map(|issuer| {
                let mut lines = vec![format!("- CNPJ {}:", issuer.issuer_id)];
                lines.extend(issuer.folders.iter().map(|folder| {
                    format!("    {}: {} arquivo(s)", folder.name, folder.documents)
                }));
                lines.join("\n")
            })
            .collect();
        out.push_str(&blocks.join("\n\n"));
        out.push('\n');
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> RunReport {
        RunReport {
            generated_at: Local.with_ymd_and_hms(2024, 3, 15, 10, 30, 0).unwrap(),
            stats: RunStats {
                found: 3,
                processed: 2,
                errors: 1,
                duplicates: 1,
            },
            effectively_separated: 4,
            breakdown: vec![
                IssuerBreakdown {
                    issuer_id: "11222333000144".to_string(),
                    folders: vec![
                        DateFolder {
                            name: "2024-03-14".to_string(),
                            documents: 1,
                        },
                        DateFolder {
                            name: "2024-03-15".to_string(),
                            documents: 2,
                        },
                    ],
                },
                IssuerBreakdown {
                    issuer_id: "99888777000166".to_string(),
                    folders: vec![],
                },
            ],
        }
    }

    #[test]
    fn test_render_counters_and_breakdown() {
        let text = sample().render();
        assert!(text.starts_with("Data do processamento: 15/03/2024 10:30:00\n"));
        assert!(text.contains("Total de arquivos XML encontrados: 3\n"));
        assert!(text.contains("Total de arquivos XML com erros: 1\n"));
        assert!(text.contains("Total de arquivos XML efetivamente separados: 4\n"));
        assert!(text.contains(
            "- CNPJ 11222333000144:\n    2024-03-14: 1 arquivo(s)\n    2024-03-15: 2 arquivo(s)\n\n- CNPJ 99888777000166:"
        ));
    }

    #[test]
    fn test_balance() {
        assert!(sample().stats.is_balanced());
        let stats = RunStats {
            found: 2,
            processed: 1,
            ..Default::default()
        };
        assert!(!stats.is_balanced());
    }
}
