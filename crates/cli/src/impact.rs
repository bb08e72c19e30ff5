use crate::view::ImpactRow;
use crate::{OutputFormat, Session};
use blastscope_api::Language;
use blastscope_core::diff::{diff_against_rev, parse_unified_diff, ChangedLines};
use blastscope_core::impact::{ImpactAnalyzer, ImpactReport};
use blastscope_core::render::{format_code, format_impact_summary, hierarchy_to_mermaid, ImpactExport};
use blastscope_core::BlastscopeError;
use std::io::Read;
use std::path::PathBuf;
use tabled::Table;
use tracing::info;

pub enum DiffSource {
    Stdin,
    File(PathBuf),
    Git { rev: String, repo: PathBuf },
}

impl DiffSource {
    pub fn pick(diff: Option<PathBuf>, rev: Option<String>, repo: PathBuf) -> Self {
        match (rev, diff) {
            (Some(rev), _) => DiffSource::Git { rev, repo },
            (None, Some(path)) if path.as_os_str() != "-" => DiffSource::File(path),
            _ => DiffSource::Stdin,
        }
    }

    async fn changed_lines(self) -> Result<ChangedLines, BlastscopeError> {
        let text = match self {
            DiffSource::File(path) => tokio::fs::read_to_string(path).await?,
            DiffSource::Stdin => {
                let mut text = String::new();
                std::io::stdin().read_to_string(&mut text)?;
                text
            }
            DiffSource::Git { rev, repo } => {
                info!("Diffing working tree against {} in {}", rev, repo.display());
                let changed = tokio::task::spawn_blocking(move || diff_against_rev(&repo, &rev))
                    .await
                    .map_err(|e| BlastscopeError::Internal(format!("git diff task failed: {}", e)))??;
                return Ok(changed);
            }
        };
        Ok(parse_unified_diff(&text)?)
    }
}

pub async fn run(
    session: &Session,
    source: DiffSource,
    format: OutputFormat,
    max_nodes: Option<usize>,
    related: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let changed = source.changed_lines().await?;

    let mut analysis = session.config.analysis.clone();
    if max_nodes.is_some() {
        analysis.max_nodes = max_nodes;
    }
    let analyzer = ImpactAnalyzer::new(session.service.as_ref(), analysis);
    let report = analyzer.analyze(changed).await?;

    match format {
        OutputFormat::Table => print_table(&report),
        OutputFormat::Mermaid => println!("{}", hierarchy_to_mermaid(&report.graph)),
        OutputFormat::Json => println!("{}", ImpactExport::from_graph(&report.graph).to_json_pretty()?),
    }

    if related {
        for (path, code) in report.related_code_outside_diff() {
            println!("{}", path);
            println!("{}", format_code(code, &Language::from_path(path)));
        }
    }
    Ok(())
}

fn print_table(report: &ImpactReport) {
    println!("{}", format_impact_summary(report));
    if !report.graph.is_empty() {
        println!("{}", Table::new(ImpactRow::rows(&report.graph)));
    }
}
