use crate::Session;
use blastscope_api::{Language, ReferenceQuery};
use blastscope_core::render::{format_code, format_references};

pub async fn run(
    session: &Session,
    file: &str,
    symbol: &str,
    context: Option<u32>,
) -> Result<(), Box<dyn std::error::Error>> {
    let definitions = session.service.definitions_in_file(file).await?;
    let definition = definitions
        .iter()
        .find(|d| d.name == symbol)
        .ok_or_else(|| format!("no symbol named '{}' in {}", symbol, file))?;

    let language = Language::from_path(file);
    let source = session.service.read_source_code(&definition.range).await?;
    println!("{}", format_code(&source, &language));

    let lines = context.unwrap_or(session.config.analysis.context_lines);
    let query =
        ReferenceQuery::usages_of(definition.identifier_position.clone()).with_context_lines(lines);
    let references = session.service.find_references(&query).await?;
    println!("{}", format_references(&references, &language));
    Ok(())
}
