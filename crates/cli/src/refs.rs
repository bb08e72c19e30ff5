use crate::view::FileRefRow;
use crate::Session;
use blastscope_core::impact::collect_file_references;
use blastscope_core::render::reference_diagram;
use tabled::Table;

pub async fn run(
    session: &Session,
    file: &str,
    mermaid: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let refs = collect_file_references(session.service.as_ref(), file).await?;

    if mermaid {
        println!("{}", reference_diagram(&refs, &session.config.render));
    } else if refs.is_empty() {
        println!("No other file references symbols from {}", file);
    } else {
        println!("{}", Table::new(FileRefRow::rows(&refs)));
    }
    Ok(())
}
