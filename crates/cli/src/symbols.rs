use crate::view::SymbolRow;
use crate::Session;
use tabled::Table;

pub async fn run(session: &Session, file: &str) -> Result<(), Box<dyn std::error::Error>> {
    let definitions = session.service.definitions_in_file(file).await?;

    if definitions.is_empty() {
        println!("No definitions found in {}", file);
        return Ok(());
    }

    let rows: Vec<SymbolRow> = definitions.iter().map(SymbolRow::from).collect();
    println!("{}", Table::new(rows));
    Ok(())
}
