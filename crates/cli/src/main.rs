fn main() {
    if let Err(e) = blastscope_cli::run() {
        eprintln!("error: {}", e);
        std::process::exit(1);
    }
}
