fn main() {
    if let Err(e) = factoscope_cli::run() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
