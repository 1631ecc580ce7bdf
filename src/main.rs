fn main() {
    if let Err(err) = adhoc_query::run() {
        eprintln!("Error: {err:#}");
        std::process::exit(1);
    }
}
