fn main() {
    if let Err(err) = uobench::cli::run() {
        eprintln!("Error: {err:?}");
        std::process::exit(1);
    }
}
