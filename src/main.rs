fn main() {
    if let Err(err) = graphedit::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
