fn main() {
    if let Err(err) = outlet_insight::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
