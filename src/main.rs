fn main() {
    if let Err(err) = fundflow_graph::run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}
