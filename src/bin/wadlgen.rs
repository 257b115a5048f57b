//! Generate Rust client code from a WADL description.

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    std::process::exit(wadlgen::cli::run(&args));
}
