//! Binary entrypoint for consolida-cli

fn main() {
    if let Err(err) = consolida_cli::run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}
