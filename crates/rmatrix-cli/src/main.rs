mod cli;

fn main() {
    let code = cli::run_from_env();
    std::process::exit(code);
}
