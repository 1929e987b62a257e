fn main() {
    std::process::exit(nl_cli::run_cli_from_args(std::env::args_os()));
}
