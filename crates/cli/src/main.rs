use std::process::ExitCode;

fn main() -> ExitCode {
    kibble_cli::run()
}
