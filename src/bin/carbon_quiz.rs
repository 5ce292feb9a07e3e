use std::process::ExitCode;

fn main() -> ExitCode {
    carbon_quiz::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    match carbon_quiz::cli::run_cli(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            ExitCode::from(1)
        }
    }
}
