use std::io;

fn main() {
    tablemind_cli::logging::init_logging();
    let code = tablemind_cli::run(std::env::args(), &mut io::stdout(), &mut io::stderr());
    std::process::exit(code);
}
