//! Native entry point. Startup errors are printed and end the process with
//! a non-zero status.

fn main() {
    if let Err(err) = blocko::run() {
        eprintln!("blocko: {}", err);
        std::process::exit(1);
    }
}
