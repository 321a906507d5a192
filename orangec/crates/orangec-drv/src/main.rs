use clap::Parser;
use orangec_drv::{AlreadyReported, Cli};

fn main() {
    let cli = Cli::parse();
    if let Err(e) = orangec_drv::run(&cli) {
        if e.downcast_ref::<AlreadyReported>().is_none() {
            eprintln!("error: {}", e);
        }
        std::process::exit(1);
    }
}
