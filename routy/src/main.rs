use clap::Parser;
use routy::app::RoutyApp;

fn main() {
    env_logger::init();
    let args = RoutyApp::parse();
    match args.run() {
        Ok(output) => println!("{output}"),
        Err(e) => {
            log::error!("routy failed: {e}");
            eprintln!("{e}");
            std::process::exit(1);
        }
    }
}
