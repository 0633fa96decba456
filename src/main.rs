// src/main.rs

use tagrun::{cli, logging, run};

#[tokio::main]
async fn main() {
    let args = cli::parse();
    if let Err(err) = logging::init_logging(args.log_level) {
        eprintln!("tagrun error: {err:?}");
        std::process::exit(2);
    }

    match run(args).await {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(err) => {
            eprintln!("tagrun error: {err}");
            std::process::exit(2);
        }
    }
}
