use stagectl::api::ApiError;
use stagectl::cli::run;

fn main() {
    #[cfg(windows)]
    let _ = enable_ansi_support::enable_ansi_support();

    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    if let Err(e) = run() {
        // A client that cannot be built is an internal error; everything else is user input
        if e.is::<ApiError>() {
            eprintln!("Internal error: {}", e);
            let mut source = e.source();
            if source.is_some() {
                eprintln!("\nCaused by:");
                let mut indent = 1;
                while let Some(err) = source {
                    eprintln!("{:indent$}  {}", "", err);
                    source = err.source();
                    indent += 1;
                }
            }
            std::process::exit(2);
        } else {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    }
}
