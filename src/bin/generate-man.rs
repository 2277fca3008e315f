//! Write the stagectl man page to stdout, or to the directory given as first argument.

use clap::CommandFactory;
use clap_mangen::Man;
use stagectl::cli::Cli;
use std::path::PathBuf;

fn main() -> std::io::Result<()> {
    let cmd = Cli::command();
    let man = Man::new(cmd);
    let mut buffer: Vec<u8> = Vec::new();
    man.render(&mut buffer)?;

    match std::env::args().nth(1) {
        Some(dir) => {
            let dir = PathBuf::from(dir);
            std::fs::create_dir_all(&dir)?;
            let path = dir.join("stagectl.1");
            std::fs::write(&path, buffer)?;
            eprintln!("Wrote {}", path.display());
        }
        None => {
            use std::io::Write;
            std::io::stdout().write_all(&buffer)?;
        }
    }
    Ok(())
}
