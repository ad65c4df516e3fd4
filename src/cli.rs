use anyhow::{Context, Result};
use clap::Parser;
use multipick::{config::PickerConfig, logging, ui, FileSelectionDialog};
use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

#[derive(Debug, Parser)]
#[command(name = "multipick", version, about = "Pick one or more files in a terminal dialog")]
struct Cli {
    /// Directory to open; defaults to `start_dir` from the config, then the working directory.
    directory: Option<PathBuf>,
    /// Extension filter, tokens separated by ';' or ' ' (e.g. "jpg;png gif").
    #[arg(short, long)]
    ext: Option<String>,
    /// Config file to read instead of the per-user one.
    #[arg(long)]
    config: Option<PathBuf>,
    #[arg(long)]
    log_file: Option<PathBuf>,
    /// Separate printed paths with NUL instead of newline.
    #[arg(short = '0', long)]
    null: bool,
    #[arg(short, long)]
    verbose: bool,
}

pub fn run() -> Result<ExitCode> {
    let cli = Cli::parse();
    let mut config = match &cli.config {
        Some(path) => PickerConfig::load_from(path)?,
        None => PickerConfig::load()?,
    };
    if cli.log_file.is_some() {
        config.log_file = cli.log_file.clone();
    }
    logging::init(&config.log_path()?, cli.verbose)?;

    let directory = match cli.directory.clone().or_else(|| config.start_dir.clone()) {
        Some(dir) => dir,
        None => std::env::current_dir().context("resolve working directory")?,
    };
    let extensions = cli.ext.clone().or_else(|| config.extensions.clone());
    tracing::info!(
        dir = %directory.display(),
        filter = extensions.as_deref().unwrap_or(""),
        "starting picker"
    );

    let mut picked: Option<Vec<PathBuf>> = None;
    {
        let mut dialog = FileSelectionDialog::new(
            |paths: Vec<PathBuf>| picked = Some(paths),
            extensions.as_deref(),
        )
        .with_notice_duration(config.notice_duration());
        dialog.show(&directory);
        ui::run(&mut dialog)?;
    }

    let Some(paths) = picked else {
        return Ok(ExitCode::from(1));
    };
    print_paths(&paths, cli.null)?;
    Ok(ExitCode::SUCCESS)
}

fn print_paths(paths: &[PathBuf], null: bool) -> Result<()> {
    let separator = if null { '\0' } else { '\n' };
    let mut out = io::stdout().lock();
    for path in paths {
        write!(out, "{}{separator}", path.display()).context("write selection")?;
    }
    out.flush().context("flush selection")?;
    Ok(())
}
