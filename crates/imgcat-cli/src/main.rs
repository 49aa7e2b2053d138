//! imgcat - Display images inline in iTerm2
//!
//! Streams each file through the inline image protocol to stdout.

use clap::{Parser, ValueEnum};
use imgcat::{Capabilities, DisplayOption, Encoder, Length, TerminalEnv};
use std::fs::File;
use std::io;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "imgcat")]
#[command(version)]
#[command(about = "Display images inline in iTerm2", long_about = None)]
struct Cli {
    /// Image files to display (use - for stdin)
    #[arg(required = true)]
    inputs: Vec<PathBuf>,

    /// Width: cells (80), pixels (300px), percent (50%) or auto
    #[arg(short = 'W', long)]
    width: Option<Length>,

    /// Height: cells (24), pixels (200px), percent (50%) or auto
    #[arg(short = 'H', long)]
    height: Option<Length>,

    /// Name shown by the terminal (default: the file name)
    #[arg(short, long)]
    name: Option<String>,

    /// Do not send the file size
    #[arg(long)]
    no_size: bool,

    /// Download the file instead of displaying it
    #[arg(short, long)]
    download: bool,

    /// Stretch to the given width and height instead of keeping the aspect ratio
    #[arg(short, long)]
    stretch: bool,

    /// Skip the iTerm2 check
    #[arg(short, long)]
    force: bool,

    /// tmux passthrough framing
    #[arg(long, value_enum, default_value_t = TmuxMode::Auto)]
    tmux: TmuxMode,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum TmuxMode {
    /// Detect from the environment
    Auto,
    Always,
    Never,
}

/// Environment detection with the command-line overrides applied.
struct CliCapabilities {
    force: bool,
    tmux: TmuxMode,
}

impl Capabilities for CliCapabilities {
    fn supports_protocol(&self) -> bool {
        self.force || TerminalEnv.supports_protocol()
    }

    fn is_multiplexer(&self) -> bool {
        match self.tmux {
            TmuxMode::Auto => TerminalEnv.is_multiplexer(),
            TmuxMode::Always => true,
            TmuxMode::Never => false,
        }
    }
}

impl Cli {
    fn options(&self, name: Option<&str>, size: Option<u64>) -> Vec<DisplayOption> {
        let mut opts = Vec::new();
        if let Some(name) = self.name.as_deref().or(name) {
            opts.push(DisplayOption::name(name));
        }
        if let Some(size) = size.filter(|_| !self.no_size) {
            opts.push(DisplayOption::size(size as i64));
        }
        if let Some(width) = self.width {
            opts.push(DisplayOption::width(width));
        }
        if let Some(height) = self.height {
            opts.push(DisplayOption::height(height));
        }
        if self.stretch {
            opts.push(DisplayOption::preserve_aspect_ratio(false));
        }
        opts.push(DisplayOption::inline(!self.download));
        opts
    }

    fn caps(&self) -> CliCapabilities {
        CliCapabilities {
            force: self.force,
            tmux: self.tmux,
        }
    }
}

fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();
    let cli = Cli::parse();

    for input in &cli.inputs {
        let stdout = io::stdout().lock();

        if is_stdin(input) {
            log::info!("Encoding stdin");
            let mut enc = Encoder::with_capabilities(stdout, cli.options(None, None), cli.caps())?;
            enc.encode(io::stdin())?;
            continue;
        }

        let file = File::open(input)
            .map_err(|e| format!("Failed to open '{}': {}", input.display(), e))?;
        let size = file.metadata().ok().map(|m| m.len());
        let name = input.file_name().map(|n| n.to_string_lossy().into_owned());

        log::info!(
            "Encoding '{}' ({} bytes)",
            input.display(),
            size.map_or_else(|| "?".to_string(), |s| s.to_string())
        );

        let mut enc =
            Encoder::with_capabilities(stdout, cli.options(name.as_deref(), size), cli.caps())?;
        enc.encode(file)
            .map_err(|e| format!("Failed to display '{}': {}", input.display(), e))?;
    }

    Ok(())
}
