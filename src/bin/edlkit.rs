use std::{
    fs::File,
    io::BufReader,
    path::{Path, PathBuf},
};

use anyhow::Context as _;
use clap::{Parser, Subcommand, ValueEnum};
use edlkit::MediaResolver as _;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "edlkit", version)]
struct Cli {
    /// Log at debug level unless EDLKIT_LOG says otherwise.
    #[arg(long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Write a timeline JSON file as one or more EDLs.
    Export(ExportArgs),
    /// Read an EDL into timeline JSON.
    Import(ImportArgs),
    /// Print the dialect and frame-rate hint of an EDL.
    Detect(DetectArgs),
    /// Convert between frame counts and HH:MM:SS:FF.
    Timecode(TimecodeArgs),
}

#[derive(Parser, Debug)]
struct ExportArgs {
    /// Input timeline JSON.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Dialect(s) to write. Repeat for several files.
    #[arg(long = "format", value_enum, default_values_t = [DialectChoice::Cmx3600])]
    formats: Vec<DialectChoice>,

    /// Export configuration JSON.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Output path. Only valid with a single format.
    #[arg(long)]
    out: Option<PathBuf>,

    /// Directory for generated file names (defaults to the input's directory).
    #[arg(long)]
    out_dir: Option<PathBuf>,

    /// Override the title.
    #[arg(long)]
    title: Option<String>,

    /// Append the frame rate to the TITLE line.
    #[arg(long)]
    fps_hint: bool,
}

#[derive(Parser, Debug)]
struct ImportArgs {
    /// Input EDL.
    #[arg(long = "in")]
    in_path: PathBuf,

    /// Frame rate; falls back to the title's rate hint.
    #[arg(long)]
    fps: Option<u32>,

    #[arg(long, value_enum, default_value_t = DetectChoice::Auto)]
    dialect: DetectChoice,

    /// Report every bad line instead of stopping at the first.
    #[arg(long)]
    collect_errors: bool,

    /// Output timeline JSON (stdout when omitted).
    #[arg(long)]
    out: Option<PathBuf>,

    /// Folders searched, in order, for media named in the EDL.
    #[arg(long = "media-dir")]
    media_dirs: Vec<PathBuf>,
}

#[derive(Parser, Debug)]
struct DetectArgs {
    /// Input EDL.
    #[arg(long = "in")]
    in_path: PathBuf,
}

#[derive(Parser, Debug)]
struct TimecodeArgs {
    #[arg(long)]
    fps: u32,

    /// A frame count or an HH:MM:SS:FF timecode.
    value: String,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum DialectChoice {
    Cmx3600,
    Openshot,
    Gvg,
    Cmx340,
}

impl From<DialectChoice> for edlkit::Dialect {
    fn from(choice: DialectChoice) -> Self {
        match choice {
            DialectChoice::Cmx3600 => Self::Cmx3600,
            DialectChoice::Openshot => Self::OpenShot,
            DialectChoice::Gvg => Self::Gvg,
            DialectChoice::Cmx340 => Self::Cmx340,
        }
    }
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum DetectChoice {
    Auto,
    Cmx3600,
    Openshot,
    Gvg,
    Cmx340,
}

impl DetectChoice {
    fn dialect(self) -> Option<edlkit::Dialect> {
        match self {
            Self::Auto => None,
            Self::Cmx3600 => Some(DialectChoice::Cmx3600.into()),
            Self::Openshot => Some(DialectChoice::Openshot.into()),
            Self::Gvg => Some(DialectChoice::Gvg.into()),
            Self::Cmx340 => Some(DialectChoice::Cmx340.into()),
        }
    }
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    match cli.cmd {
        Command::Export(args) => cmd_export(args),
        Command::Import(args) => cmd_import(args),
        Command::Detect(args) => cmd_detect(args),
        Command::Timecode(args) => cmd_timecode(args),
    }
}

fn init_tracing(verbose: bool) {
    let fallback = if verbose { "debug" } else { "warn" };
    let filter = EnvFilter::try_from_env("EDLKIT_LOG").unwrap_or_else(|_| EnvFilter::new(fallback));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path, what: &str) -> anyhow::Result<T> {
    let f = File::open(path).with_context(|| format!("open {what} '{}'", path.display()))?;
    serde_json::from_reader(BufReader::new(f)).with_context(|| format!("parse {what} JSON"))
}

fn read_text(path: &Path) -> anyhow::Result<String> {
    std::fs::read_to_string(path).with_context(|| format!("read EDL '{}'", path.display()))
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("create output dir '{}'", parent.display()))?;
    }
    std::fs::write(path, contents).with_context(|| format!("write '{}'", path.display()))
}

fn cmd_export(args: ExportArgs) -> anyhow::Result<()> {
    let timeline: edlkit::Timeline = read_json(&args.in_path, "timeline")?;
    let mut config: edlkit::ExportConfig = match &args.config {
        Some(path) => read_json(path, "export config")?,
        None => edlkit::ExportConfig::default(),
    };
    if let Some(title) = args.title {
        config.title = Some(title);
    }
    config.frame_rate_hint |= args.fps_hint;

    if args.out.is_some() && args.formats.len() != 1 {
        anyhow::bail!("--out needs exactly one --format; use --out-dir for several");
    }

    let stem = args
        .in_path
        .file_stem()
        .and_then(|s| s.to_str())
        .unwrap_or("timeline");
    let out_dir = args
        .out_dir
        .clone()
        .or_else(|| args.in_path.parent().map(Path::to_path_buf))
        .unwrap_or_else(|| PathBuf::from("."));

    for choice in &args.formats {
        let dialect: edlkit::Dialect = (*choice).into();
        let text = edlkit::write(&timeline, dialect, &config)
            .with_context(|| format!("export {dialect}"))?;
        let path = match &args.out {
            Some(path) => path.clone(),
            None => out_dir.join(dialect.output_filename(stem, &config.filename_template)),
        };
        write_file(&path, &text)?;
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn cmd_import(args: ImportArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let rate = match args.fps {
        Some(fps) => edlkit::FrameRate::new(fps)?,
        None => edlkit::detect_rate_hint(&text)
            .context("no --fps given and the title carries no frame-rate hint")?,
    };
    let options = edlkit::ReadOptions {
        dialect: args.dialect.dialect(),
        collect_errors: args.collect_errors,
        ..edlkit::ReadOptions::new(rate)
    };
    let report = edlkit::read(&text, &options)
        .with_context(|| format!("import '{}'", args.in_path.display()))?;

    for err in &report.errors {
        eprintln!("error: {err}");
    }
    eprintln!(
        "read {} events ({})",
        report.timeline.event_count(),
        report.dialect
    );

    if !args.media_dirs.is_empty() {
        let resolver = edlkit::DirectoryResolver::new(args.media_dirs.iter().cloned());
        for media in &report.recovered {
            match resolver.resolve(&media.filename) {
                edlkit::Resolution::Found(path) => {
                    eprintln!("{:03} {} -> {}", media.event_id, media.filename, path.display())
                }
                edlkit::Resolution::Ambiguous(paths) => eprintln!(
                    "{:03} {} is ambiguous ({} candidates)",
                    media.event_id,
                    media.filename,
                    paths.len()
                ),
                edlkit::Resolution::Missing => {
                    eprintln!("{:03} {} not found", media.event_id, media.filename)
                }
            }
        }
    }

    let json = serde_json::to_string_pretty(&report.timeline).context("serialize timeline")?;
    match &args.out {
        Some(path) => {
            write_file(path, &json)?;
            eprintln!("wrote {}", path.display());
        }
        None => println!("{json}"),
    }
    if !report.errors.is_empty() {
        anyhow::bail!("{} line(s) could not be read", report.errors.len());
    }
    Ok(())
}

fn cmd_detect(args: DetectArgs) -> anyhow::Result<()> {
    let text = read_text(&args.in_path)?;
    let dialect = edlkit::detect_dialect(&text);
    match edlkit::detect_rate_hint(&text) {
        Some(rate) => println!("{dialect} ({rate})"),
        None => println!("{dialect}"),
    }
    Ok(())
}

fn cmd_timecode(args: TimecodeArgs) -> anyhow::Result<()> {
    let rate = edlkit::FrameRate::new(args.fps)?;
    let value = args.value.trim();
    if !value.is_empty() && value.bytes().all(|b| b.is_ascii_digit()) {
        let frames: u64 = value.parse().context("frame count out of range")?;
        println!("{}", edlkit::from_frames(frames, rate));
    } else {
        println!("{}", edlkit::to_frames(value, rate)?);
    }
    Ok(())
}
