use std::ffi::OsString;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::{ArgMatches, CommandFactory, FromArgMatches, Parser, ValueEnum};

use pcmcg::error::{MosaicError, ProfileError, ValidationError, XpmError};
use pcmcg::profile::{self, GlyphProfile};
use pcmcg::{format, mosaic, xpm, Glyph, GlyphSet, RenderOptions};

mod render_png;

/// Convert one or more pixmaps into the hexdump needed by a PC/M character
/// generator PROM. Turn the hexdump into a plain binary with `xxd -r` and
/// further into srecord.
#[derive(Parser, Debug)]
#[command(name = "mkcg", version)]
struct Cli {
    /// Pixmap files, one glyph each, in PROM order
    #[arg(value_name = "XPMFILE")]
    files: Vec<PathBuf>,

    /// Make xxd conform hexdump (default)
    #[arg(short = 'x', long)]
    hexdump: bool,

    /// Make banner dump
    #[arg(short = 'b', long)]
    banner: bool,

    /// Make a new pixmap with all XPMFILEs merged together
    #[arg(
        short = 'o',
        long,
        value_name = "COLS",
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = "16",
        value_parser = parse_columns
    )]
    overview: Option<usize>,

    /// Negated (inverse) output for banner, hexdump and overview
    #[arg(short = 'n', long)]
    neg: bool,

    /// Don't report any errors
    #[arg(short, long)]
    quiet: bool,

    /// Show more progress information on stderr
    #[arg(short, long)]
    verbose: bool,

    /// Built-in profile name or path to a .toml profile
    #[arg(short, long, default_value = "pcm6416")]
    profile: String,

    /// Overview output format
    #[arg(long, value_enum, default_value_t = OverviewFormat::Xpm)]
    format: OverviewFormat,

    /// Overview output file (default: stdout, xpm only)
    #[arg(long)]
    output: Option<PathBuf>,

    /// Pixels per glyph pixel in png overviews
    #[arg(long, default_value = "1")]
    scale: usize,

    /// List the built-in profiles and exit
    #[arg(long)]
    list_profiles: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OverviewFormat {
    Xpm,
    Png,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Action {
    Hexdump,
    Banner,
    Overview(usize),
}

/// Command line misuse detected after parsing.
#[derive(Debug, thiserror::Error)]
enum UsageError {
    #[error("missing file list")]
    NoFiles,
    #[error("profile '{0}' is negated already, --neg is not available")]
    NegUnavailable(String),
    #[error(
        "unknown profile '{0}'. Use --list-profiles to see built-in profiles, or provide a .toml path."
    )]
    UnknownProfile(String),
    #[error("png overview needs --output")]
    PngNeedsOutput,
}

/// Process exit status. Failures are negative, XPM codes follow libXpm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Status {
    Ok,
    XpmColorError,
    XpmOpenFailed,
    XpmFileInvalid,
    WrongOption,
    NoFiles,
    ConversionError,
    CriticalError,
}

impl Status {
    fn code(self) -> i32 {
        match self {
            Status::Ok => 0,
            Status::XpmColorError => 1,
            Status::XpmOpenFailed => -1,
            Status::XpmFileInvalid => -2,
            Status::WrongOption => -10,
            Status::NoFiles => -11,
            Status::ConversionError => -13,
            Status::CriticalError => -20,
        }
    }

    /// Classify an error by the first recognised cause in its chain.
    fn of(err: &anyhow::Error) -> Status {
        err.chain()
            .find_map(|cause| {
                if let Some(usage) = cause.downcast_ref::<UsageError>() {
                    return Some(match usage {
                        UsageError::NoFiles => Status::NoFiles,
                        _ => Status::WrongOption,
                    });
                }
                if let Some(err) = cause.downcast_ref::<pcmcg::Error>() {
                    return Some(match err {
                        pcmcg::Error::Validation(_) | pcmcg::Error::Mosaic(_) => {
                            Status::ConversionError
                        }
                        pcmcg::Error::Decode(xpm) => Status::of_xpm(xpm),
                    });
                }
                if let Some(xpm) = cause.downcast_ref::<XpmError>() {
                    return Some(Status::of_xpm(xpm));
                }
                if cause.is::<ValidationError>() || cause.is::<MosaicError>() {
                    return Some(Status::ConversionError);
                }
                if cause.is::<ProfileError>() {
                    return Some(Status::WrongOption);
                }
                None
            })
            .unwrap_or(Status::CriticalError)
    }

    fn of_xpm(err: &XpmError) -> Status {
        match err {
            XpmError::Open { .. } => Status::XpmOpenFailed,
            XpmError::Invalid(_) => Status::XpmFileInvalid,
            XpmError::Color(_) => Status::XpmColorError,
            XpmError::Write(_) => Status::CriticalError,
        }
    }
}

fn main() {
    let args = attach_overview_value(std::env::args_os());
    let matches = match Cli::command().try_get_matches_from(args) {
        Ok(matches) => matches,
        Err(err) => {
            let _ = err.print();
            let status = if err.use_stderr() {
                Status::WrongOption
            } else {
                Status::Ok
            };
            std::process::exit(status.code());
        }
    };
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|err| err.exit());
    init_logger(&cli);

    let status = match run(&cli, &matches) {
        Ok(()) => Status::Ok,
        Err(err) => {
            log::error!("{err:#}");
            Status::of(&err)
        }
    };
    std::process::exit(status.code());
}

/// Rewrite `-oN` into `-o=N`, so an attached column count parses while
/// `-o FILE` still leaves FILE as a pixmap.
fn attach_overview_value<I>(args: I) -> Vec<OsString>
where
    I: IntoIterator<Item = OsString>,
{
    let mut positional = false;
    args.into_iter()
        .map(|arg| {
            if positional {
                return arg;
            }
            match arg.to_str() {
                Some("--") => {
                    positional = true;
                    arg
                }
                Some(s) => match s.strip_prefix("-o") {
                    Some(value) if !value.is_empty() && !value.starts_with('=') => {
                        OsString::from(format!("-o={value}"))
                    }
                    _ => arg,
                },
                None => arg,
            }
        })
        .collect()
}

/// Column count of `--overview`: leading digits, or the default when the
/// value does not start with one.
fn parse_columns(value: &str) -> Result<usize, String> {
    let digits = value
        .find(|c: char| !c.is_ascii_digit())
        .map_or(value, |end| &value[..end]);
    if digits.is_empty() {
        return Ok(mosaic::DEFAULT_COLUMNS);
    }
    digits
        .parse()
        .map_err(|err| format!("invalid column count '{value}': {err}"))
}

fn log_level(cli: &Cli) -> log::LevelFilter {
    if cli.quiet {
        log::LevelFilter::Off
    } else if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    }
}

fn init_logger(cli: &Cli) {
    let mut builder = env_logger::Builder::new();
    builder
        .filter_level(log_level(cli))
        .target(env_logger::Target::Stderr)
        .format_timestamp(None)
        .format_target(false);
    if !cli.quiet {
        builder.parse_env(env_logger::Env::default());
    }
    builder.init();
}

fn run(cli: &Cli, matches: &ArgMatches) -> Result<()> {
    if cli.list_profiles {
        cmd_list_profiles();
        return Ok(());
    }

    let profile = load_profile(&cli.profile)?;
    let options = render_options(cli, &profile)?;
    let action = first_action(cli, matches);

    if cli.files.is_empty() {
        return Err(UsageError::NoFiles.into());
    }
    if cli.output.is_some() && !matches!(action, Action::Overview(_)) {
        log::warn!("--output only applies to --overview, ignored");
    }

    // Every file is decoded and validated before any output is produced.
    let glyphs = load_glyphs(&cli.files, &profile)?;

    match action {
        Action::Hexdump => write_stdout(|w| format::write_hexdump(w, &profile, options, &glyphs))
            .context("writing hexdump"),
        Action::Banner => write_stdout(|w| format::write_banners(w, &profile, options, &glyphs))
            .context("writing banner"),
        Action::Overview(columns) => cmd_overview(cli, &glyphs, columns, options),
    }
}

/// The action flag given first on the command line, hexdump if none.
fn first_action(cli: &Cli, matches: &ArgMatches) -> Action {
    let requested = [
        (cli.hexdump, "hexdump", Action::Hexdump),
        (cli.banner, "banner", Action::Banner),
        (
            cli.overview.is_some(),
            "overview",
            Action::Overview(cli.overview.unwrap_or(mosaic::DEFAULT_COLUMNS)),
        ),
    ];
    requested
        .into_iter()
        .filter(|(given, _, _)| *given)
        .min_by_key(|(_, id, _)| matches.index_of(id).unwrap_or(usize::MAX))
        .map_or(Action::Hexdump, |(_, _, action)| action)
}

fn render_options(cli: &Cli, profile: &GlyphProfile) -> Result<RenderOptions> {
    if !cli.neg {
        return Ok(RenderOptions::default());
    }
    if profile.negated {
        return Err(UsageError::NegUnavailable(profile.name.clone()).into());
    }
    Ok(RenderOptions::negated())
}

/// Load a profile by name (built-in) or path (.toml file).
fn load_profile(name_or_path: &str) -> Result<GlyphProfile> {
    if let Some(profile) = profile::builtin_profile(name_or_path) {
        return Ok(profile);
    }

    let toml_path = Path::new(name_or_path);
    if toml_path.exists() {
        let toml_str = std::fs::read_to_string(toml_path)
            .with_context(|| format!("reading {}", toml_path.display()))?;
        let profile = GlyphProfile::from_toml(&toml_str)
            .with_context(|| format!("parsing profile from {}", toml_path.display()))?;
        return Ok(profile);
    }

    Err(UsageError::UnknownProfile(name_or_path.to_string()).into())
}

fn load_glyphs(files: &[PathBuf], profile: &GlyphProfile) -> Result<GlyphSet> {
    let mut glyphs = GlyphSet::new();
    for path in files {
        log::debug!("reading {}", path.display());
        let glyph = Glyph::load(path, profile).with_context(|| path.display().to_string())?;
        glyphs.push(glyph);
    }
    Ok(glyphs)
}

fn write_stdout<F>(f: F) -> io::Result<()>
where
    F: FnOnce(&mut BufWriter<io::StdoutLock<'static>>) -> io::Result<()>,
{
    let mut out = BufWriter::new(io::stdout().lock());
    f(&mut out)?;
    out.flush()
}

fn cmd_overview(
    cli: &Cli,
    glyphs: &GlyphSet,
    columns: usize,
    options: RenderOptions,
) -> Result<()> {
    for glyph in glyphs {
        log::info!("process: {} ... ", glyph.source);
    }
    let pixmap = mosaic::compose(glyphs, columns, options)?;

    match (cli.format, &cli.output) {
        (OverviewFormat::Xpm, None) => {
            let mut out = BufWriter::new(io::stdout().lock());
            xpm::write(&mut out, "stdout", &pixmap).context("writing overview")?;
            out.flush().context("writing overview")?;
        }
        (OverviewFormat::Xpm, Some(path)) => {
            let file = File::create(path)
                .with_context(|| format!("creating {}", path.display()))?;
            let mut out = BufWriter::new(file);
            let name = path
                .file_stem()
                .map_or_else(|| "overview".into(), |stem| stem.to_string_lossy());
            xpm::write(&mut out, &name, &pixmap)
                .with_context(|| format!("writing {}", path.display()))?;
            out.flush()
                .with_context(|| format!("writing {}", path.display()))?;
            log::info!("wrote {}", path.display());
        }
        (OverviewFormat::Png, Some(path)) => {
            render_png::write_overview_png(&pixmap, cli.scale, path)?;
            log::info!("wrote {}", path.display());
        }
        (OverviewFormat::Png, None) => return Err(UsageError::PngNeedsOutput.into()),
    }
    Ok(())
}

fn cmd_list_profiles() {
    println!(
        "{:<10} {:>6} {:>6} {:>5} {:>6} {:>4}  {}",
        "Profile", "Size", "Colors", "Bits", "Bytes", "Neg", "Description"
    );
    println!("{}", "-".repeat(72));
    for name in profile::BUILTIN_NAMES {
        let Some(p) = profile::builtin_profile(name) else {
            continue;
        };
        println!(
            "{:<10} {:>6} {:>6} {:>5} {:>6} {:>4}  {}",
            p.name,
            format!("{}x{}", p.width, p.height),
            p.max_colors,
            format!("{}{}", p.bound_bits, if p.left_bound { "L" } else { "R" }),
            p.bound_bytes,
            if p.negated { "yes" } else { "no" },
            p.description,
        );
    }
}
