use anyhow::{Context, Result, bail};
use chunkwise::input::{self, InputText};
use chunkwise::{Chunk, ChunkStats, KeepSeparator, Language, SplitterConfig, TextSplitter};
use clap::{ArgAction, Parser, ValueEnum};
use std::collections::HashMap;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use tracing::debug;
use tracing_subscriber::EnvFilter;

/// Split text into overlapping, size-bounded chunks for embedding
#[derive(Parser, Debug)]
#[command(name = "chunkwise", version, about)]
struct Cli {
    /// Files or directories to split (reads stdin when omitted)
    paths: Vec<PathBuf>,

    /// TOML config file; flags override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Maximum chunk length in characters
    #[arg(short = 's', long)]
    chunk_size: Option<usize>,

    /// Overlap between adjacent chunks in characters
    #[arg(short = 'o', long)]
    chunk_overlap: Option<usize>,

    /// Separator, highest priority first; repeat for more (\n, \t and \\ are unescaped)
    #[arg(long = "separator", value_name = "SEP")]
    separators: Vec<String>,

    /// Treat separators as regular expressions
    #[arg(long)]
    regex: bool,

    /// Where matched separators are kept
    #[arg(long, value_enum)]
    keep_separator: Option<KeepArg>,

    /// Do not trim whitespace from chunk edges
    #[arg(long)]
    no_strip: bool,

    /// Separator preset (markdown, rust, python, ...) or "auto" to pick by file extension
    #[arg(short, long)]
    language: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Print chunk length statistics to stderr
    #[arg(long)]
    stats: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum KeepArg {
    None,
    Start,
    End,
}

impl From<KeepArg> for KeepSeparator {
    fn from(arg: KeepArg) -> Self {
        match arg {
            KeepArg::None => KeepSeparator::None,
            KeepArg::Start => KeepSeparator::Start,
            KeepArg::End => KeepSeparator::End,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    /// Chunk text separated by `---` lines
    Text,
    /// One JSON array of chunk records
    Json,
    /// One JSON chunk record per line
    Jsonl,
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let (config, auto_language) = resolve_config(&cli)?;
    let base = config.build().context("Invalid splitter configuration")?;

    let inputs = if cli.paths.is_empty() {
        vec![input::read_stdin()?]
    } else {
        input::collect_inputs(&cli.paths)?
    };

    let mut presets: HashMap<Language, TextSplitter> = HashMap::new();
    let mut chunks: Vec<Chunk> = Vec::new();

    for (document_index, source) in inputs.into_iter().enumerate() {
        let splitter = match (auto_language, source.language) {
            (true, Some(language)) => preset_for(&mut presets, &config, language)?,
            _ => &base,
        };

        debug!(source = %source.name, bytes = source.content.len(), "Splitting input");
        let document = InputText::into_document(source);
        chunks.extend(splitter.split_document(document_index, &document));
    }

    if cli.stats {
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        eprintln!("{}", ChunkStats::from_chunks(&texts, config.chunk_size));
    }

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    write_chunks(&mut out, &chunks, cli.format)?;
    out.flush().context("Failed to flush output")?;

    Ok(())
}

fn init_logging(verbose: u8) {
    let default = match verbose {
        0 => "chunkwise=info",
        1 => "chunkwise=debug",
        _ => "chunkwise=trace",
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Merge the config file (if any) with command-line overrides.
///
/// Returns the config and whether the language preset is picked per file.
fn resolve_config(cli: &Cli) -> Result<(SplitterConfig, bool)> {
    let mut config = match &cli.config {
        Some(path) => SplitterConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => SplitterConfig::default(),
    };

    if let Some(size) = cli.chunk_size {
        config.chunk_size = size;
    }
    if let Some(overlap) = cli.chunk_overlap {
        config.chunk_overlap = overlap;
    }
    if !cli.separators.is_empty() {
        config.separators = cli.separators.iter().map(|s| unescape(s)).collect();
        config.language = None;
    }
    if cli.regex {
        config.separator_regex = true;
    }
    if let Some(keep) = cli.keep_separator {
        config.keep_separator = keep.into();
    }
    if cli.no_strip {
        config.strip_whitespace = false;
    }

    let mut auto_language = false;
    match cli.language.as_deref() {
        None => {}
        Some("auto") => auto_language = true,
        Some(name) => match name.parse::<Language>() {
            Ok(language) => config.language = Some(language),
            Err(e) => bail!("{}", e),
        },
    }

    config.validate().context("Invalid splitter configuration")?;
    Ok((config, auto_language))
}

fn preset_for<'a>(
    presets: &'a mut HashMap<Language, TextSplitter>,
    config: &SplitterConfig,
    language: Language,
) -> Result<&'a TextSplitter> {
    if !presets.contains_key(&language) {
        let preset = SplitterConfig {
            language: Some(language),
            ..config.clone()
        };
        let splitter = preset
            .build()
            .with_context(|| format!("Invalid {} preset", language.as_str()))?;
        presets.insert(language, splitter);
    }
    presets
        .get(&language)
        .with_context(|| format!("Missing {} preset", language.as_str()))
}

fn write_chunks(out: &mut impl Write, chunks: &[Chunk], format: Format) -> Result<()> {
    match format {
        Format::Text => {
            for (i, chunk) in chunks.iter().enumerate() {
                if i > 0 {
                    writeln!(out, "---")?;
                }
                writeln!(out, "{}", chunk.text)?;
            }
        }
        Format::Json => {
            serde_json::to_writer_pretty(&mut *out, chunks).context("Failed to write JSON")?;
            writeln!(out)?;
        }
        Format::Jsonl => {
            for chunk in chunks {
                serde_json::to_writer(&mut *out, chunk).context("Failed to write JSON")?;
                writeln!(out)?;
            }
        }
    }
    Ok(())
}

/// Expand `\n`, `\t`, `\r` and `\\` escapes typed on the command line
fn unescape(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut chars = s.chars();
    while let Some(c) = chars.next() {
        if c != '\\' {
            result.push(c);
            continue;
        }
        match chars.next() {
            Some('n') => result.push('\n'),
            Some('t') => result.push('\t'),
            Some('r') => result.push('\r'),
            Some('\\') => result.push('\\'),
            Some(other) => {
                result.push('\\');
                result.push(other);
            }
            None => result.push('\\'),
        }
    }
    result
}
