use clap::{Args, Parser, Subcommand, ValueEnum};
use glyphgrid_core::coords::ScanConfig;
use glyphgrid_core::fetch::{self, FetchConfig, HttpSource};
use glyphgrid_core::grid::Orientation;
use glyphgrid_core::pipeline::{self, DecodeConfig, Decoded, FileSource, Source, TracingReporter};
use glyphgrid_core::text::Extractor;

const RULE_WIDTH: usize = 30;

#[derive(Parser)]
#[command(name = "glyphgrid", about = "Decode block-glyph coordinate messages from published documents")]
struct Cli {
    /// Log level when RUST_LOG is unset (error, warn, info, debug, trace)
    #[arg(long, default_value = "info", global = true)]
    log_level: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Fetch a published document and render its message
    Fetch {
        /// The URL to fetch (defaults to the reference document)
        url: Option<String>,

        /// Overall request timeout in seconds
        #[arg(long, default_value_t = 10)]
        timeout: u64,

        /// Connection timeout in seconds
        #[arg(long, default_value_t = 10)]
        connect_timeout: u64,

        /// Override the User-Agent header
        #[arg(long)]
        user_agent: Option<String>,

        #[command(flatten)]
        decode: DecodeArgs,
    },
    /// Render the message from a local markup or text file
    Parse {
        /// The file to read (use - for stdin)
        file: String,

        #[command(flatten)]
        decode: DecodeArgs,
    },
}

#[derive(Args)]
struct DecodeArgs {
    /// Phrase that precedes the coordinate data
    #[arg(long, default_value = glyphgrid_core::coords::DEFAULT_ANCHOR)]
    anchor: String,

    /// Number of characters after the anchor to search
    #[arg(long, default_value_t = glyphgrid_core::coords::DEFAULT_WINDOW_CHARS)]
    window: usize,

    /// How markup is turned into text
    #[arg(long, value_enum, default_value_t = ExtractorArg::Strip)]
    extractor: ExtractorArg,

    /// Which clean grids to print
    #[arg(long, value_enum, default_value_t = Show::Both)]
    orientation: Show,

    /// Output as JSON instead of text grids
    #[arg(long)]
    json: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum ExtractorArg {
    Strip,
    Dom,
    Plain,
}

impl From<ExtractorArg> for Extractor {
    fn from(arg: ExtractorArg) -> Self {
        match arg {
            ExtractorArg::Strip => Extractor::Strip,
            ExtractorArg::Dom => Extractor::Dom,
            ExtractorArg::Plain => Extractor::Plain,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Show {
    Normal,
    Flipped,
    Both,
}

impl Show {
    fn orientations(self) -> &'static [Orientation] {
        match self {
            Show::Normal => &[Orientation::Normal],
            Show::Flipped => &[Orientation::Flipped],
            Show::Both => &[Orientation::Normal, Orientation::Flipped],
        }
    }
}

impl DecodeArgs {
    fn config(&self) -> DecodeConfig {
        DecodeConfig {
            scan: ScanConfig {
                anchor: self.anchor.clone(),
                window_chars: self.window,
            },
            extractor: self.extractor.into(),
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let (source, decode): (Box<dyn Source>, DecodeArgs) = match cli.command {
        Commands::Fetch {
            url,
            timeout,
            connect_timeout,
            user_agent,
            decode,
        } => {
            let mut config = FetchConfig {
                timeout_secs: timeout,
                connect_timeout_secs: connect_timeout,
                ..Default::default()
            };
            if let Some(ua) = user_agent {
                config.user_agent = ua;
            }
            let url = url.unwrap_or_else(|| fetch::DEFAULT_DOCUMENT_URL.to_string());
            (Box::new(HttpSource::new(url, config)) as Box<dyn Source>, decode)
        }
        Commands::Parse { file, decode } => (Box::new(FileSource::new(file)) as Box<dyn Source>, decode),
    };

    match pipeline::run(source.as_ref(), &decode.config(), &mut TracingReporter) {
        Ok(decoded) => {
            if decode.json {
                match serde_json::to_string_pretty(&decoded) {
                    Ok(json) => println!("{}", json),
                    Err(e) => {
                        eprintln!("Error: {}", e);
                        std::process::exit(1);
                    }
                }
            } else {
                print_grids(&decoded, decode.orientation);
            }
        }
        // TracingReporter has already logged the stop.
        Err(_) => std::process::exit(1),
    }
}

fn print_grids(decoded: &Decoded, show: Show) {
    let rendering = &decoded.rendering;
    let rule = "=".repeat(RULE_WIDTH);

    println!("coordinates: {}", decoded.coordinates.len());
    println!(
        "grid: {} x {}",
        rendering.bounds.width(),
        rendering.bounds.height()
    );
    println!("---");
    println!("{}", rendering.labeled(Orientation::Normal));

    for &orientation in show.orientations() {
        let title = match orientation {
            Orientation::Normal => "NORMAL ORIENTATION",
            Orientation::Flipped => "Y-FLIPPED ORIENTATION",
        };
        println!();
        println!("{}:", title);
        println!("{}", rule);
        println!("{}", rendering.grid(orientation));
        println!("{}", rule);
    }
}
