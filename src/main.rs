use std::fs;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use helpview::{Config, IncompleteParse, RenderedDocument};

#[derive(Clone, Copy, ValueEnum)]
enum Format {
    /// Plain text, as a text widget would display it
    Text,
    /// Typst markup carrying fonts, sizes and margins
    Typst,
}

#[derive(Parser)]
#[command(name = "helpview")]
#[command(about = "Render a Sphinx help page as styled text and a table of contents")]
struct Cli {
    /// Input HTML file
    input: PathBuf,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,

    /// Print the table of contents instead of the document
    #[arg(long)]
    toc: bool,

    /// TOML config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Base font size (overrides config)
    #[arg(long)]
    font_size: Option<u32>,
}

fn main() {
    env_logger::Builder::new()
        .filter_level(log::LevelFilter::Warn)
        .parse_default_env()
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(&cli) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

fn run(cli: &Cli) -> Result<(), helpview::Error> {
    let mut config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::compiled_default(),
    };
    if let Some(size) = cli.font_size {
        config.font.size = size;
    }

    // A structural error still leaves usable output behind
    let (doc, failure) = match helpview::render_file(&cli.input) {
        Ok(doc) => (doc, None),
        Err(helpview::Error::Incomplete(IncompleteParse { error, partial })) => {
            (partial, Some(error))
        }
        Err(e) => return Err(e),
    };
    log::info!(
        "{}: {} segments, {} toc entries",
        cli.input.display(),
        doc.segments.len(),
        doc.toc.len()
    );

    let rendered = render(&doc, cli, &config);

    match &cli.output {
        Some(path) => {
            if let Err(e) = fs::write(path, rendered) {
                eprintln!("Error writing {}: {}", path.display(), e);
                std::process::exit(1);
            }
        }
        None => print!("{}", rendered),
    }

    match failure {
        Some(error) => Err(IncompleteParse {
            error,
            partial: doc,
        }
        .into()),
        None => Ok(()),
    }
}

fn render(doc: &RenderedDocument, cli: &Cli, config: &Config) -> String {
    match (cli.toc, cli.format) {
        (true, Format::Text) => doc
            .toc
            .iter()
            .map(|entry| format!("{}\t{}\n", entry.label, doc.text_index(entry)))
            .collect(),
        (true, Format::Typst) => helpview::toc_to_typst(&doc.toc),
        (false, Format::Text) => {
            let mut text = doc.text();
            if !text.ends_with('\n') {
                text.push('\n');
            }
            text
        }
        (false, Format::Typst) => helpview::document_to_typst(doc, config),
    }
}
