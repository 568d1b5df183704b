//! pdfmeasure CLI - measurement extraction tool

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::time::Duration;

use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use pdfmeasure::measure::measure_page;
use pdfmeasure::report::summary_csv;
use pdfmeasure::{
    extract_levels, parse_file_with_options, ExtractionReport, Extractor, MeasureOptions,
    OutputPaths, PageSelection, ParseOptions, ReportWriter, ServiceConfig,
};

type CliResult = Result<(), Box<dyn std::error::Error>>;

#[derive(Parser)]
#[command(name = "pdfmeasure")]
#[command(version)]
#[command(about = "Extract and classify measurements from PDF documents", long_about = None)]
struct Cli {
    /// Input PDF file
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Output directory
    #[arg(value_name = "OUTPUT")]
    output: Option<PathBuf>,

    #[command(flatten)]
    engine: EngineArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Settings shared by every command.
#[derive(Args, Clone)]
struct EngineArgs {
    /// Loose numbers above this value are assumed to be millimetres
    #[arg(long, global = true, value_name = "VALUE")]
    threshold: Option<f64>,

    /// Text formatting endpoint
    #[arg(long, global = true, env = "PDFMEASURE_LLM_URL", value_name = "URL")]
    llm_url: Option<String>,

    /// Image analysis endpoint
    #[arg(long, global = true, env = "PDFMEASURE_VISION_URL", value_name = "URL")]
    vision_url: Option<String>,

    /// Timeout for each service request, in seconds
    #[arg(long, global = true, default_value = "120", value_name = "SECS")]
    timeout: u64,

    /// Process pages one at a time
    #[arg(long, global = true)]
    sequential: bool,
}

impl EngineArgs {
    fn measure_options(&self) -> MeasureOptions {
        match self.threshold {
            Some(threshold) => MeasureOptions::new().with_threshold(threshold),
            None => MeasureOptions::new(),
        }
    }

    fn service_config(&self) -> ServiceConfig {
        let mut config = ServiceConfig::new().with_timeout(Duration::from_secs(self.timeout));
        if let Some(ref url) = self.llm_url {
            config = config.with_llm_url(url);
        }
        if let Some(ref url) = self.vision_url {
            config = config.with_vision_url(url);
        }
        config
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Extract measurements and write the full report
    Extract {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Output directory
        #[arg(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Measure plain text read from a file or stdin
    Measure {
        /// Input text file (stdin if not specified)
        #[arg(value_name = "FILE")]
        input: Option<PathBuf>,

        /// Print records and totals as JSON
        #[arg(long)]
        json: bool,
    },

    /// Show per-page totals of a PDF
    Summary {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,

        /// Print as CSV
        #[arg(long)]
        csv: bool,
    },

    /// Print lines mentioning FFL or Level
    Levels {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,

        /// Page range (e.g., "1-10", "1,3,5")
        #[arg(long)]
        pages: Option<String>,
    },

    /// Show document information
    Info {
        /// Input PDF file
        #[arg(value_name = "FILE")]
        input: PathBuf,
    },

    /// Show version information
    Version,
}

fn main() {
    env_logger::init();

    let cli = Cli::parse();
    let engine = cli.engine;

    let result = match cli.command {
        Some(Commands::Extract {
            input,
            output,
            pages,
        }) => cmd_extract(&input, output.as_deref(), pages.as_deref(), &engine),
        Some(Commands::Measure { input, json }) => cmd_measure(input.as_deref(), json, &engine),
        Some(Commands::Summary { input, pages, csv }) => {
            cmd_summary(&input, pages.as_deref(), csv, &engine)
        }
        Some(Commands::Levels { input, pages }) => cmd_levels(&input, pages.as_deref()),
        Some(Commands::Info { input }) => cmd_info(&input),
        Some(Commands::Version) => {
            cmd_version();
            Ok(())
        }
        None => {
            // Default behavior: extract if input is provided
            if let Some(input) = cli.input {
                cmd_extract(&input, cli.output.as_deref(), None, &engine)
            } else {
                println!("{}", "Usage: pdfmeasure <FILE> [OUTPUT]".yellow());
                println!("       pdfmeasure --help for more information");
                Ok(())
            }
        }
    };

    if let Err(e) = result {
        eprintln!("{}: {}", "Error".red().bold(), e);
        std::process::exit(1);
    }
}

fn page_selection(pages: Option<&str>) -> Result<PageSelection, Box<dyn std::error::Error>> {
    match pages {
        Some(p) => Ok(PageSelection::parse(p).map_err(|e| format!("Invalid page range: {}", e))?),
        None => Ok(PageSelection::All),
    }
}

#[cfg(feature = "remote")]
fn attach_services(
    extractor: Extractor,
    config: &ServiceConfig,
) -> Result<Extractor, Box<dyn std::error::Error>> {
    use std::sync::Arc;

    let mut extractor = extractor;
    if let Some(formatter) = pdfmeasure::LlmFormatter::from_config(config)? {
        log::info!("Formatting page text through {:?}", config.llm_url);
        extractor = extractor.with_formatter(Arc::new(formatter));
    }
    if let Some(analyzer) = pdfmeasure::VisionAnalyzer::from_config(config)? {
        log::info!("Analyzing images through {:?}", config.vision_url);
        extractor = extractor.with_analyzer(Arc::new(analyzer));
    }
    Ok(extractor)
}

#[cfg(not(feature = "remote"))]
fn attach_services(
    extractor: Extractor,
    config: &ServiceConfig,
) -> Result<Extractor, Box<dyn std::error::Error>> {
    if config.llm_url.is_some() || config.vision_url.is_some() {
        log::warn!("Built without the `remote` feature; service endpoints are ignored");
    }
    Ok(extractor)
}

fn build_extractor(
    engine: &EngineArgs,
    parse: ParseOptions,
) -> Result<Extractor, Box<dyn std::error::Error>> {
    let mut extractor = Extractor::new()
        .with_parse_options(parse)
        .with_measure_options(engine.measure_options());
    if engine.sequential {
        extractor = extractor.sequential();
    }
    attach_services(extractor, &engine.service_config())
}

fn cmd_extract(
    input: &Path,
    output: Option<&Path>,
    pages: Option<&str>,
    engine: &EngineArgs,
) -> CliResult {
    let output_dir = output
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("output"));

    let options = ParseOptions::new()
        .lenient()
        .with_pages(page_selection(pages)?);
    let extractor = build_extractor(engine, options)?;

    let pb = ProgressBar::new(3);
    pb.set_style(
        ProgressStyle::default_bar()
            .template("{spinner:.green} [{bar:40.cyan/blue}] {msg}")?
            .progress_chars("#>-"),
    );

    pb.set_message("Parsing PDF...");
    let parser = pdfmeasure::PdfParser::open_with_options(input, extractor.options().parse.clone())?;
    let document = parser.parse()?;
    pb.inc(1);

    pb.set_message(format!("Measuring {} pages...", document.page_count()));
    let report = extractor.extract_document(&document);
    pb.inc(1);

    pb.set_message("Writing report...");
    let paths = ReportWriter::new(&output_dir).write(input, &report)?;
    pb.inc(1);

    pb.finish_with_message("Done!");

    print_totals(&report);
    print_outputs(&paths);

    Ok(())
}

fn print_totals(report: &ExtractionReport) {
    println!("\n{}", "Totals per page:".green().bold());
    for totals in &report.summary {
        println!(
            "  {} {}",
            format!("page {:>3}", totals.page_number).dimmed(),
            totals.summary_line()
        );
    }
    println!(
        "  {} {} records, {} level lines",
        "└─".dimmed(),
        report.record_count(),
        report.levels().count()
    );
}

fn print_outputs(paths: &OutputPaths) {
    let name = |p: &Path| {
        p.file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    };

    println!("\n{} {}", "Output files in".green().bold(), paths.folder.display());
    println!("  {} page_N.txt ({} pages)", "├─".dimmed(), paths.page_texts.len());
    if !paths.images.is_empty() {
        println!(
            "  {} images/ ({} images, {} analyses)",
            "├─".dimmed(),
            paths.images.len(),
            paths.analyses.len()
        );
    }
    println!(
        "  {} {}/ ({} sheets)",
        "├─".dimmed(),
        name(paths.workbook_dir.as_path()),
        paths.sheets.len()
    );
    println!("  {} {}", "├─".dimmed(), name(paths.workbook_json.as_path()));
    println!("  {} {}", "└─".dimmed(), name(paths.summary_csv.as_path()));
}

fn cmd_measure(input: Option<&Path>, json: bool, engine: &EngineArgs) -> CliResult {
    let text = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buf = String::new();
            std::io::stdin().read_to_string(&mut buf)?;
            buf
        }
    };

    let page = measure_page(1, &text, &engine.measure_options());

    if json {
        println!("{}", serde_json::to_string_pretty(&page)?);
        return Ok(());
    }

    for record in &page.records {
        println!(
            "{:>16}  {:<18} {}",
            record.value(),
            record.unit().to_string().cyan(),
            record.source().to_string().dimmed()
        );
    }
    if page.unknown_count() > 0 {
        println!(
            "{} {} values need unit confirmation",
            "Note:".yellow(),
            page.unknown_count()
        );
    }
    println!("{}", page.totals.summary_line().bold());

    Ok(())
}

fn cmd_summary(input: &Path, pages: Option<&str>, csv: bool, engine: &EngineArgs) -> CliResult {
    let options = ParseOptions::new()
        .lenient()
        .text_only()
        .with_pages(page_selection(pages)?);
    let report = build_extractor(engine, options)?.extract_file(input)?;

    if csv {
        print!("{}", summary_csv(&report.summary)?);
        return Ok(());
    }

    println!(
        "{}",
        format!(
            "{:>6} {:>16} {:>16} {:>16} {:>16}",
            "Page", "sq m", "mm", "m", "unknown"
        )
        .cyan()
        .bold()
    );
    println!("{}", "─".repeat(74).dimmed());
    for t in &report.summary {
        println!(
            "{:>6} {:>16} {:>16} {:>16} {:>16}",
            t.page_number, t.total_sq_m, t.total_mm, t.total_m, t.total_unknown
        );
    }
    let total = report.summary.grand_total();
    println!("{}", "─".repeat(74).dimmed());
    println!(
        "{}",
        format!(
            "{:>6} {:>16} {:>16} {:>16} {:>16}",
            "All", total.total_sq_m, total.total_mm, total.total_m, total.total_unknown
        )
        .bold()
    );

    Ok(())
}

fn cmd_levels(input: &Path, pages: Option<&str>) -> CliResult {
    let options = ParseOptions::new()
        .lenient()
        .text_only()
        .with_pages(page_selection(pages)?);
    let doc = parse_file_with_options(input, options)?;

    let mut count = 0;
    for page in &doc.pages {
        for level in extract_levels(&page.text, page.number) {
            println!("{} {}", format!("page {:>3}:", level.page).dimmed(), level.line);
            count += 1;
        }
    }

    println!("\n{} {} level lines", "Done!".green().bold(), count);

    Ok(())
}

fn cmd_info(input: &Path) -> CliResult {
    // Metadata is shown even if text extraction fails on some pages
    let options = ParseOptions::new().lenient();
    let doc = parse_file_with_options(input, options)?;

    println!("{}", "Document Information".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    println!("{}: {}", "File".bold(), input.display());
    for (property, value) in doc.metadata.properties() {
        println!("{}: {}", property.bold(), value);
    }

    println!();
    println!("{}", "Content Statistics".cyan().bold());
    println!("{}", "─".repeat(40).dimmed());

    let words: usize = doc
        .pages
        .iter()
        .map(|p| p.text.split_whitespace().count())
        .sum();
    let measurements: usize = doc
        .pages
        .iter()
        .map(|p| measure_page(p.number, &p.text, &MeasureOptions::default()).records.len())
        .sum();

    println!("{}: {}", "Words".bold(), words);
    println!("{}: {}", "Measurements".bold(), measurements);
    println!("{}: {}", "Images".bold(), doc.image_count());
    println!("{}: {}", "Annotations".bold(), doc.annotation_count());

    Ok(())
}

fn cmd_version() {
    println!(
        "{} {}",
        "pdfmeasure".cyan().bold(),
        env!("CARGO_PKG_VERSION")
    );
    println!("Measurement extraction for PDF documents");
    println!();
    println!("License: MIT");
}
