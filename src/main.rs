use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use textract::config::{AppConfig, DEFAULT_MAX_FILE_SIZE};
use textract::core::format::SUPPORTED_EXTENSIONS;
use textract::core::model::ExtractionReport;
use textract::core::FileKind;
use textract::export::text_export::DOWNLOAD_MIME;
use textract::export::{Exporter, JsonExporter, TextExporter};
use textract::ocr::renderer::DEFAULT_DPI;
use textract::pipeline::{locate_tesseract, Extractor};
use textract::UploadedFile;

#[derive(Parser, Debug)]
#[command(name = "textract")]
#[command(version, about = "Extract plain text from images, PDFs, Word documents and text files", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Tesseract executable to use instead of the platform defaults
    #[arg(long, global = true, env = "TESSERACT_PATH")]
    tesseract: Option<PathBuf>,

    /// Tesseract language list, e.g. `eng+deu`
    #[arg(long, global = true, env = "TESSERACT_LANG")]
    lang: Option<String>,

    /// Raise log verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Extract text from a single file
    Extract {
        /// Input file (txt, pdf, docx, jpg, jpeg, png, bmp)
        input: PathBuf,

        #[command(flatten)]
        options: ExtractOptions,

        /// Print only the extracted text
        #[arg(short, long)]
        quiet: bool,
    },

    /// Extract text from several files
    Batch {
        /// Input files
        inputs: Vec<PathBuf>,

        #[command(flatten)]
        options: ExtractOptions,
    },

    /// Show OCR availability and supported formats
    Status,
}

#[derive(Args, Debug, Clone)]
struct ExtractOptions {
    /// Directory for the `<name>_extracted` artifacts
    #[arg(short, long, default_value = ".")]
    output: PathBuf,

    /// Artifact format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Do not write any artifact
    #[arg(long)]
    no_save: bool,

    /// Reject inputs larger than this many bytes (0 disables the check)
    #[arg(long, default_value_t = DEFAULT_MAX_FILE_SIZE)]
    max_file_size: u64,

    /// Rendering DPI for scanned PDF pages
    #[arg(long, default_value_t = DEFAULT_DPI)]
    dpi: u32,
}

/// How much of a single extraction goes to stdout.
#[derive(Clone, Copy, Debug, PartialEq)]
enum Output {
    Full,
    TextOnly,
    Silent,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq)]
enum Format {
    Text,
    Json,
}

impl ExtractOptions {
    fn config(&self, tesseract: Option<PathBuf>, lang: Option<String>) -> AppConfig {
        AppConfig {
            tesseract,
            lang,
            max_file_size: self.max_file_size,
            dpi: self.dpi,
            output_dir: self.output.clone(),
        }
    }
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Extract {
            input,
            options,
            quiet,
        } => {
            let config = options.config(cli.tesseract, cli.lang);
            let extractor = Extractor::from_config(&config, locate_tesseract(&config));
            let output = if quiet { Output::TextOnly } else { Output::Full };
            extract_single(&extractor, &config, options.format, input, output, options.no_save)
                .map(|_| ())
        }
        Commands::Batch { inputs, options } => {
            let config = options.config(cli.tesseract, cli.lang);
            let extractor = Extractor::from_config(&config, locate_tesseract(&config));
            extract_batch(&extractor, &config, options.format, inputs, options.no_save)
        }
        Commands::Status => show_status(cli.tesseract, cli.lang),
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

fn extract_single(
    extractor: &Extractor,
    config: &AppConfig,
    format: Format,
    input: PathBuf,
    output: Output,
    no_save: bool,
) -> Result<ExtractionReport> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }
    if !input.is_file() {
        anyhow::bail!("Input is not a file: {}", input.display());
    }

    let name = input
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .ok_or_else(|| anyhow!("Input has no file name: {}", input.display()))?;
    let bytes = fs::read(&input).with_context(|| format!("Failed to read {}", input.display()))?;
    let upload = UploadedFile::new(name, bytes);

    let full = output == Output::Full;
    if full {
        println!("[*] File: {}", upload.name);
        println!("[*] Type: {}", upload.mime_type);
        println!("[*] Size: {:.1} KB", upload.size_kb());
    }

    if let FileKind::Unsupported(extension) = upload.kind() {
        anyhow::bail!("Unsupported file type: {extension}");
    }
    if !config.admits(upload.size) {
        anyhow::bail!(
            "File is too large: {:.1} KB exceeds the {:.1} KB limit",
            upload.size_kb(),
            config.max_file_size as f64 / 1024.0
        );
    }

    if full {
        println!("\n[+] Extracting text...");
    }

    let report = extractor
        .process(&upload)
        .map_err(|err| anyhow!("Processing error: {err}"))?;
    let text = report.rendered();

    if output == Output::TextOnly {
        println!("{text}");
    } else if full {
        for notice in &report.notices {
            if notice.is_warning() {
                eprintln!("[!] {notice}");
            } else {
                println!("[✓] {notice}");
            }
        }

        let stats = report.stats();
        println!(
            "[*] Characters: {} | Words: {} | Lines: {}",
            stats.characters, stats.words, stats.lines
        );
        println!("\n--- Extracted Text ---\n{text}\n----------------------");
    }

    if !no_save {
        let saved = TextExporter::new(config.output_dir.clone())
            .export(&upload, &report)
            .with_context(|| format!("Failed to export to: {}", config.output_dir.display()))?;
        if full {
            println!("\n[✓] Saved: {} ({DOWNLOAD_MIME})", saved.display());
        }

        if format == Format::Json {
            let saved = JsonExporter::new(config.output_dir.clone()).export(&upload, &report)?;
            if full {
                println!("[✓] Saved: {}", saved.display());
            }
        }
    }

    Ok(report)
}

fn extract_batch(
    extractor: &Extractor,
    config: &AppConfig,
    format: Format,
    inputs: Vec<PathBuf>,
    no_save: bool,
) -> Result<()> {
    if inputs.is_empty() {
        anyhow::bail!("No input files specified");
    }

    println!("[*] Batch processing {} file(s)", inputs.len());
    println!("[*] Output: {}\n", config.output_dir.display());

    let mut success = 0;
    let mut failed = 0;

    for (i, input) in inputs.iter().enumerate() {
        println!("[{}/{}] Processing: {}", i + 1, inputs.len(), input.display());

        match extract_single(extractor, config, format, input.clone(), Output::Silent, no_save) {
            Ok(report) => match report.extraction.diagnostic() {
                Some(diagnostic) if diagnostic.is_failure() => {
                    eprintln!("  [✗] Failed: {diagnostic}");
                    failed += 1;
                }
                _ => {
                    println!("  [✓] Success");
                    success += 1;
                }
            },
            Err(e) => {
                eprintln!("  [✗] Failed: {e}");
                failed += 1;
            }
        }
        println!();
    }

    println!("\n[*] Summary: {success} succeeded, {failed} failed");

    if failed > 0 {
        anyhow::bail!("{failed} file(s) failed to process");
    }

    Ok(())
}

fn show_status(tesseract: Option<PathBuf>, lang: Option<String>) -> Result<()> {
    let config = AppConfig {
        tesseract,
        lang,
        ..AppConfig::default()
    };

    println!("Text Extraction Status");
    println!("======================");
    match locate_tesseract(&config) {
        Some(engine) => {
            println!("OCR: Enabled ({})", engine.path().display());
            println!("  Language: {}", engine.lang().unwrap_or("tesseract default"));
        }
        None => {
            println!("OCR: Not installed");
            println!("  Image and scanned PDF extraction are unavailable.");
            println!("  Install Tesseract (https://github.com/tesseract-ocr/tesseract)");
            println!("  or point TESSERACT_PATH at the executable.");
        }
    }

    println!("\nSupported formats:");
    for ext in SUPPORTED_EXTENSIONS {
        println!("  .{ext:<5} -> {}", FileKind::from_extension(ext));
    }

    Ok(())
}
