use std::error::Error;
use std::fs;
use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};

use report_pdf::layout::{LayoutOptions, RenderProfile};
use report_pdf::model::ReportRecord;
use report_pdf::render;

const FILENAME_LABEL: &str = "daily_site_report";
const DEFAULT_TITLE: &str = "Daily Site Report";

/// Renders daily construction-site reports to PDF from the command line.
#[derive(Parser)]
#[command(author, version, about = "Daily site report PDF generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a report record (JSON) to `daily_site_report_<date>.pdf`.
    #[command(name = "render")]
    Render(RenderArgs),

    /// Render a built-in sample record to `sample_report.pdf`.
    #[command(name = "sample")]
    Sample,
}

#[derive(clap::Args)]
struct RenderArgs {
    /// Path to the JSON record; reads stdin when omitted.
    #[arg(long)]
    input: Option<PathBuf>,

    /// Directory the PDF is written into.
    #[arg(long, default_value = ".")]
    out_dir: PathBuf,

    /// Open the first page with a bold title line.
    #[arg(long)]
    titled: bool,

    /// Drive folder id to upload the PDF into after writing it locally.
    #[arg(long)]
    drive_folder: Option<String>,

    /// OAuth bearer token for the upload; falls back to DRIVE_ACCESS_TOKEN.
    #[arg(long)]
    access_token: Option<String>,
}

fn main() {
    env_logger::init();
    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Render(args) => run_render(args),
        Commands::Sample => run_sample(),
    };

    if let Err(err) = result {
        eprintln!("Error: {}", err);
        print_error_sources(err.as_ref());
        std::process::exit(1);
    }
}

fn run_render(args: RenderArgs) -> Result<(), Box<dyn Error>> {
    let record = read_record(args.input.as_deref())?;
    let profile = if args.titled {
        RenderProfile::titled(DEFAULT_TITLE)
    } else {
        RenderProfile::plain()
    };

    let document = render::render(&record, &profile, &LayoutOptions::default())?;
    let filename = record.suggested_filename(FILENAME_LABEL);
    let path = args.out_dir.join(&filename);
    fs::write(&path, &document.bytes)?;
    println!(
        "Generated {} ({} pages, {} bytes)",
        path.display(),
        document.page_count,
        document.bytes.len()
    );

    // The local file is in place before any upload attempt; upload failures
    // are reported but never discard the rendered document.
    if let Some(folder_id) = args.drive_folder.as_deref() {
        upload_document(folder_id, args.access_token, &filename, &document.bytes)?;
    }

    Ok(())
}

#[cfg(feature = "upload")]
fn upload_document(
    folder_id: &str,
    access_token: Option<String>,
    filename: &str,
    bytes: &[u8],
) -> Result<(), Box<dyn Error>> {
    use report_pdf::upload::{DriveClient, StorageSink, UploadRequest, PDF_MIME};

    let token = match access_token.or_else(|| std::env::var("DRIVE_ACCESS_TOKEN").ok()) {
        Some(token) => token,
        None => {
            return Err(
                "no access token: pass --access-token or set DRIVE_ACCESS_TOKEN".into(),
            )
        }
    };

    let client = DriveClient::new(token);
    let request = UploadRequest {
        folder_id,
        file_name: filename,
        mime_type: PDF_MIME,
        bytes,
    };

    match client.upload(&request) {
        Ok(uploaded) => {
            println!("Uploaded to Drive, file id {}", uploaded.id);
            if let Some(link) = uploaded.view_link {
                println!("View it at {}", link);
            }
        }
        Err(err) => {
            log::warn!("upload failed: {err}");
            eprintln!("Upload failed: {}", err);
            eprintln!("Hint: {}", err.remediation());
        }
    }

    Ok(())
}

#[cfg(not(feature = "upload"))]
fn upload_document(
    _folder_id: &str,
    _access_token: Option<String>,
    _filename: &str,
    _bytes: &[u8],
) -> Result<(), Box<dyn Error>> {
    eprintln!("This binary was built without the upload feature; skipping upload.");
    Ok(())
}

fn run_sample() -> Result<(), Box<dyn Error>> {
    let record = sample_record();
    let document = render::render(
        &record,
        &RenderProfile::titled(DEFAULT_TITLE),
        &LayoutOptions::default(),
    )?;
    fs::write("sample_report.pdf", &document.bytes)?;
    println!(
        "Generated sample_report.pdf ({} pages, {} bytes)",
        document.page_count,
        document.bytes.len()
    );
    Ok(())
}

fn read_record(input: Option<&std::path::Path>) -> Result<ReportRecord, Box<dyn Error>> {
    let json = match input {
        Some(path) => fs::read_to_string(path)?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(serde_json::from_str(&json)?)
}

fn sample_record() -> ReportRecord {
    ReportRecord {
        date: chrono::Local::now().date_naive(),
        site: "North Yard".into(),
        weather: "Sunny".into(),
        manager: "Site Manager".into(),
        workers: "5".into(),
        safety: "Toolbox talk held.\nPPE checked at gate.".into(),
        work: "Formwork for slab B2.\nRebar delivery inspected.".into(),
        issues: "None.".into(),
        tomorrow: "Pour slab B2, weather permitting.".into(),
    }
}

fn print_error_sources(mut error: &(dyn Error + 'static)) {
    while let Some(source) = error.source() {
        eprintln!("  caused by: {}", source);
        error = source;
    }
}
