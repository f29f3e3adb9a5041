mod commands;
mod output;

use clap::{Args, Parser, Subcommand};
use commands::Backend;
use rust_decimal::Decimal;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "productible",
    version,
    about = "Consolidated MET / PVGIS photovoltaic yield reports"
)]
struct Cli {
    /// Text extraction backend: auto (default), pdftotext or lopdf
    #[arg(long, global = true, value_enum, default_value_t = Backend::Auto)]
    backend: Backend,

    /// Show debug logging (RUST_LOG overrides)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the detected source format of a PDF (MET, PVGIS or UNKNOWN)
    Detect {
        /// Path to the PDF
        pdf_file: PathBuf,
    },
    /// Extract one monthly series from a page of a PDF
    Extract {
        /// Path to the PDF
        pdf_file: PathBuf,

        /// 1-based page holding the monthly table
        #[arg(long)]
        page: String,

        /// energy or irradiation
        #[arg(long, default_value = "energy")]
        metric: String,

        /// Unit of the energy column: kWh (default) or MWh
        #[arg(long, default_value = "kWh")]
        unit: String,

        /// Output format: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Build the full report from a MET and a PVGIS document
    Report(ReportArgs),
    /// Run or check JSON report jobs
    Job {
        #[command(subcommand)]
        action: JobAction,
    },
}

#[derive(Args)]
struct ReportArgs {
    /// MET (simulation) report PDF
    #[arg(long, value_name = "PDF")]
    met: PathBuf,

    /// PVGIS report PDF
    #[arg(long, value_name = "PDF")]
    pvgis: PathBuf,

    /// 1-based page holding the monthly table, in both documents
    #[arg(long)]
    page: String,

    /// Annual P50 of the MET report, in MWh
    #[arg(long)]
    p50_met: Decimal,

    /// Annual P90 of the MET report, in MWh
    #[arg(long)]
    p90_met: Decimal,

    /// Annual P50 of the PVGIS report, in MWh
    #[arg(long)]
    p50_pvgis: Decimal,

    /// Annual P90 of the PVGIS report, in MWh
    #[arg(long)]
    p90_pvgis: Decimal,

    /// Panel tilt in degrees (0-90)
    #[arg(long)]
    tilt: u32,

    /// Panel orientation in degrees (0-360, 0 = North)
    #[arg(long)]
    orientation: u32,

    /// Facing direction: Est or Ouest
    #[arg(long)]
    direction: String,

    /// Site code, also used in the default output file name
    #[arg(long)]
    site_code: String,

    /// Analyst in charge of the study
    #[arg(long)]
    analyst: Option<String>,

    /// Project power or free comment
    #[arg(long)]
    comment: Option<String>,

    /// Unit of the energy column: kWh (default) or MWh
    #[arg(long, default_value = "kWh")]
    unit: String,

    /// Logo (JPEG or PNG) printed above the title
    #[arg(long, value_name = "IMAGE")]
    logo: Option<PathBuf>,

    /// Technical summary (TRS) appended after the report
    #[arg(long, value_name = "PDF")]
    trs: Option<PathBuf>,

    /// Wiring diagram appended last
    #[arg(long, value_name = "PDF")]
    wiring: Option<PathBuf>,

    /// Output PDF (default: Productible_<site_code>.pdf)
    #[arg(long, value_name = "FILE")]
    out: Option<PathBuf>,

    /// Output format of the printed data: table (default) or json
    #[arg(short, long, default_value = "table")]
    output: String,
}

#[derive(Subcommand)]
enum JobAction {
    /// Produce the report described by a job file
    Run {
        /// Path to JSON job file
        file: PathBuf,

        /// Output format of the printed data: table (default) or json
        #[arg(short, long, default_value = "table")]
        output: String,
    },
    /// Validate a job file without reading the PDFs
    Validate {
        /// Path to JSON job file
        file: PathBuf,
    },
    /// Print the job file format with field descriptions and example
    Schema,
}

fn init_logging(verbose: bool) {
    let level = if verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    pretty_env_logger::formatted_builder()
        .filter_level(level)
        .parse_env("RUST_LOG")
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let backend = cli.backend;
    let result = match cli.command {
        Commands::Detect { pdf_file } => commands::detect::run(&pdf_file, backend),
        Commands::Extract {
            pdf_file,
            page,
            metric,
            unit,
            output,
        } => commands::extract::run(&pdf_file, &page, &metric, &unit, &output, backend),
        Commands::Report(args) => commands::report::run(args, backend),
        Commands::Job { action } => match action {
            JobAction::Run { file, output } => commands::job::run(&file, &output, backend),
            JobAction::Validate { file } => commands::job::validate(&file),
            JobAction::Schema => commands::job::schema(),
        },
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
