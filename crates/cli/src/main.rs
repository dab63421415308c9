use chrono::Local;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use api_shared::HealthService;
use medinext_core::constants::{DEFAULT_PAGE_SIZE, ENV_DATASET_PATH};
use medinext_core::{resolve_dataset_path, CoreConfig, DashboardService, DatasetSource};
use medinext_insight::{is_guardrail_violation, SuperwiseClient, SuperwiseConfig};

mod render;

#[derive(Parser)]
#[command(name = "medinext")]
#[command(about = "MediNext clinical dashboard CLI")]
struct Cli {
    /// Dataset file (CSV or JSON); overrides MEDINEXT_DATASET
    #[arg(long, global = true)]
    dataset: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Search and list patients
    List {
        /// Case-insensitive search term
        #[arg(long)]
        search: Option<String>,
        /// Page number (1-based)
        #[arg(long, default_value_t = 1)]
        page: usize,
        /// Page size: 10, 20, 50 or 100
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,
    },
    /// Show one patient record
    Show {
        /// Patient ID
        patient_id: String,
    },
    /// Request an AI clinical interpretation for one patient
    Analyze {
        /// Patient ID
        patient_id: String,
    },
    /// Dashboard card figures
    Metrics,
    /// Distributions and averages
    Analytics,
    /// Recent patient activities
    Activity,
    /// Today's appointments
    Appointments,
    /// Current prescriptions
    Prescriptions,
    /// Report dataset source and AI configuration
    CheckConfig,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("medinext_core=warn".parse()?)
                .add_directive("medinext_insight=warn".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    let dataset_override = cli
        .dataset
        .or_else(|| std::env::var(ENV_DATASET_PATH).ok().map(PathBuf::from));
    let core_cfg = CoreConfig::new(resolve_dataset_path(dataset_override));
    let service = DashboardService::from_config(&core_cfg);
    let today = Local::now().date_naive();

    match cli.command {
        Some(Commands::List {
            search,
            page,
            page_size,
        }) => match service.list_patients(search.as_deref().unwrap_or(""), page, page_size) {
            Ok(page) if page.total_records == 0 => println!("No patients found."),
            Ok(page) => println!("{}", render::patient_page(&page)),
            Err(e) => eprintln!("Error listing patients: {}", e),
        },
        Some(Commands::Show { patient_id }) => match service.patient(&patient_id) {
            Ok(record) => println!("{}", render::patient_detail(record, record.age_on(today))),
            Err(e) => eprintln!("Error: {}", e),
        },
        Some(Commands::Analyze { patient_id }) => {
            let excerpt = match service.clinical_excerpt(&patient_id, today) {
                Ok(excerpt) => excerpt,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            };
            let client = SuperwiseClient::new(Arc::new(SuperwiseConfig::from_env()?));
            let correlation_id = uuid::Uuid::new_v4().simple().to_string();

            println!("Analyzing patient {}...", patient_id.trim());
            let result = client.analyze(&excerpt, &correlation_id);
            match result.text() {
                Some(text) if is_guardrail_violation(text) => {
                    println!("Guardrail violation: the request was blocked by the AI platform.");
                    println!("{}", text);
                }
                Some(text) => println!("{}", text),
                None => eprintln!("{}", result.user_message()),
            }
        }
        Some(Commands::Metrics) => {
            println!("{}", render::metrics(&service.dashboard_metrics(today)));
        }
        Some(Commands::Analytics) => match service.analytics(today) {
            Some(analytics) => println!("{}", render::analytics(&analytics)),
            None => println!("No patient data available for analytics."),
        },
        Some(Commands::Activity) => {
            let feed = service.activity_feed(Local::now().naive_local());
            println!("{}", render::activity(&feed));
        }
        Some(Commands::Appointments) => {
            println!("{}", render::appointments(&service.appointments()));
        }
        Some(Commands::Prescriptions) => {
            println!("{}", render::prescriptions(&service.prescriptions()));
        }
        Some(Commands::CheckConfig) => {
            println!("{}", HealthService::check_health().message);
            match service.dataset().source() {
                DatasetSource::File(path) => println!(
                    "Dataset: {} ({} patients)",
                    path.display(),
                    service.dataset().len()
                ),
                DatasetSource::Sample => println!(
                    "Dataset: built-in sample ({} not found or invalid)",
                    core_cfg.dataset_path().display()
                ),
            }
            match SuperwiseConfig::from_env() {
                Ok(cfg) if cfg.is_valid() => println!(
                    "Superwise API: configured (version {}, timeout {}s, {} retries, {}s delay)",
                    cfg.api_version(),
                    cfg.timeout().as_secs(),
                    cfg.max_retries(),
                    cfg.retry_delay().as_secs()
                ),
                Ok(_) => println!(
                    "Superwise API: not configured (set SUPERWISE_API_URL and SUPERWISE_APP_ID)"
                ),
                Err(e) => println!("Superwise API: invalid configuration: {}", e),
            }
        }
        None => {
            println!("Use --help for available commands.");
        }
    }

    Ok(())
}
