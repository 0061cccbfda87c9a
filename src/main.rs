// Main entry point - Dependency injection and command dispatch
use std::{net::SocketAddr, sync::Arc, time::Duration};

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use property_leads::application::dashboard_api::DashboardApi;
use property_leads::application::dashboard_service::{DashboardController, WidgetBinding};
use property_leads::application::lead_form::{LeadFormController, LeadSubmitError};
use property_leads::domain::filters::{DateRange, FilterField, Filters};
use property_leads::domain::lead::LeadField;
use property_leads::infrastructure::config::{AppConfig, load_app_config};
use property_leads::infrastructure::http_api_client::HttpApiClient;
use property_leads::infrastructure::mock_api::MockDashboardApi;
use property_leads::presentation::app_state::AppState;
use property_leads::presentation::dashboard_view::{not_found, render_dashboard};
use property_leads::presentation::handlers::router;

const SETTLE_TIMEOUT: Duration = Duration::from_secs(15);
const WATCH_INTERVAL: Duration = Duration::from_secs(5);

/// Property lead capture and analytics dashboard client.
#[derive(Debug, Parser)]
#[command(name = "property-leads", version, about, arg_required_else_help = true)]
struct Cli {
    /// Override the API base URL from configuration.
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,
    /// Use the in-process mock backend instead of HTTP.
    #[arg(long, global = true)]
    mock: bool,
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Serve the mock backend over HTTP.
    Serve(ServeArgs),
    /// Render a dashboard to the terminal.
    Dashboard(DashboardArgs),
    /// Validate and submit a property lead.
    SubmitLead(SubmitLeadArgs),
    /// List submitted leads.
    Leads(LeadsArgs),
    /// Show the dimensions and measures the backend can query.
    Schema,
}

#[derive(Debug, Args)]
struct ServeArgs {
    /// Address to bind, e.g. 127.0.0.1:3001
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,
}

#[derive(Debug, Args)]
struct DashboardArgs {
    /// Dashboard id
    #[arg(default_value = "main")]
    id: String,
    /// One of 7d, 30d, 90d, 1y
    #[arg(long, default_value = "30d")]
    date_range: DateRange,
    #[arg(long)]
    region: Option<String>,
    #[arg(long)]
    property_type: Option<String>,
    /// Start table widgets on this page (1-based)
    #[arg(long, value_parser = clap::value_parser!(u32).range(1..))]
    page: Option<u32>,
    /// Keep rendering as widgets poll until interrupted
    #[arg(long)]
    watch: bool,
}

#[derive(Debug, Args)]
struct SubmitLeadArgs {
    #[arg(long)]
    name: String,
    #[arg(long)]
    phone: String,
    #[arg(long)]
    email: String,
    #[arg(long)]
    property_area: String,
    #[arg(long)]
    property_type: String,
    #[arg(long)]
    budget: Option<String>,
    #[arg(long)]
    message: Option<String>,
}

#[derive(Debug, Args)]
struct LeadsArgs {
    #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
    page: u32,
    #[arg(long, default_value_t = 20)]
    limit: u32,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = load_app_config()?;

    match cli.command {
        Command::Serve(args) => serve(&config, args).await,
        Command::Dashboard(args) => dashboard(api_for(&cli.api_url, cli.mock, &config), &config, args).await,
        Command::SubmitLead(args) => submit_lead(api_for(&cli.api_url, cli.mock, &config), args).await,
        Command::Leads(args) => leads(api_for(&cli.api_url, cli.mock, &config), args).await,
        Command::Schema => schema(api_for(&cli.api_url, cli.mock, &config)).await,
    }
}

fn mock_api(config: &AppConfig) -> MockDashboardApi {
    MockDashboardApi::new(Duration::from_millis(config.server.submit_delay_ms))
}

fn api_for(api_url: &Option<String>, mock: bool, config: &AppConfig) -> Arc<dyn DashboardApi> {
    if mock {
        return Arc::new(mock_api(config));
    }
    let base_url = api_url.as_deref().unwrap_or(&config.api.base_url);
    tracing::debug!(base_url, "Using HTTP API");
    Arc::new(HttpApiClient::new(base_url))
}

async fn serve(config: &AppConfig, args: ServeArgs) -> anyhow::Result<()> {
    let addr: SocketAddr = match args.bind {
        Some(addr) => addr,
        None => config.server.bind.parse()?,
    };
    let state = Arc::new(AppState {
        api: mock_api(config),
    });

    tracing::info!("Starting mock leads API on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, router(state)).await?;

    Ok(())
}

async fn dashboard(api: Arc<dyn DashboardApi>, config: &AppConfig, args: DashboardArgs) -> anyhow::Result<()> {
    let mut filters = Filters::new(args.date_range, None, None);
    if let Some(region) = &args.region {
        filters = filters.with_field(FilterField::Region, region)?;
    }
    if let Some(property_type) = &args.property_type {
        filters = filters.with_field(FilterField::PropertyType, property_type)?;
    }

    let controller = match DashboardController::load(api, &args.id, filters, config.dashboard.clone()).await {
        Ok(controller) => controller,
        Err(e) => {
            tracing::error!("Failed to load dashboard: {}", e);
            println!("{}", not_found(&args.id));
            return Err(e.into());
        }
    };

    if let Some(page) = args.page {
        for widget in controller.widgets() {
            if let WidgetBinding::Table(table) = &widget.binding {
                table.source().set_page(page);
            }
        }
    }

    if !controller.settled(SETTLE_TIMEOUT).await {
        tracing::warn!("Some widgets are still loading");
    }
    println!("{}", render_dashboard(&controller));

    if !args.watch {
        return Ok(());
    }

    let mut ticker = tokio::time::interval(WATCH_INTERVAL);
    ticker.tick().await;
    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => break,
            _ = ticker.tick() => {
                println!("\n{}", render_dashboard(&controller));
            }
        }
    }
    Ok(())
}

async fn submit_lead(api: Arc<dyn DashboardApi>, args: SubmitLeadArgs) -> anyhow::Result<()> {
    let mut form = LeadFormController::new();
    form.set_field(LeadField::Name, args.name);
    form.set_field(LeadField::Phone, args.phone);
    form.set_field(LeadField::Email, args.email);
    form.set_field(LeadField::PropertyArea, args.property_area);
    form.set_field(LeadField::PropertyType, args.property_type);
    form.set_field(LeadField::Budget, args.budget.unwrap_or_default());
    form.set_field(LeadField::Message, args.message.unwrap_or_default());

    let outcome = form.submit(api.as_ref()).await;
    if let Some(notice) = form.take_notice() {
        println!("{}\n{}", notice.title, notice.description);
    }

    match outcome {
        Ok(lead_id) => {
            if let Some(lead_id) = lead_id {
                println!("Lead ID: {}", lead_id);
            }
            Ok(())
        }
        Err(LeadSubmitError::Invalid(errors)) => {
            for error in &errors.0 {
                eprintln!("{}: {}", error.field, error.message);
            }
            Err(errors.into())
        }
        Err(e) => Err(e.into()),
    }
}

async fn leads(api: Arc<dyn DashboardApi>, args: LeadsArgs) -> anyhow::Result<()> {
    let page = api.leads(args.page, args.limit).await?;
    for lead in &page.leads {
        println!(
            "{:<20} {:<28} {:<14} {:<14} {}",
            lead.name, lead.email, lead.phone, lead.property_area, lead.property_type
        );
    }
    println!("{} of {} leads", page.leads.len(), page.total);
    Ok(())
}

async fn schema(api: Arc<dyn DashboardApi>) -> anyhow::Result<()> {
    let (dimensions, measures) = tokio::try_join!(api.dimensions(), api.measures())?;
    println!("Dimensions: {}", dimensions.join(", "));
    println!("Measures: {}", measures.join(", "));
    Ok(())
}
