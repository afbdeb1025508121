use dealmap::analyzer::statistics::{postal_code_facets, summarize, tag_facets};
use dealmap::analyzer::{Analyzer, AnalyzerImpl};
use dealmap::config::{CityConfig, FeedSelection, load_config};
use dealmap::filter::{
    DealCriteria, DealKind, FilterCriteria, deal_listings, filter_deals, search_restaurants,
};
use dealmap::scraper::{Fetcher, fetcher_for, load_daily_changes, load_dataset, load_summary};
use dealmap::state::AppState;
use dealmap::utils::to_kebab_case;
use dealmap::view::{RestaurantCard, map_markers};

use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio::time::{Duration, sleep};
use tracing::{error, info, warn};

#[derive(Debug, Parser)]
#[command(name = "dealmap")]
#[command(about = "Merge, filter and rank restaurant deal feeds")]
struct Cli {
    /// Path to the JSON config file
    #[arg(long, default_value = "config.json")]
    config: PathBuf,

    /// City slug; defaults to the configured city
    #[arg(long)]
    city: Option<String>,

    /// Price bucket 1-4
    #[arg(long, value_parser = clap::value_parser!(u8).range(1..=4))]
    price: Option<u8>,

    /// Postal code prefix (exact code in the deals view)
    #[arg(long)]
    zip: Option<String>,

    /// Tag name
    #[arg(long)]
    tag: Option<String>,

    /// Case-insensitive text search
    #[arg(long)]
    search: Option<String>,

    /// Skip the Neotaste feed
    #[arg(long)]
    no_primary: bool,

    /// Skip the TheFork feed
    #[arg(long)]
    no_secondary: bool,

    /// Re-fetch every refresh interval until Ctrl-C
    #[arg(long)]
    watch: bool,

    #[command(subcommand)]
    view: Option<View>,
}

#[derive(Debug, Clone, Subcommand)]
enum View {
    /// Restaurant cards ranked by best deal
    Restaurants,
    /// Every deal, highest value first
    Deals {
        /// Require this tag; repeat to require several
        #[arg(long = "require-tag")]
        tags: Vec<String>,
    },
    /// Map markers
    Map,
    /// Summary, daily changes and dataset statistics
    Stats,
}

#[tokio::main]
async fn main() -> ExitCode {
    // Initialize logging
    tracing_subscriber::fmt::init();

    std::panic::set_hook(Box::new(|panic_info| {
        eprintln!("Panic occurred: {:?}", panic_info);
    }));

    let cli = Cli::parse();

    let config = match load_config(&cli.config) {
        Ok(cfg) => cfg,
        Err(e) => {
            error!("Config load error: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let city_slug = cli
        .city
        .as_deref()
        .map_or_else(|| config.default_city.clone(), to_kebab_case);
    let city = match config.city(&city_slug) {
        Ok(city) => city.clone(),
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };

    let fetcher = match fetcher_for(&config) {
        Ok(f) => f,
        Err(e) => {
            error!("Failed to create fetcher: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let feeds = FeedSelection {
        primary: config.feeds.primary && !cli.no_primary,
        secondary: config.feeds.secondary && !cli.no_secondary,
    };
    let view = cli.view.clone().unwrap_or(View::Restaurants);
    // The restaurant list searches tags too, so it applies the term itself.
    let criteria = FilterCriteria {
        price_bucket: cli.price,
        postal_prefix: cli.zip.clone(),
        tag: cli.tag.clone(),
        search: match view {
            View::Restaurants => None,
            _ => cli.search.clone(),
        },
    };

    let mut state = AppState::new(city.slug.clone(), feeds).with_criteria(criteria);

    loop {
        state = refresh(&state, fetcher.as_ref(), &city).await;
        render(&state, &view, &cli, &city, fetcher.as_ref()).await;

        if !cli.watch {
            break;
        }

        info!(
            "Waiting {}s before the next refresh (Ctrl-C to stop)...",
            config.refresh_interval_seconds
        );
        tokio::select! {
            _ = sleep(Duration::from_secs(config.refresh_interval_seconds)) => {
                info!("Timer triggered.");
            }
            _ = tokio::signal::ctrl_c() => {
                info!("Shutting down.");
                break;
            }
        }
    }

    ExitCode::SUCCESS
}

/// Fetches the city's feeds. On failure the previous dataset stays.
async fn refresh(state: &AppState, fetcher: &dyn Fetcher, city: &CityConfig) -> AppState {
    let (next, ticket) = state.begin_fetch();
    info!("Fetching {} (fetch #{})...", city.display_name(), ticket.generation());

    match load_dataset(fetcher, city, ticket.feeds).await {
        Ok(dataset) => next.apply_fetch(&ticket, dataset),
        Err(e) => {
            warn!("Error fetching data: {}", e);
            next
        }
    }
}

async fn render(state: &AppState, view: &View, cli: &Cli, city: &CityConfig, fetcher: &dyn Fetcher) {
    match view {
        View::Restaurants => print_restaurants(state, cli.search.as_deref()),
        View::Deals { tags } => print_deals(state, cli, tags),
        View::Map => print_map(state, city),
        View::Stats => print_stats(state, fetcher).await,
    }
}

fn print_restaurants(state: &AppState, search: Option<&str>) {
    let restaurants = match search.filter(|term| !term.is_empty()) {
        Some(term) => search_restaurants(&state.visible(), term),
        None => state.visible(),
    };
    println!("{} restaurants", restaurants.len());
    for restaurant in &restaurants {
        let card = RestaurantCard::of(restaurant);
        let both = if card.in_both_datasets { " [both feeds]" } else { "" };
        println!();
        println!("{} ({}){}", card.name, card.price, both);
        println!("  Rating: {}", card.rating);
        println!("  {}", card.address);
        if card.deals.is_empty() {
            println!("  No deals available");
        }
        for deal in &card.deals {
            println!("  - {}: {}", deal.title, deal.headline);
            for line in &deal.details {
                println!("      {}", line);
            }
            println!("      {}", deal.footer.join(" | "));
        }
    }
}

fn print_deals(state: &AppState, cli: &Cli, tags: &[String]) {
    let restaurants = state.merged();
    let listings = deal_listings(&restaurants);
    let criteria = DealCriteria {
        search: cli.search.clone(),
        postal_code: cli.zip.clone(),
        tags: tags.iter().chain(&cli.tag).cloned().collect(),
        price_bucket: cli.price,
    };
    let filtered = filter_deals(&listings, &criteria);

    println!("{} deals", filtered.len());
    for listing in filtered {
        let source = match listing.kind {
            DealKind::Fixed(_) => "Neotaste",
            DealKind::Discount { additional: false, .. } => "TheFork",
            DealKind::Discount { additional: true, .. } => "TheFork (Additional)",
        };
        println!(
            "{:>8.2}  {}  {}  [{}] {}",
            listing.value,
            listing.restaurant.name(),
            listing.description(),
            listing.restaurant.postal_code(),
            source
        );
    }
}

fn print_map(state: &AppState, city: &CityConfig) {
    let markers = map_markers(&state.visible());
    println!(
        "Map of {} centered at {:.4}, {:.4}: {} markers",
        city.display_name(),
        city.center[0],
        city.center[1],
        markers.len()
    );
    for marker in markers {
        println!(
            "{:>9.5} {:>9.5}  {}  ({})",
            marker.coordinates.latitude,
            marker.coordinates.longitude,
            marker.name,
            marker.popup.join("; ")
        );
    }
}

async fn print_stats(state: &AppState, fetcher: &dyn Fetcher) {
    match load_summary(fetcher).await {
        Ok(summary) => {
            let report = summarize(&summary);
            println!("Last Updated: {}", report.last_updated);
            println!("Total Restaurants: {}", report.total_restaurants);
            for (label, value) in report.chart.labels.iter().zip(&report.chart.values) {
                println!("  {}  {}", label, value);
            }
            match load_daily_changes(fetcher, &summary.last_updated).await {
                Ok(changes) => {
                    println!("New Restaurants: {}", or_none(&changes.new_restaurants));
                    println!("Removed Restaurants: {}", or_none(&changes.removed_restaurants));
                }
                Err(e) => warn!("Daily changes unavailable: {}", e),
            }
        }
        Err(e) => warn!("Summary unavailable: {}", e),
    }

    let merged = state.merged();
    let stats = AnalyzerImpl::new().calculate_stats(&merged);
    println!(
        "Dataset: {} total, {} primary only, {} secondary only, {} in both",
        stats.total, stats.primary_only, stats.secondary_only, stats.merged
    );
    println!(
        "Deals: {} restaurants, avg best deal {:.2} € (std dev {:.2})",
        stats.with_deals, stats.avg_deal_value, stats.deal_value_std_dev
    );
    println!("Tags: {}", tag_facets(&merged).join(", "));
    println!("Postal codes: {}", postal_code_facets(&merged).join(", "));
}

fn or_none(names: &[String]) -> String {
    if names.is_empty() {
        "None".to_string()
    } else {
        names.join(", ")
    }
}
