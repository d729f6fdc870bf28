use std::time::Duration;

use radios::domain::{FilterBy, ListOptions, Order, SearchOptions, StationFilter};
use radios::{RadioBrowser, RadioBrowserConfig, RadioBrowserError};
use tracing::info;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Station used to demonstrate lookups and click registration.
const DEMO_STATION: &str = "9608b51d-0601-11e8-ae97-52543be04c81";

#[tokio::main]
async fn main() -> Result<(), RadioBrowserError> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("radios=info"));
    tracing_subscriber::registry()
        .with(fmt::layer().with_target(true))
        .with(filter)
        .init();

    let user_agent =
        std::env::var("RADIOS_USER_AGENT").unwrap_or_else(|_| "radios-demo/0.1".to_string());
    let mut config = RadioBrowserConfig::new(user_agent);
    if let Some(secs) = std::env::var("RADIOS_TIMEOUT_SECS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
    {
        config = config.with_timeout(Duration::from_secs(secs));
    }
    if let Ok(host) = std::env::var("RADIOS_HOST") {
        config = config.with_host(host);
    }

    let radios = RadioBrowser::new(config)?;

    let stats = radios.stats().await?;
    info!(
        host = radios.host().await.unwrap_or_default(),
        version = %stats.software_version,
        stations = stats.stations,
        "connected"
    );

    let top = ListOptions::default()
        .with_limit(10)
        .with_order(Order::ClickCount)
        .with_reverse(true);

    println!("Top stations:");
    for station in radios.stations(None, &top).await? {
        println!("  {} ({})", station.name, station.click_count);
    }

    match radios.station(DEMO_STATION).await? {
        Some(station) => println!(
            "\n{} from {}: {}",
            station.name,
            station.country().unwrap_or("unknown country"),
            station.url_resolved
        ),
        None => println!("\nstation {DEMO_STATION} not found"),
    }

    println!("\nTop stations in the Netherlands:");
    let dutch = StationFilter::new(FilterBy::CountryCodeExact, "NL");
    for station in radios.stations(Some(&dutch), &top).await? {
        println!("  {} ({})", station.name, station.click_count);
    }

    radios.station_click(DEMO_STATION).await?;

    let popular = ListOptions::default()
        .with_limit(10)
        .with_order(Order::StationCount)
        .with_reverse(true);
    let first_ten = ListOptions::default().with_limit(10);
    let (tags, countries, languages) = futures::try_join!(
        radios.tags(&popular),
        radios.countries(&first_ten),
        radios.languages(&first_ten),
    )?;

    println!("\nTags:");
    for tag in tags {
        println!("  {} ({})", tag.name, tag.station_count);
    }
    println!("\nCountries:");
    for country in countries {
        println!("  {} {} ({})", country.code, country.name, country.station_count);
    }
    println!("\nLanguages:");
    for language in languages {
        println!("  {} ({})", language.name, language.station_count);
    }

    println!("\nSearch \"538\":");
    let found = radios
        .search(
            None,
            &ListOptions::default().with_limit(10),
            &SearchOptions::default().with_name("538"),
        )
        .await?;
    for station in found {
        println!("  {} [{} kbps {}]", station.name, station.bitrate, station.codec);
    }

    radios.close();
    Ok(())
}
