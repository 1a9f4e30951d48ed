mod domain;
mod infra;
mod report;

use std::env;
use std::process::ExitCode;

use crate::infra::cache::{default_cache_path, CacheStore, DEFAULT_CACHE_TTL};
use crate::infra::hypixel::HypixelClient;
use crate::report::{DataSource, ProfitReport, ReportProducer};

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let Ok(api_key) = env::var("API_KEY") else {
        eprintln!("API_KEY is not set; add it to .env or the environment");
        return ExitCode::FAILURE;
    };

    let client = match HypixelClient::new(api_key) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("failed to build API client: {e}");
            return ExitCode::FAILURE;
        }
    };

    let cache = CacheStore::new(default_cache_path(), DEFAULT_CACHE_TTL);
    let report = ReportProducer::new(cache, client).generate().await;
    render(&report);
    ExitCode::SUCCESS
}

/// Fixed-width table, one row per flip candidate.
fn render(report: &ProfitReport) {
    if report.records.is_empty() {
        println!("No pets found for analysis.");
        return;
    }

    let origin = match report.source {
        DataSource::Fresh => "fresh",
        DataSource::Cached => "cached",
    };
    println!(
        "Top {} pets to level up ({} listings, {origin} data)",
        report.records.len(),
        report.listing_count
    );
    println!(
        "{:<24}{:>16}{:>18}{:>14}",
        "Pet", "Lvl 1 price", "Lvl 100 price", "Net profit"
    );
    println!("{}", "=".repeat(72));
    for record in &report.records {
        println!(
            "{:<24}{:>16}{:>18}{:>14}",
            record.pet_name, record.min_lvl1_price, record.min_lvl100_price, record.net_profit
        );
    }
}
