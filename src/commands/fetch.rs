use crate::models::{DateRange, TokenVenue};
use crate::services::{build_http_client, IndicatorRefresher, IndicatorStore, LeveragedTokenStore, TokenFeeds};
use crate::utils::get_http_timeout;
use std::time::Instant;

/// One refresh pass, then a per-indicator summary
pub async fn run(tokens: bool) {
    let timeout = get_http_timeout();
    let store = IndicatorStore::shared();

    let refresher = match IndicatorRefresher::from_defaults(store.clone(), timeout) {
        Ok(refresher) => refresher,
        Err(e) => {
            eprintln!("❌ Failed to configure indicator sources: {}", e);
            std::process::exit(1);
        }
    };

    println!("🔄 Fetching {} indicators...", refresher.adapter_count());
    let start = Instant::now();
    let report = refresher.refresh_all().await;
    println!("✅ Done in {:.1}s", start.elapsed().as_secs_f64());
    println!();

    for name in store.names().await {
        if let Some(series) = store.get_indicator(&name, &DateRange::unbounded()).await {
            let (first, last) = series.span().unwrap_or(("-", "-"));
            println!(
                "   📈 {:<32} {:>6} points  {} → {}  [{}]",
                name,
                series.len(),
                first,
                last,
                series.source
            );
        }
    }
    for name in &report.failed {
        println!("   ❌ {:<32} failed", name);
    }

    let price = store.get_bitcoin_price(&DateRange::unbounded()).await;
    println!();
    if report.bitcoin_price_updated {
        println!("   ₿  Bitcoin price: {} points", price.dates.len());
    } else {
        println!("   ⚠️  Bitcoin price: fetch failed");
    }
    println!(
        "📊 {} succeeded, {} failed",
        report.succeeded.len(),
        report.failed.len()
    );

    if !tokens {
        return;
    }

    let client = match build_http_client(timeout) {
        Ok(client) => client,
        Err(e) => {
            eprintln!("❌ Failed to configure token feeds: {}", e);
            std::process::exit(1);
        }
    };
    let token_store = LeveragedTokenStore::shared();
    let feeds = TokenFeeds::new(client, token_store.clone());

    println!();
    println!("🔄 Fetching leveraged token prices...");
    let token_report = feeds.refresh_all().await;
    println!(
        "   TLX:   {} stored, {} failed",
        token_store.asset_count(TokenVenue::Tlx).await,
        token_report.tlx_failed
    );
    println!(
        "   Toros: {} stored, {} failed",
        token_store.asset_count(TokenVenue::Toros).await,
        token_report.toros_failed
    );
}
