use crate::models::{OptimizeParams, OptimizeRequest};
use crate::services::leverage_optimizer;
use crate::utils::get_price_data_dir;
use std::path::PathBuf;

pub fn run(request: OptimizeRequest, data_dir: Option<PathBuf>, json: bool) {
    let data_dir = data_dir.unwrap_or_else(get_price_data_dir);

    let result = OptimizeParams::try_from(request)
        .and_then(|params| leverage_optimizer::run(&params, &data_dir));

    let result = match result {
        Ok(result) => result,
        Err(e) => {
            eprintln!("❌ {}", e);
            std::process::exit(1);
        }
    };

    if json {
        match serde_json::to_string_pretty(&result) {
            Ok(body) => println!("{}", body),
            Err(e) => {
                eprintln!("❌ Failed to serialize result: {}", e);
                std::process::exit(1);
            }
        }
        return;
    }

    let first = result.dates.first().map(String::as_str).unwrap_or("-");
    let last = result.dates.last().map(String::as_str).unwrap_or("-");

    println!("📈 {} ({} → {}, {} closes)", result.ticker, first, last, result.prices.len());
    println!("   μ (mean daily return): {:.6}", result.mu);
    println!("   σ (daily std dev):     {:.6}", result.std);
    println!("   Optimal leverage:      {:.3}x", result.k_max);
    println!("   Expected daily growth: {:.6}", result.r_max);
    if let Some(r_fees) = result
        .k
        .iter()
        .position(|k| *k == result.k_max)
        .and_then(|index| result.r_fees.get(index))
    {
        println!("   After fees:            {:.6}", r_fees);
    }
}
