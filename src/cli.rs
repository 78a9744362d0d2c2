use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::commands;

#[derive(Parser)]
#[command(name = "cryptodash")]
#[command(about = "Crypto valuation dashboard backend", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the HTTP server and background refresh workers
    Serve {
        /// Port to listen on
        #[arg(short, long, env = "PORT", default_value_t = 5000)]
        port: u16,
    },
    /// Run one refresh pass against every source and print a summary
    Fetch {
        /// Also poll the TLX and Toros leveraged token feeds
        #[arg(long)]
        tokens: bool,
    },
    /// Compute the optimal leverage for a ticker's price file
    Optimize {
        /// Ticker symbol; reads {TICKER}-USD.csv
        #[arg(short, long)]
        ticker: String,

        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        start_date: Option<String>,

        /// End date (YYYY-MM-DD)
        #[arg(long)]
        end_date: Option<String>,

        /// Lower bound of the leverage grid
        #[arg(long)]
        lower_lev: Option<f64>,

        /// Upper bound of the leverage grid
        #[arg(long)]
        upper_lev: Option<f64>,

        /// Annual fees in percent
        #[arg(long)]
        fees: Option<f64>,

        /// Directory holding the price files (defaults to PRICE_DATA_DIR)
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Print the full result as JSON
        #[arg(long)]
        json: bool,
    },
}

pub async fn run() {
    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port } => {
            commands::serve::run(port).await;
        }
        Commands::Fetch { tokens } => {
            commands::fetch::run(tokens).await;
        }
        Commands::Optimize {
            ticker,
            start_date,
            end_date,
            lower_lev,
            upper_lev,
            fees,
            data_dir,
            json,
        } => {
            let request = crate::models::OptimizeRequest {
                ticker: Some(ticker),
                start_date,
                end_date,
                lower_lev,
                upper_lev,
                fees,
            };
            commands::optimize::run(request, data_dir, json);
        }
    }
}
