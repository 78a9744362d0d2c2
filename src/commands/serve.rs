use crate::server::{self, AppState, ServerPaths};
use crate::services::{
    build_http_client, shared_health_stats, IndicatorRefresher, IndicatorStore, LeveragedTokenStore,
    TokenFeeds,
};
use crate::utils::{
    get_http_timeout, get_price_data_dir, get_public_dir, get_reference_doc_path, get_refresh_interval,
};
use crate::worker::{self, RefreshSchedule};

/// Threads in the dedicated worker runtime
const WORKER_THREADS: usize = 2;

pub async fn run(port: u16) {
    println!("🚀 Starting cryptodash server on port {}", port);

    let paths = ServerPaths {
        price_data_dir: get_price_data_dir(),
        reference_doc: get_reference_doc_path(),
        public_dir: get_public_dir(),
    };
    println!("📁 Price data directory: {}", paths.price_data_dir.display());
    println!("📄 Reference document:   {}", paths.reference_doc.display());
    println!("🌍 Public directory:     {}", paths.public_dir.display());

    let schedule = RefreshSchedule::from_interval(get_refresh_interval());
    let timeout = get_http_timeout();
    println!("⏰ Refresh schedule: {} (HTTP timeout {}s)", schedule, timeout.as_secs());

    let indicator_store = IndicatorStore::shared();
    let token_store = LeveragedTokenStore::shared();
    let health_stats = shared_health_stats();

    let refresher = match IndicatorRefresher::from_defaults(indicator_store.clone(), timeout) {
        Ok(refresher) => refresher,
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure indicator sources");
            eprintln!("❌ Failed to configure indicator sources: {}", e);
            std::process::exit(1);
        }
    };
    let token_feeds = match build_http_client(timeout) {
        Ok(client) => TokenFeeds::new(client, token_store.clone()),
        Err(e) => {
            tracing::error!(error = %e, "Failed to configure token feeds");
            eprintln!("❌ Failed to configure token feeds: {}", e);
            std::process::exit(1);
        }
    };

    // Workers get their own runtime so slow upstream sites never starve HTTP handlers
    println!("⚙️  Creating dedicated worker runtime ({} threads)...", WORKER_THREADS);
    let worker_health_indicator = health_stats.clone();
    let worker_health_token = health_stats.clone();

    std::thread::spawn(move || {
        let worker_runtime = match tokio::runtime::Builder::new_multi_thread()
            .worker_threads(WORKER_THREADS)
            .thread_name("worker-pool")
            .enable_all()
            .build()
        {
            Ok(runtime) => runtime,
            Err(e) => {
                tracing::error!(error = %e, "Failed to create worker runtime");
                return;
            }
        };

        worker_runtime.block_on(async move {
            println!("⚡ Spawning indicator worker ({})...", schedule);
            tokio::spawn(async move {
                worker::run_indicator_worker(refresher, schedule, worker_health_indicator).await;
            });

            println!("⚡ Spawning leveraged token worker ({})...", schedule);
            tokio::spawn(async move {
                worker::run_token_worker(token_feeds, schedule, worker_health_token).await;
            });

            // Keep runtime alive
            tokio::signal::ctrl_c().await.ok();
        });
    });

    println!("🌐 Starting HTTP server...");
    println!();

    let app_state = AppState::new(indicator_store, token_store, health_stats, paths);
    if let Err(e) = server::serve(app_state, port).await {
        eprintln!("❌ Server error: {}", e);
        std::process::exit(1);
    }
}
