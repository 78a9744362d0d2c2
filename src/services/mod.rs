pub mod health;
pub mod indicator_store;
pub mod leverage_optimizer;
pub mod refresher;
pub mod sources;
pub mod token_feeds;
pub mod zscore;

pub use health::{shared_health_stats, HealthStats, SharedHealthStats};
pub use indicator_store::{IndicatorStore, PriceSeries, SharedIndicatorStore};
pub use leverage_optimizer::OptimizeError;
pub use refresher::{IndicatorRefresher, RefreshReport};
pub use sources::{build_http_client, FetchError, SourceAdapter, SourceConfig};
pub use token_feeds::{LeveragedTokenStore, SharedTokenStore, TokenFeeds, TokenRefreshReport};
