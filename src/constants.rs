//! Source tables and fixed parameters
//!
//! ## Indicator sources
//!
//! Every valuation indicator on the dashboard comes from one of four public
//! chart sites. The tables below are the full configured set; the refresher
//! builds one adapter per row.
//!
//! | Source          | Access                          | Stored under        |
//! |-----------------|---------------------------------|---------------------|
//! | WooCharts       | shared chart JSON               | JSON key            |
//! | CheckOnChain    | Plotly page, embedded JSON      | trace name          |
//! | LookIntoBitcoin | Dash `_dash-update-component`   | chart slug          |
//! | ChainExposed    | Plotly page, inline `trace1`    | configured name     |

/// Shared WooCharts data file holding every oscillator series
pub const WOOCHARTS_DATA_URL: &str = "https://woocharts.com/bitcoin-macro-oscillator/data/chart.json";

/// (JSON key, human URL)
pub const WOOCHARTS_INDICATORS: &[(&str, &str)] = &[
    ("index", "https://woocharts.com/bitcoin-macro-oscillator/"),
    ("mvrv_z", "https://woocharts.com/bitcoin-mvrv-z/"),
];

/// (page URL, trace name)
pub const CHECKONCHAIN_INDICATORS: &[(&str, &str)] = &[
    ("https://charts.checkonchain.com/btconchain/pricing/pricing_mvrv_aviv_zscore/pricing_mvrv_aviv_zscore_light.html", "AVIV Z-Score"),
    ("https://charts.checkonchain.com/btconchain/pricing/pricing_mvrv_all_zscore/pricing_mvrv_all_zscore_light.html", "MVRV Z-Score"),
    ("https://charts.checkonchain.com/btconchain/pricing/pricing_mvrv_sth_zscore/pricing_mvrv_sth_zscore_light.html", "STH-MVRV Z-Score"),
    ("https://charts.checkonchain.com/btconchain/pricing/pricing_nupl_bycohort/pricing_nupl_bycohort_light.html", "LTH-NUPL"),
    ("https://charts.checkonchain.com/btconchain/pricing/pricing_mayermultiple_zscore/pricing_mayermultiple_zscore_light.html", "Mayer Multiple Z"),
    ("https://charts.checkonchain.com/btconchain/realised/realised_sopr/realised_sopr_light.html", "SOPR 7D-EMA"),
    ("https://charts.checkonchain.com/btconchain/lifespan/lifespan_reserverisk/lifespan_reserverisk_light.html", "Reserve Risk (Adjusted)"),
    ("https://charts.checkonchain.com/btconchain/mining/mining_difficultyregression/mining_difficultyregression_light.html", "Difficulty Multiple"),
];

/// (trace name, chart slug, Dash endpoint, human URL)
pub const LOOKINTOBITCOIN_INDICATORS: &[(&str, &str, &str, &str)] = &[
    (
        "Oscillator",
        "pi_cycle_top_bottom_indicator",
        "https://www.lookintobitcoin.com/django_plotly_dash/app/pi_cycle_top_bottom_indicator/_dash-update-component",
        "https://www.lookintobitcoin.com/charts/pi-cycle-top-bottom-indicator/",
    ),
    (
        "VDD Multiple",
        "value-days-destroyed-multiple",
        "https://www.lookintobitcoin.com/django_plotly_dash/app/vdd_multiple/_dash-update-component",
        "https://www.lookintobitcoin.com/charts/value-days-destroyed-multiple/",
    ),
];

/// (stored name, page URL)
pub const CHAINEXPOSED_INDICATORS: &[(&str, &str)] = &[
    ("MVRV", "https://chainexposed.com/XthMVRVShortTermHolderAddress.html"),
];

/// Bitcoin price reference line: the `Price` trace of the Mayer Multiple page
pub const BITCOIN_PRICE_URL: &str =
    "https://charts.checkonchain.com/btconchain/pricing/pricing_mayermultiple_zscore/pricing_mayermultiple_zscore_light.html";
pub const BITCOIN_PRICE_NAME: &str = "Price";

/// Marker identifying the chart script on Plotly pages
pub const PLOTLY_MARKER: &str = "Plotly.newPlot";

/// Leverage optimizer defaults
pub const DEFAULT_START_DATE: &str = "2023-01-01";
pub const DEFAULT_END_DATE: &str = "2024-06-19";
pub const DEFAULT_LOWER_LEVERAGE: f64 = 0.0;
pub const DEFAULT_UPPER_LEVERAGE: f64 = 5.0;
pub const DEFAULT_FEES_PERCENT: f64 = 0.0;

/// Number of points in the leverage grid
pub const LEVERAGE_GRID_POINTS: usize = 100;

/// Percent-per-year to fraction-per-day divisor (÷100 then ÷365)
pub const FEE_DAYS_DIVISOR: f64 = 36500.0;

/// Historical price files are `{TICKER}{suffix}` inside the price data dir
pub const PRICE_FILE_SUFFIX: &str = "-USD.csv";

/// TLX price API; `{address}` is the token contract
pub const TLX_PRICE_URL: &str = "https://api.tlx.fi/functions/v1/prices";
pub const TLX_PRICE_QUERY: &str = "granularity=24hours&from=1990-01-01T00:00:00.000Z";

/// (asset key, contract address)
pub const TLX_TOKENS: &[(&str, &str)] = &[
    ("ETH1L", "0xda08D59CaAdF87c59D56101670B5e023A0593B34"),
    ("ETH2L", "0x46A0277d53274cAfbb089e9870d2448e4224dAD9"),
    ("ETH3L", "0xC013551A4c84BBcec4f75DBb8a45a444E2E9bbe7"),
    ("ETH4L", "0x330cA3de269282fD456dB203046d500633D68F11"),
    ("ETH5L", "0x0b79C19c4929B2FA2CFb4c8ad7649c03cde00Efa"),
    ("BTC1L", "0x169d4884be225b322963912Df3641948143FF92B"),
    ("BTC2L", "0xc1422a15de4B7ED22EEedaEA2a4276De542C7a77"),
    ("BTC3L", "0x54cC16d2c91F6fa0a30d4C22868459085A7CE4d9"),
    ("BTC4L", "0xCb9fB365f52BF2e49f7e76b7E8dd3e068171D136"),
    ("BTC5L", "0x8efd20F6313eB0bc61908b3eB95368BE442A149d"),
    ("SOL1L", "0x09C2774DC4658D367162bE0bf8226F14bE4F52e6"),
    ("SOL2L", "0x94cC3a994Af812628Fa50f0a4ABe1E2085618Fb8"),
    ("SOL3L", "0xe4DA85B92aE54ebF736EB51f0E962859454662fa"),
    ("SOL4L", "0xA2D72bEeF65dC3544446B3C710a0E1Fa1778e55d"),
    ("SOL5L", "0xCf81EcA92Fc32F3a1EcFC1c7f5Ab6bCF59795278"),
];

/// dHEDGE GraphQL endpoint serving Toros candles
pub const TOROS_GRAPHQL_URL: &str = "https://api-v2.dhedge.org/graphql";
pub const TOROS_CANDLE_PERIOD: &str = "3m";
pub const TOROS_CANDLE_INTERVAL: &str = "1d";

/// Toros close prices are 18-decimal fixed point
pub const TOROS_PRICE_SCALE: f64 = 1e18;

/// (chain:asset key, vault address)
pub const TOROS_TOKENS: &[(&str, &str)] = &[
    ("ARB:ETHBULL3X", "0xf715724abba480d4d45f4cb52bef5ce5e3513ccc"),
    ("MATIC:ETHBULL3X", "0x32b1d1bfd4b3b0cb9ff2dcd9dac757aa64d4cb69"),
    ("OP:ETHBULL3X", "0x32b1d1bfd4b3b0cb9ff2dcd9dac757aa64d4cb69"),
    ("OP:ETHBULL2X", "0x9573c7b691cdcebbfa9d655181f291799dfb7cf5"),
    ("ARB:BTCBULL3X", "0xad38255febd566809ae387d5be66ecd287947cb9"),
    ("MATIC:BTCBULL3X", "0xdb88ab5b485b38edbeef866314f9e49d095bce39"),
    ("OP:BTCBULL4x", "0x11b55966527ff030ca9c7b1c548b4be5e7eaee6d"),
    ("OP:BTCBULL3X", "0xb03818de4992388260b62259361778cf98485dfe"),
    ("OP:BTCBULL2X", "0x32ad28356ef70adc3ec051d8aacdeeaa10135296"),
    ("OP:SOLBULL3X", "0xcc7d6ed524760539311ed0cdb41d0852b4eb77eb"),
    ("OP:SOLLBULL2X", "0x7d3c9c6566375d7ad6e89169ca5c01b5edc15364"),
];

pub const TOROS_CANDLES_QUERY: &str = "query GetTokenPriceCandles($address: String!, $period: String!, $interval: String) {\n  tokenPriceCandles(address: $address, period: $period, interval: $interval) {\n    timestamp\n    open\n    close\n    max\n    min\n  }\n}\n";
