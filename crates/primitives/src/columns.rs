//! Canonical column names of the research panel.
//!
//! Raw tables are renamed onto these names at the data-source boundary; every
//! transformation downstream addresses columns through these constants.

/// Entity (instrument) identifier, e.g. `600000.SH`.
pub const SYMBOL: &str = "symbol";
/// Trading date.
pub const DATE: &str = "date";

/// Opening price.
pub const OPEN: &str = "open";
/// Adjusted close.
pub const CLOSE: &str = "adj_close";
/// Adjusted previous close.
pub const PRE_CLOSE: &str = "adj_pre_close";
/// Limit-up price for the session.
pub const LIMIT_UP: &str = "limit_up";
/// Limit-down price for the session.
pub const LIMIT_DOWN: &str = "limit_down";
/// Trading status text.
pub const TRADE_STATUS: &str = "trade_status";

/// Total market value.
pub const MARKET_VALUE: &str = "market_value";
/// Daily turnover rate.
pub const TURNOVER: &str = "turnover";

/// Unadjusted close, used by index series.
pub const INDEX_CLOSE: &str = "close";
/// Unadjusted previous close, used by index series.
pub const INDEX_PRE_CLOSE: &str = "pre_close";
/// Percent change reported by the vendor (in percent units).
pub const PCT_CHANGE: &str = "pct_change";

/// Same-day return, `close / pre_close - 1`.
pub const RETURN: &str = "return";
/// Net asset value compounded from `return`, starting at 1.
pub const NAV: &str = "nav";
/// One-step-ahead return of the entity's own series.
pub const FORWARD_RETURN: &str = "forward_return";
/// Natural log of market value.
pub const LOG_MARKET_VALUE: &str = "ln_market_value";

/// Group identifier of a membership interval (index code or industry label).
pub const GROUP: &str = "group";
/// First date of a membership interval.
pub const START_DATE: &str = "start_date";
/// Last date of a membership interval, null while still current.
pub const END_DATE: &str = "end_date";
/// Vendor current-membership flag.
pub const CURRENT: &str = "current";

/// Raw industry classification code.
pub const INDUSTRY_CODE: &str = "industry_code";
/// Index membership label on the enriched panel.
pub const INDEX_CODE: &str = "index_code";
/// Industry category label on the enriched panel.
pub const INDUSTRY: &str = "industry";
