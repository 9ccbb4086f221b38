//! Wind table schema and canonicalisation.
//!
//! Each query requests the raw vendor fields of one table, then renames them
//! onto the canonical column names in [`factortest_primitives::columns`] and
//! coerces dates and numbers. Dates that fail to parse become null.

use factortest_primitives::{DateRange, columns};
use factortest_traits::{DataSource, Filter, TableRequest};
use polars::prelude::*;

use crate::{Result, parse_date_column};

/// A-share end-of-day prices.
pub const ASHARE_EOD_PRICES: &str = "ASHAREEODPRICES";
/// Index constituent intervals.
pub const AINDEX_MEMBERS: &str = "AINDEXMEMBERS";
/// Stock industry classification intervals.
pub const ASHARE_INDUSTRIES_CLASS: &str = "ASHAREINDUSTRIESCLASS";
/// Derivative indicators (market value, turnover).
pub const ASHARE_EOD_DERIVATIVE_INDICATOR: &str = "ASHAREEODDERIVATIVEINDICATOR";
/// Wind industry index end-of-day series.
pub const AINDEX_WIND_INDUSTRIES_EOD: &str = "AINDEXWINDINDUSTRIESEOD";

/// CSI 1000.
pub const CSI_1000: &str = "000852.SH";
/// Wind All A, the market index.
pub const WIND_ALL_A: &str = "8841388.WI";
/// `LIKE` pattern matching the level-one Wind industry indices.
pub const LEVEL_ONE_INDUSTRY_PATTERN: &str = "8820__.WI";

const WINDCODE: &str = "S_INFO_WINDCODE";
const TRADE_DT: &str = "TRADE_DT";

/// How a raw field is coerced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Kept as text.
    Text,
    /// Parsed with [`parse_vendor_date`](crate::parse_vendor_date).
    Date,
    /// Cast to `f64`; unparseable values become null.
    Number,
}

/// Mapping from a raw vendor field onto a canonical column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Vendor field name.
    pub raw: &'static str,
    /// Canonical column name.
    pub canonical: &'static str,
    /// Coercion.
    pub kind: FieldKind,
}

const fn field(raw: &'static str, canonical: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { raw, canonical, kind }
}

/// Price fields used by the pipeline.
pub const PRICE_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::SYMBOL, FieldKind::Text),
    field(TRADE_DT, columns::DATE, FieldKind::Date),
    field("S_DQ_ADJPRECLOSE", columns::PRE_CLOSE, FieldKind::Number),
    field("S_DQ_OPEN", columns::OPEN, FieldKind::Number),
    field("S_DQ_ADJCLOSE", columns::CLOSE, FieldKind::Number),
    field("S_DQ_LIMIT", columns::LIMIT_UP, FieldKind::Number),
    field("S_DQ_STOPPING", columns::LIMIT_DOWN, FieldKind::Number),
    field("S_DQ_TRADESTATUS", columns::TRADE_STATUS, FieldKind::Text),
];

/// Index constituent fields.
pub const INDEX_MEMBER_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::INDEX_CODE, FieldKind::Text),
    field("S_CON_WINDCODE", columns::SYMBOL, FieldKind::Text),
    field("S_CON_INDATE", columns::START_DATE, FieldKind::Date),
    field("S_CON_OUTDATE", columns::END_DATE, FieldKind::Date),
    field("CUR_SIGN", columns::CURRENT, FieldKind::Text),
];

/// Industry classification fields.
pub const INDUSTRY_CLASS_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::SYMBOL, FieldKind::Text),
    field("WIND_IND_CODE", columns::INDUSTRY_CODE, FieldKind::Text),
    field("ENTRY_DT", columns::START_DATE, FieldKind::Date),
    field("REMOVE_DT", columns::END_DATE, FieldKind::Date),
    field("CUR_SIGN", columns::CURRENT, FieldKind::Text),
];

/// Derivative indicator fields.
pub const INDICATOR_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::SYMBOL, FieldKind::Text),
    field(TRADE_DT, columns::DATE, FieldKind::Date),
    field("S_VAL_MV", columns::MARKET_VALUE, FieldKind::Number),
    field("S_DQ_TURN", columns::TURNOVER, FieldKind::Number),
];

/// Industry index fields, including the vendor percent change.
pub const INDUSTRY_INDEX_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::SYMBOL, FieldKind::Text),
    field(TRADE_DT, columns::DATE, FieldKind::Date),
    field("S_DQ_PRECLOSE", columns::INDEX_PRE_CLOSE, FieldKind::Number),
    field("S_DQ_CLOSE", columns::INDEX_CLOSE, FieldKind::Number),
    field("S_DQ_PCTCHANGE", columns::PCT_CHANGE, FieldKind::Number),
];

/// Index close fields shared by every level-one industry and the market.
pub const ALL_INDUSTRY_FIELDS: &[FieldSpec] = &[
    field(WINDCODE, columns::SYMBOL, FieldKind::Text),
    field(TRADE_DT, columns::DATE, FieldKind::Date),
    field("S_DQ_PRECLOSE", columns::INDEX_PRE_CLOSE, FieldKind::Number),
    field("S_DQ_CLOSE", columns::INDEX_CLOSE, FieldKind::Number),
];

fn raw_names(specs: &[FieldSpec]) -> impl Iterator<Item = &'static str> + '_ {
    specs.iter().map(|spec| spec.raw)
}

/// Rename and coerce raw vendor columns onto their canonical form.
///
/// Columns not listed in `specs` are dropped.
///
/// # Errors
/// Returns a polars error if a listed raw column is missing.
pub fn canonicalize(mut df: DataFrame, specs: &[FieldSpec]) -> PolarsResult<DataFrame> {
    for spec in specs.iter().filter(|spec| spec.kind == FieldKind::Date) {
        parse_date_column(&mut df, spec.raw)?;
    }

    let exprs: Vec<Expr> = specs
        .iter()
        .map(|spec| {
            let raw = col(spec.raw);
            let coerced = match spec.kind {
                FieldKind::Text => raw.cast(DataType::String),
                FieldKind::Date => raw,
                FieldKind::Number => raw.cast(DataType::Float64),
            };
            coerced.alias(spec.canonical)
        })
        .collect();

    df.lazy().select(exprs).collect()
}

fn fetch<S>(source: &S, request: TableRequest, specs: &[FieldSpec]) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let raw = source.fetch(&request)?;
    let df = canonicalize(raw, specs)?;
    tracing::info!(
        source = source.name(),
        table = request.table(),
        rows = df.height(),
        "fetched table"
    );
    Ok(df)
}

fn trade_dates(range: DateRange) -> Filter {
    Filter::between(TRADE_DT, range)
}

/// Prices within `range`, sorted by date.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_prices<S>(source: &S, range: DateRange) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(ASHARE_EOD_PRICES)
        .fields(raw_names(PRICE_FIELDS))
        .filter(trade_dates(range))
        .sort_by(TRADE_DT);
    fetch(source, request, PRICE_FIELDS)
}

/// Constituent intervals of `index_code`, sorted by inclusion date.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_index_members<S>(source: &S, index_code: &str) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(AINDEX_MEMBERS)
        .fields(raw_names(INDEX_MEMBER_FIELDS))
        .filter(Filter::equals(WINDCODE, index_code))
        .sort_by("S_CON_INDATE");
    fetch(source, request, INDEX_MEMBER_FIELDS)
}

/// Every stock industry classification interval, sorted by entry date.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_industry_class<S>(source: &S) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(ASHARE_INDUSTRIES_CLASS)
        .fields(raw_names(INDUSTRY_CLASS_FIELDS))
        .sort_by("ENTRY_DT");
    fetch(source, request, INDUSTRY_CLASS_FIELDS)
}

/// Market value and turnover within `range`, sorted by date.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_indicators<S>(source: &S, range: DateRange) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(ASHARE_EOD_DERIVATIVE_INDICATOR)
        .fields(raw_names(INDICATOR_FIELDS))
        .filter(trade_dates(range))
        .sort_by(TRADE_DT);
    fetch(source, request, INDICATOR_FIELDS)
}

/// End-of-day series of one industry index within `range`.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_industry_index<S>(source: &S, index_code: &str, range: DateRange) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(AINDEX_WIND_INDUSTRIES_EOD)
        .fields(raw_names(INDUSTRY_INDEX_FIELDS))
        .filter(trade_dates(range))
        .filter(Filter::equals(WINDCODE, index_code))
        .sort_by(TRADE_DT);
    fetch(source, request, INDUSTRY_INDEX_FIELDS)
}

/// Level-one industry indices plus [`WIND_ALL_A`] within `range`.
///
/// # Errors
/// Propagates source and coercion errors.
pub fn fetch_all_industries<S>(source: &S, range: DateRange) -> Result<DataFrame>
where
    S: DataSource + ?Sized,
{
    let request = TableRequest::new(AINDEX_WIND_INDUSTRIES_EOD)
        .fields(raw_names(ALL_INDUSTRY_FIELDS))
        .filter(trade_dates(range))
        .filter(Filter::AnyOf(vec![
            Filter::like(WINDCODE, LEVEL_ONE_INDUSTRY_PATTERN),
            Filter::equals(WINDCODE, WIND_ALL_A),
        ]))
        .sort_by(TRADE_DT);
    fetch(source, request, ALL_INDUSTRY_FIELDS)
}
