//! End-to-end runs of the panel pipeline over raw vendor tables.
#![allow(missing_docs)]

use approx::assert_relative_eq;
use factortest_data::{MemorySource, wind};
use factortest_panel::{
    MembershipTable, PanelPipeline, PipelineConfig, ReconcileConfig, industry_membership,
    reconcile,
};
use factortest_primitives::{
    Date, DateRange, PrefixEntry, PrefixTable,
    columns::{DATE, FORWARD_RETURN, INDEX_CODE, INDUSTRY, LOG_MARKET_VALUE, SYMBOL},
    to_epoch_days,
};
use polars::prelude::*;

const TRADE_DAYS: [&str; 4] = ["20100104", "20100105", "20100106", "20100107"];
const STOCKS: [&str; 5] = ["600000.SH", "600001.SH", "000001.SZ", "000002.SZ", "830001.BJ"];

fn d(day: u32) -> Date {
    Date::from_ymd_opt(2010, 1, day).unwrap()
}

fn prices() -> DataFrame {
    let mut symbol = Vec::new();
    let mut date = Vec::new();
    let mut pre_close = Vec::new();
    let mut close = Vec::new();
    for (i, stock) in STOCKS.iter().enumerate() {
        for (t, day) in TRADE_DAYS.iter().enumerate() {
            let base = 10.0 + i as f64;
            let drift = 1.0 + 0.01 * ((i + 2 * t) % 5) as f64;
            symbol.push((*stock).to_string());
            date.push((*day).to_string());
            pre_close.push(format!("{base}"));
            close.push(format!("{}", base * drift));
        }
    }
    let n = symbol.len();
    df! {
        "S_INFO_WINDCODE" => symbol,
        "TRADE_DT" => date,
        "S_DQ_ADJPRECLOSE" => pre_close.clone(),
        "S_DQ_OPEN" => pre_close,
        "S_DQ_ADJCLOSE" => close,
        "S_DQ_LIMIT" => vec!["99.0".to_string(); n],
        "S_DQ_STOPPING" => vec!["1.0".to_string(); n],
        "S_DQ_TRADESTATUS" => vec!["交易".to_string(); n],
    }
    .unwrap()
}

fn index_members() -> DataFrame {
    df! {
        "S_INFO_WINDCODE" => &["000852.SH", "000852.SH", "000852.SH", "000852.SH", "000852.SH", "000905.SH"],
        "S_CON_WINDCODE" => &["600000.SH", "600001.SH", "000001.SZ", "000002.SZ", "830001.BJ", "600001.SH"],
        "S_CON_INDATE" => &["20100104", "20100104", "20100104", "20100104", "20100104", "20070115"],
        "S_CON_OUTDATE" => &[None, Some("20100105.0"), None, None, None, None],
        "CUR_SIGN" => &["1", "0", "1", "1", "1", "1"],
    }
    .unwrap()
}

fn industry_class() -> DataFrame {
    df! {
        "S_INFO_WINDCODE" => &["600000.SH", "600001.SH", "000001.SZ", "000002.SZ"],
        "WIND_IND_CODE" => &["6220106020", "6225010000", "6240201000", "6240301000"],
        "ENTRY_DT" => &["20000101", "20000101", "20000101", "20000101"],
        "REMOVE_DT" => &[None::<&str>, None, None, None],
        "CUR_SIGN" => &["1", "1", "1", "1"],
    }
    .unwrap()
}

fn indicators() -> DataFrame {
    let mut symbol = Vec::new();
    let mut date = Vec::new();
    let mut mv = Vec::new();
    let mut turnover = Vec::new();
    for (i, stock) in STOCKS.iter().enumerate() {
        for (t, day) in TRADE_DAYS.iter().enumerate() {
            symbol.push((*stock).to_string());
            date.push((*day).to_string());
            mv.push(Some(format!("{}", 1e9 * (1.0 + i as f64) * (1.0 + 0.1 * t as f64))));
            // One missing turnover, filled with zero by the pipeline.
            let value = if i == 3 && t == 1 {
                None
            } else {
                Some(format!("{}", 0.5 + 0.7 * i as f64 + 0.3 * t as f64))
            };
            turnover.push(value);
        }
    }
    df! {
        "S_INFO_WINDCODE" => symbol,
        "TRADE_DT" => date,
        "S_VAL_MV" => mv,
        "S_DQ_TURN" => turnover,
    }
    .unwrap()
}

fn source() -> MemorySource {
    MemorySource::new()
        .with_table(wind::ASHARE_EOD_PRICES, prices())
        .with_table(wind::AINDEX_MEMBERS, index_members())
        .with_table(wind::ASHARE_INDUSTRIES_CLASS, industry_class())
        .with_table(wind::ASHARE_EOD_DERIVATIVE_INDICATOR, indicators())
}

fn prefixes() -> PrefixTable {
    [
        PrefixEntry::new("62201", "Energy"),
        PrefixEntry::new("6225", "Utilities"),
        PrefixEntry::new("624", "Information Technology"),
    ]
    .into_iter()
    .collect()
}

#[test]
fn pipeline_builds_clean_panel() {
    let range = DateRange::new(d(1), d(31)).unwrap();
    let pipeline = PanelPipeline::new(PipelineConfig::new(range), prefixes()).unwrap();

    let panel = pipeline.run(&source()).unwrap();

    // Three full-window members lose their last date, 600001.SH keeps only
    // the 4th (membership ends on the 5th, whose lead is dropped with it),
    // and the Beijing listing is filtered out.
    assert_eq!(panel.height(), 10);
    for column in [SYMBOL, DATE, INDEX_CODE, INDUSTRY, FORWARD_RETURN, LOG_MARKET_VALUE] {
        assert_eq!(panel.column(column).unwrap().null_count(), 0, "{column}");
    }
    let factor = pipeline.factor_column();
    assert_eq!(factor, "turnover_norm");

    let days: Vec<i32> = panel
        .column(DATE)
        .unwrap()
        .cast(&DataType::Int32)
        .unwrap()
        .i32()
        .unwrap()
        .into_no_null_iter()
        .collect();
    assert!(days.windows(2).all(|w| w[0] <= w[1]));
    assert!(!days.contains(&to_epoch_days(d(7))));

    // Residuals of a regression with intercept sum to zero per date.
    let residuals: Vec<f64> =
        panel.column(factor.as_str()).unwrap().f64().unwrap().into_no_null_iter().collect();
    for day in [d(4), d(5), d(6)] {
        let sum: f64 = days
            .iter()
            .zip(&residuals)
            .filter(|(d, _)| **d == to_epoch_days(day))
            .map(|(_, r)| r)
            .sum();
        assert_relative_eq!(sum, 0.0, epsilon = 1e-9);
    }

    let symbols: Vec<&str> =
        panel.column(SYMBOL).unwrap().str().unwrap().into_no_null_iter().collect();
    assert_eq!(symbols.iter().filter(|s| **s == "600001.SH").count(), 1);
    assert!(!symbols.contains(&"830001.BJ"));
}

#[test]
fn two_by_two_scenario_drops_departed_member() {
    // 2 entities x 2 dates; B leaves the index after the first date.
    let observations = df! {
        SYMBOL => &["A", "B", "A", "B"],
        DATE => &[d(4), d(4), d(5), d(5)],
    }
    .unwrap();
    let members = df! {
        SYMBOL => &["A", "B"],
        INDEX_CODE => &["000852.SH", "000852.SH"],
        "start_date" => &[d(4), d(4)],
        "end_date" => &[None, Some(d(4))],
    }
    .unwrap();
    let classification = df! {
        SYMBOL => &["A", "B"],
        "industry_code" => &["6220106020", "6240201000"],
        "start_date" => &[d(1), d(1)],
        "end_date" => &[None::<Date>, None],
    }
    .unwrap();

    let members = MembershipTable::new(&members, INDEX_CODE).unwrap();
    let panel = reconcile(&observations, &members, &ReconcileConfig::index_membership()).unwrap();
    let industries = industry_membership(&classification, &prefixes()).unwrap();
    let panel = reconcile(&panel, &industries, &ReconcileConfig::industry()).unwrap();

    assert_eq!(panel.height(), 3);
    let days = panel.column(DATE).unwrap().cast(&DataType::Int32).unwrap();
    let keys: Vec<(&str, i32)> = panel
        .column(SYMBOL)
        .unwrap()
        .str()
        .unwrap()
        .into_no_null_iter()
        .zip(days.i32().unwrap().into_no_null_iter())
        .collect();
    assert!(keys.contains(&("B", to_epoch_days(d(4)))));
    assert!(!keys.contains(&("B", to_epoch_days(d(5)))));
    assert_eq!(panel.column(INDUSTRY).unwrap().null_count(), 0);
}
