//! Industry classification intervals.

use factortest_primitives::{
    PrefixTable,
    columns::{END_DATE, GROUP, INDUSTRY_CODE, START_DATE, SYMBOL},
};
use polars::prelude::*;

use crate::{MembershipTable, PanelError, require_columns};

/// Classify each record of a stock industry table and return it as a
/// membership table labelled by category.
///
/// `classification` holds `symbol`, `industry_code`, `start_date` (entry)
/// and `end_date` (removal, null while current). A code matching no prefix
/// gets a null category and the record is kept.
///
/// # Errors
/// Returns `MissingColumn` for an absent column and `EmptyMembership` when
/// the table has no usable record.
pub fn industry_membership(
    classification: &DataFrame,
    table: &PrefixTable,
) -> Result<MembershipTable, PanelError> {
    require_columns(classification, &[SYMBOL, INDUSTRY_CODE, START_DATE, END_DATE])?;

    let categories: Vec<Option<&str>> = classification
        .column(INDUSTRY_CODE)?
        .cast(&DataType::String)?
        .str()?
        .into_iter()
        .map(|code| code.and_then(|code| table.assign(code.trim())))
        .collect();

    let unresolved = categories.iter().filter(|category| category.is_none()).count();
    if unresolved > 0 {
        tracing::debug!(unresolved, "industry codes without a category");
    }

    let mut labelled = classification.clone();
    labelled.with_column(Column::new(GROUP.into(), categories))?;
    MembershipTable::new(&labelled, GROUP)
}

#[cfg(test)]
mod tests {
    use factortest_primitives::{Date, PrefixEntry, columns::DATE};

    use super::*;
    use crate::{ReconcileConfig, reconcile};

    fn d(day: u32) -> Date {
        Date::from_ymd_opt(2010, 1, day).unwrap()
    }

    fn prefixes() -> PrefixTable {
        [PrefixEntry::new("62201", "A"), PrefixEntry::new("622", "B")].into_iter().collect()
    }

    fn classification() -> DataFrame {
        df! {
            SYMBOL => &["600000.SH", "600001.SH", "600002.SH"],
            INDUSTRY_CODE => &["6220106020", "6225010000", "9999999999"],
            START_DATE => &[d(4), d(4), d(4)],
            END_DATE => &[None, Some(d(5)), None],
        }
        .unwrap()
    }

    #[test]
    fn categories_follow_first_match() {
        let table = industry_membership(&classification(), &prefixes()).unwrap();

        let groups: Vec<Option<&str>> =
            table.intervals().column(GROUP).unwrap().str().unwrap().into_iter().collect();
        assert_eq!(groups, vec![Some("A"), Some("B"), None]);
    }

    #[test]
    fn assigned_through_reconciler() {
        let table = industry_membership(&classification(), &prefixes()).unwrap();
        let obs = df! {
            SYMBOL => &["600000.SH", "600001.SH", "600001.SH", "600002.SH", "600003.SH"],
            DATE => &[d(6), d(5), d(6), d(6), d(6)],
        }
        .unwrap();

        let out = reconcile(&obs, &table, &ReconcileConfig::industry()).unwrap();

        // 600001.SH left the classification on the 5th; 600003.SH has none.
        assert_eq!(out.height(), 3);
        // 600002.SH matches no prefix but keeps its row.
        assert_eq!(out.column("industry").unwrap().null_count(), 1);
    }
}
