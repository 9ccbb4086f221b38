//! Point-in-time reconciliation of observations against membership intervals.
//!
//! The cutover date is the earliest interval start in the table. On or after
//! it, an observation is kept when its date lies inside one of the entity's
//! intervals, both ends inclusive and a null end meaning still current.
//! Before it no explicit interval can match; with backfill enabled those
//! observations are attributed to the initial cohort, the entities whose
//! membership starts on the cutover date, keeping the earliest interval record
//! per (entity, date).

use factortest_primitives::{
    Date,
    columns::{DATE, END_DATE, GROUP, START_DATE, SYMBOL},
    from_epoch_days, to_epoch_days,
};
use polars::prelude::*;

use crate::{PanelError, ReconcileConfig, require_columns};

const OBS_IDX: &str = "__obs_idx";
const IV_IDX: &str = "__interval_idx";
const IV_START: &str = "__interval_start";
const IV_END: &str = "__interval_end";
const COHORT_START: &str = "__cohort_start";

/// Membership or classification intervals, one row per record.
///
/// Holds `symbol`, `group`, `start_date` and `end_date` (null while current).
/// Record order is kept: it decides which record labels a backfilled
/// observation when an entity has several.
#[derive(Debug, Clone)]
pub struct MembershipTable {
    intervals: DataFrame,
    cutover: Date,
    cohort_size: usize,
}

impl MembershipTable {
    /// Build from a frame with `symbol`, `start_date`, `end_date` and the
    /// group label in `group_column`.
    ///
    /// Records without an entity or a start date are dropped. An end date
    /// before its start date is not checked.
    ///
    /// # Errors
    /// Returns `MissingColumn` for an absent column and `EmptyMembership` when
    /// no record remains.
    pub fn new(intervals: &DataFrame, group_column: &str) -> Result<Self, PanelError> {
        require_columns(intervals, &[SYMBOL, START_DATE, END_DATE, group_column])?;

        let intervals = intervals
            .clone()
            .lazy()
            .select([
                col(SYMBOL).cast(DataType::String),
                col(group_column).cast(DataType::String).alias(GROUP),
                col(START_DATE).cast(DataType::Date),
                col(END_DATE).cast(DataType::Date),
            ])
            .filter(col(SYMBOL).is_not_null().and(col(START_DATE).is_not_null()))
            .collect()?;

        let cutover = intervals
            .column(START_DATE)?
            .cast(&DataType::Int32)?
            .i32()?
            .min()
            .and_then(from_epoch_days)
            .ok_or_else(|| PanelError::EmptyMembership(group_column.to_string()))?;

        let mut table = Self { intervals, cutover, cohort_size: 0 };
        table.cohort_size = table.initial_cohort()?.len();
        tracing::debug!(
            records = table.len(),
            %cutover,
            cohort = table.cohort_size,
            "membership table loaded"
        );
        Ok(table)
    }

    /// Earliest interval start.
    #[must_use]
    pub const fn cutover(&self) -> Date {
        self.cutover
    }

    /// Entities with an interval starting on the cutover date, sorted.
    ///
    /// # Errors
    /// Returns a polars error if the stored columns cannot be read.
    pub fn initial_cohort(&self) -> Result<Vec<String>, PanelError> {
        let cutover = to_epoch_days(self.cutover);
        let starts = self.intervals.column(START_DATE)?.cast(&DataType::Int32)?;
        let symbols = self.intervals.column(SYMBOL)?;

        let mut cohort: Vec<String> = symbols
            .str()?
            .into_iter()
            .zip(starts.i32()?)
            .filter(|(_, start)| *start == Some(cutover))
            .filter_map(|(symbol, _)| symbol.map(str::to_string))
            .collect();
        cohort.sort_unstable();
        cohort.dedup();
        Ok(cohort)
    }

    /// Stored intervals.
    #[must_use]
    pub const fn intervals(&self) -> &DataFrame {
        &self.intervals
    }

    /// Number of interval records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.intervals.height()
    }

    /// Check if empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.intervals.height() == 0
    }
}

/// Annotate `observations` with the group valid at each observation date.
///
/// The matching interval's group label is written to
/// `config.label_column`; observations with no match are dropped. Before the
/// cutover at most one row per (entity, date) is produced, from the earliest
/// matching record. On or after it every containing interval yields a row,
/// so overlapping intervals duplicate observations. Input row order is kept.
///
/// # Errors
/// Returns `MissingColumn` if `symbol` or `date` is absent and
/// `InvalidConfig` if the label column already exists.
pub fn reconcile(
    observations: &DataFrame,
    membership: &MembershipTable,
    config: &ReconcileConfig,
) -> Result<DataFrame, PanelError> {
    require_columns(observations, &[SYMBOL, DATE])?;
    let label = config.label_column.as_str();
    if observations.column(label).is_ok() {
        return Err(PanelError::InvalidConfig(format!("label column {label} already present")));
    }

    let mut output: Vec<Expr> =
        observations.get_column_names().iter().map(|name| col(name.as_str())).collect();
    output.push(col(label));

    let cutover = lit(to_epoch_days(membership.cutover)).cast(DataType::Date);
    let intervals = membership.intervals.clone().lazy().with_row_index(IV_IDX, None).select([
        col(SYMBOL),
        col(GROUP).alias(label),
        col(START_DATE).alias(IV_START),
        col(END_DATE).alias(IV_END),
        col(IV_IDX),
        col(START_DATE).min().over([col(SYMBOL)]).alias(COHORT_START),
    ]);

    let candidates = observations.clone().lazy().with_row_index(OBS_IDX, None).join(
        intervals,
        [col(SYMBOL)],
        [col(SYMBOL)],
        JoinArgs::new(JoinType::Inner),
    );

    let contained = col(DATE)
        .gt_eq(col(IV_START))
        .and(col(IV_END).is_null().or(col(DATE).lt_eq(col(IV_END))));
    let explicit = candidates.clone().filter(col(DATE).gt_eq(cutover.clone()).and(contained));

    let matched = if config.backfill_initial_cohort {
        let backfilled = candidates
            .filter(col(DATE).lt(cutover.clone()).and(col(COHORT_START).eq(cutover)))
            .filter(col(IV_IDX).eq(col(IV_IDX).min().over([col(SYMBOL), col(DATE)])))
            .filter(col(OBS_IDX).eq(col(OBS_IDX).min().over([col(SYMBOL), col(DATE)])));
        concat([backfilled, explicit], UnionArgs::default())?
    } else {
        explicit
    };

    let annotated = matched
        .sort([OBS_IDX, IV_IDX], SortMultipleOptions::default().with_maintain_order(true))
        .select(output)
        .collect()?;

    tracing::info!(
        label,
        cutover = %membership.cutover,
        rows_in = observations.height(),
        rows_out = annotated.height(),
        "reconciled membership"
    );
    Ok(annotated)
}
