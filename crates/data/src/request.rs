//! Evaluation of a `TableRequest` against an in-memory table.

use factortest_traits::{Filter, SourceError, TableRequest};
use polars::prelude::*;

use crate::parse_vendor_date;

fn text_values(df: &DataFrame, field: &str) -> Result<Vec<Option<String>>, SourceError> {
    let as_text = df.column(field)?.cast(&DataType::String)?;
    Ok(as_text.str()?.into_iter().map(|v| v.map(str::to_string)).collect())
}

/// SQL `LIKE` matching: `_` matches one character, `%` any run.
fn like_match(pattern: &[char], text: &[char]) -> bool {
    match pattern.split_first() {
        None => text.is_empty(),
        Some(('%', rest)) => (0..=text.len()).any(|skip| like_match(rest, &text[skip..])),
        Some(('_', rest)) => !text.is_empty() && like_match(rest, &text[1..]),
        Some((c, rest)) => text.first() == Some(c) && like_match(rest, &text[1..]),
    }
}

fn evaluate(df: &DataFrame, filter: &Filter) -> Result<Vec<bool>, SourceError> {
    match filter {
        Filter::Equals { field, value } => Ok(text_values(df, field)?
            .into_iter()
            .map(|v| v.as_deref() == Some(value.as_str()))
            .collect()),
        Filter::Between { field, range } => Ok(text_values(df, field)?
            .into_iter()
            .map(|v| v.as_deref().and_then(parse_vendor_date).is_some_and(|d| range.contains(d)))
            .collect()),
        Filter::Like { field, pattern } => {
            let pattern: Vec<char> = pattern.chars().collect();
            Ok(text_values(df, field)?
                .into_iter()
                .map(|v| {
                    v.is_some_and(|text| like_match(&pattern, &text.chars().collect::<Vec<_>>()))
                })
                .collect())
        }
        Filter::AnyOf(inner) => {
            let mut mask = vec![false; df.height()];
            for filter in inner {
                for (keep, hit) in mask.iter_mut().zip(evaluate(df, filter)?) {
                    *keep |= hit;
                }
            }
            Ok(mask)
        }
    }
}

/// Apply the filters, sort order and field projection of `request` to `df`.
///
/// Filters are combined with AND. Sorting is stable so rows sharing a sort
/// key keep their stored order.
///
/// # Errors
/// Returns `SourceError::MissingField` when the request names an absent field.
pub fn apply_request(df: DataFrame, request: &TableRequest) -> Result<DataFrame, SourceError> {
    let referenced = request
        .requested_fields()
        .iter()
        .map(String::as_str)
        .chain(request.filters().iter().flat_map(Filter::fields))
        .chain(request.sort_field());
    for field in referenced {
        if df.column(field).is_err() {
            return Err(SourceError::MissingField {
                table: request.table().to_string(),
                field: field.to_string(),
            });
        }
    }

    let mut keep = vec![true; df.height()];
    for filter in request.filters() {
        for (k, hit) in keep.iter_mut().zip(evaluate(&df, filter)?) {
            *k &= hit;
        }
    }
    let mask = BooleanChunked::from_slice("mask".into(), &keep);
    let mut result = df.filter(&mask)?;

    if let Some(field) = request.sort_field() {
        let options = SortMultipleOptions::default().with_maintain_order(true).with_nulls_last(true);
        result = result.lazy().sort([field], options).collect()?;
    }

    if !request.requested_fields().is_empty() {
        result = result.select(request.requested_fields().iter().map(String::as_str))?;
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use factortest_primitives::{Date, DateRange};

    use super::*;

    fn table() -> DataFrame {
        df! {
            "CODE" => &["882001.WI", "882010.WI", "8841388.WI", "000852.SH"],
            "DT" => &["20100105", "20100104", "20100106", "20100104"],
            "PX" => &[1.0, 2.0, 3.0, 4.0],
        }
        .unwrap()
    }

    #[test]
    fn like_patterns() {
        let chars = |s: &str| s.chars().collect::<Vec<_>>();
        assert!(like_match(&chars("8820__.WI"), &chars("882001.WI")));
        assert!(!like_match(&chars("8820__.WI"), &chars("8841388.WI")));
        assert!(like_match(&chars("%.SH"), &chars("000852.SH")));
    }

    #[test]
    fn any_of_like_or_equals() {
        let request = TableRequest::new("EOD").filter(Filter::AnyOf(vec![
            Filter::like("CODE", "8820__.WI"),
            Filter::equals("CODE", "8841388.WI"),
        ]));
        let result = apply_request(table(), &request).unwrap();
        assert_eq!(result.height(), 3);
    }

    #[test]
    fn between_sort_and_project() {
        let range = DateRange::new(
            Date::from_ymd_opt(2010, 1, 4).unwrap(),
            Date::from_ymd_opt(2010, 1, 5).unwrap(),
        )
        .unwrap();
        let request = TableRequest::new("EOD")
            .fields(["CODE", "DT"])
            .filter(Filter::between("DT", range))
            .sort_by("DT");

        let result = apply_request(table(), &request).unwrap();

        assert_eq!(result.get_column_names().len(), 2);
        let codes: Vec<&str> =
            result.column("CODE").unwrap().str().unwrap().into_no_null_iter().collect();
        // Stable: the two 20100104 rows keep their stored order.
        assert_eq!(codes, vec!["882010.WI", "000852.SH", "882001.WI"]);
    }

    #[test]
    fn missing_field_is_reported() {
        let request = TableRequest::new("EOD").fields(["NOPE"]);
        assert!(matches!(
            apply_request(table(), &request),
            Err(SourceError::MissingField { field, .. }) if field == "NOPE"
        ));
    }
}
