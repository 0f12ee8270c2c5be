//! Key joins between section tables.
//!
//! Joins always run on the `Name` column and produce a deterministic row
//! order: rows of the left table keep their order, rows only the right table
//! knows follow in the right table's order.

use crate::error::Result;
use crate::schema::ELEMENT_ID;
use polars::prelude::*;
use tracing::debug;

const LEFT_ORDER: &str = "__left_order";
const RIGHT_ORDER: &str = "__right_order";

/// Join `other` onto `base` by element identifier.
///
/// Columns `other` shares with `base` (besides the key) are coalesced: the
/// value from `base` wins where it is present, otherwise the value from
/// `other` fills in. Differently typed copies are cast to a common type first.
pub fn join_on_key(base: DataFrame, other: DataFrame, how: JoinType) -> Result<DataFrame> {
    let (base, other, shared) = align_shared_columns(base, other)?;

    debug!(
        "Joining {} rows with {} rows ({:?})",
        base.height(),
        other.height(),
        how
    );

    let merged: Vec<Expr> = shared
        .iter()
        .map(|name| {
            let shadow = shadow_name(name);
            when(col(name.as_str()).is_not_null())
                .then(col(name.as_str()))
                .otherwise(col(shadow.as_str()))
                .alias(name.as_str())
        })
        .collect();

    let args = JoinArgs::new(how).with_coalesce(JoinCoalesce::CoalesceColumns);
    let joined = base
        .lazy()
        .with_row_index(LEFT_ORDER, None)
        .join(
            other.lazy().with_row_index(RIGHT_ORDER, None),
            [col(ELEMENT_ID)],
            [col(ELEMENT_ID)],
            args,
        )
        .with_columns(merged)
        .sort_by_exprs(
            [col(LEFT_ORDER), col(RIGHT_ORDER)],
            SortMultipleOptions::default().with_nulls_last(true),
        )
        .collect()?;

    let mut joined = joined.drop(LEFT_ORDER)?.drop(RIGHT_ORDER)?;
    for name in &shared {
        joined = joined.drop(&shadow_name(name))?;
    }
    Ok(joined)
}

fn shadow_name(name: &str) -> String {
    format!("__{}_shared", name)
}

/// Numeric pairs widen to Float64; anything else meets at String
fn common_dtype(left: &DataType, right: &DataType) -> DataType {
    let numeric = |dtype: &DataType| dtype.is_integer() || dtype.is_float();
    if left == right {
        left.clone()
    } else if numeric(left) && numeric(right) {
        DataType::Float64
    } else {
        DataType::String
    }
}

fn is_all_null(column: &Column) -> bool {
    column.null_count() == column.len()
}

/// Cast shared columns to a common type and rename `other`'s copies out of
/// the way of the join
fn align_shared_columns(
    mut base: DataFrame,
    mut other: DataFrame,
) -> Result<(DataFrame, DataFrame, Vec<String>)> {
    let shared: Vec<String> = other
        .get_column_names()
        .into_iter()
        .filter(|name| {
            name.as_str() != ELEMENT_ID && base.get_column_index(name.as_str()).is_some()
        })
        .map(|name| name.to_string())
        .collect();

    if shared.is_empty() {
        return Ok((base, other, shared));
    }

    debug!("Coalescing columns shared with an earlier section: {:?}", shared);
    for name in &shared {
        let left = base.column(name)?.dtype().clone();
        let right = other.column(name)?.dtype().clone();
        if left != right {
            // an all-null copy carries no type information of its own
            let dtype = if is_all_null(other.column(name)?) {
                left.clone()
            } else if is_all_null(base.column(name)?) {
                right.clone()
            } else {
                common_dtype(&left, &right)
            };
            debug!("Casting shared column {} ({} / {}) to {}", name, left, right, dtype);
            let cast = base.column(name)?.cast(&dtype)?;
            base.with_column(cast)?;
            let cast = other.column(name)?.cast(&dtype)?;
            other.with_column(cast)?;
        }
        other.rename(name, shadow_name(name).into())?;
    }

    Ok((base, other, shared))
}
