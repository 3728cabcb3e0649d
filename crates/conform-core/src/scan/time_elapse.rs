use conform_model::{Case, Verdict};

use crate::error::{CheckError, Result};

/// Eligible when `end_activity` occurs. The case must end, at its last
/// `end_activity`, in the calendar year it started in. A violation is reported
/// at the first event whose year differs from the starting year.
pub(super) fn scan(case: &Case, end_activity: &str) -> Result<Verdict> {
    let Some(last_end) = case.last_index_of(end_activity) else {
        return Ok(Verdict::Ineligible);
    };
    let years = case
        .events
        .iter()
        .map(|event| {
            event.year().ok_or_else(|| CheckError::MissingTimestamp {
                case_id: case.id.clone(),
                position: event.position,
            })
        })
        .collect::<Result<Vec<i32>>>()?;

    let start_year = years[0];
    if years[last_end] == start_year {
        return Ok(Verdict::Compliant);
    }
    let index = years
        .iter()
        .position(|year| *year != start_year)
        .unwrap_or(last_end);
    Ok(Verdict::Violated { index })
}
