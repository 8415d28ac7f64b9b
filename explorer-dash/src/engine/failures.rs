//! Failure table derivation
//!
//! Each process shows its worst testcodes by fail count, optionally
//! restricted to the operator's saved testcode selection.

use explorer_common::model::FailureRecord;
use std::collections::BTreeSet;

/// Rows shown per process
pub const TOP_FAILURES: usize = 5;

/// Top failure rows for a process, by `pfail` descending.
///
/// `selection` of `None` means no selection was ever saved and every
/// testcode passes; a saved empty set matches nothing.
pub fn top_failures<'a>(
    records: &'a [FailureRecord],
    process: &str,
    selection: Option<&BTreeSet<String>>,
) -> Vec<&'a FailureRecord> {
    let mut rows: Vec<&FailureRecord> = records
        .iter()
        .filter(|r| r.process == process)
        .filter(|r| match selection {
            Some(sel) => sel.contains(&r.testcode),
            None => true,
        })
        .collect();
    rows.sort_by(|a, b| b.pfail.cmp(&a.pfail));
    rows.truncate(TOP_FAILURES);
    rows
}

/// Distinct testcodes seen for a process, sorted
pub fn testcodes(records: &[FailureRecord], process: &str) -> Vec<String> {
    let set: BTreeSet<String> = records
        .iter()
        .filter(|r| r.process == process)
        .map(|r| r.testcode.clone())
        .collect();
    set.into_iter().collect()
}
