use super::clause::Clause;

/// Encode clauses as a braced filter query, e.g. `{a="1",b=~"c.*"}`
///
/// Values are written verbatim. A value containing `"` produces text that
/// does not decode back to the same clause; see [`Clause::round_trips`].
pub fn encode(clauses: &[Clause]) -> String {
    let body = clauses
        .iter()
        .map(Clause::to_string)
        .collect::<Vec<_>>()
        .join(",");
    format!("{{{body}}}")
}
