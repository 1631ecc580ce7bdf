use super::clause::{Clause, Operator, is_key_char};

/// Decode a filter query into its clauses
///
/// The text is scanned left to right for `key<op>"value"` occurrences; no
/// separator is required between them. Anything that does not form a
/// complete clause is skipped, so this never fails. Every returned clause has
/// an empty `condition`.
pub fn decode(query: &str) -> Vec<Clause> {
    let mut clauses = Vec::new();
    let mut pos = 0;

    while pos < query.len() {
        let tail = &query[pos..];
        let key_len = key_prefix_len(tail);

        if key_len == 0 {
            pos += tail.chars().next().map_or(1, char::len_utf8);
            continue;
        }

        let key_end = pos + key_len;
        match scan_operator_and_value(&query[key_end..]) {
            Some((operator, value, consumed)) => {
                clauses.push(Clause::new(&query[pos..key_end], operator, value));
                pos = key_end + consumed;
            }
            // A shorter key starting inside this run ends at the same place,
            // so it would fail the same way.
            None => pos = key_end,
        }
    }

    clauses
}

/// Byte length of the run of key characters at the start of `s`
fn key_prefix_len(s: &str) -> usize {
    s.char_indices()
        .find(|(_, c)| !is_key_char(*c))
        .map_or(s.len(), |(i, _)| i)
}

/// Match `<op>"value"` at the start of `s`, returning the operator, the
/// value, and the number of bytes consumed.
fn scan_operator_and_value(s: &str) -> Option<(Operator, &str, usize)> {
    let operator = Operator::BY_PRECEDENCE.into_iter().find(|op| {
        s.strip_prefix(op.as_str())
            .is_some_and(|rest| rest.starts_with('"'))
    })?;

    let value_start = operator.as_str().len() + 1;
    let value_len = s[value_start..].find('"')?;
    let value = &s[value_start..value_start + value_len];

    Some((operator, value, value_start + value_len + 1))
}
