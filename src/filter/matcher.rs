use super::clause::{Clause, Operator};
use super::error::FilterError;
use regex::Regex;
use serde_json::Value;
use std::cmp::Ordering;
use std::collections::BTreeMap;

/// Label name to label value for a single series
pub type LabelSet = BTreeMap<String, String>;

#[derive(Debug)]
enum Condition {
    Equal(String),
    NotEqual(String),
    LessThan(String),
    GreaterThan(String),
    Regex(Regex),
    NotRegex(Regex),
}

#[derive(Debug)]
struct CompiledClause {
    key: String,
    condition: Condition,
}

/// Evaluates a list of clauses against label sets
///
/// All clauses must hold for a label set to match. Regex values are anchored
/// at both ends, and a missing label reads as the empty string for the
/// equality and regex operators. `<` and `>` compare numerically when both
/// sides are numbers, otherwise lexicographically, and never match a missing
/// label.
#[derive(Debug)]
pub struct ClauseMatcher {
    clauses: Vec<CompiledClause>,
}

impl ClauseMatcher {
    pub fn new(clauses: &[Clause]) -> Result<Self, FilterError> {
        let clauses = clauses
            .iter()
            .map(compile_clause)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { clauses })
    }

    pub fn matches(&self, labels: &LabelSet) -> bool {
        self.clauses.iter().all(|clause| {
            let actual = labels.get(&clause.key).map(String::as_str);
            let or_empty = actual.unwrap_or("");
            match &clause.condition {
                Condition::Equal(expected) => or_empty == expected,
                Condition::NotEqual(expected) => or_empty != expected,
                Condition::Regex(re) => re.is_match(or_empty),
                Condition::NotRegex(re) => !re.is_match(or_empty),
                Condition::LessThan(expected) => {
                    actual.is_some_and(|v| compare_values(v, expected) == Some(Ordering::Less))
                }
                Condition::GreaterThan(expected) => {
                    actual.is_some_and(|v| compare_values(v, expected) == Some(Ordering::Greater))
                }
            }
        })
    }
}

fn compile_clause(clause: &Clause) -> Result<CompiledClause, FilterError> {
    let condition = match clause.operator {
        Operator::Equal => Condition::Equal(clause.value.clone()),
        Operator::NotEqual => Condition::NotEqual(clause.value.clone()),
        Operator::LessThan => Condition::LessThan(clause.value.clone()),
        Operator::GreaterThan => Condition::GreaterThan(clause.value.clone()),
        Operator::RegexMatch => Condition::Regex(anchored_regex(&clause.value)?),
        Operator::RegexNoMatch => Condition::NotRegex(anchored_regex(&clause.value)?),
    };
    Ok(CompiledClause {
        key: clause.key.clone(),
        condition,
    })
}

fn anchored_regex(pattern: &str) -> Result<Regex, FilterError> {
    Regex::new(&format!("^(?:{pattern})$")).map_err(|source| FilterError::InvalidRegex {
        pattern: pattern.to_string(),
        source,
    })
}

fn compare_values(actual: &str, expected: &str) -> Option<Ordering> {
    match (actual.trim().parse::<f64>(), expected.trim().parse::<f64>()) {
        (Ok(a), Ok(b)) => a.partial_cmp(&b),
        _ => Some(actual.cmp(expected)),
    }
}

/// Convert a JSON object into a label set
///
/// Strings are taken as-is, numbers and booleans are stringified, and nulls,
/// arrays and nested objects are dropped. Returns `None` for non-objects.
pub fn labels_from_json(value: &Value) -> Option<LabelSet> {
    let object = value.as_object()?;
    let labels = object
        .iter()
        .filter_map(|(key, value)| {
            let text = match value {
                Value::String(s) => s.clone(),
                Value::Number(n) => n.to_string(),
                Value::Bool(b) => b.to_string(),
                _ => return None,
            };
            Some((key.clone(), text))
        })
        .collect();
    Some(labels)
}
