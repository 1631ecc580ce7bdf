use super::clause::Clause;
use super::encoder::encode;
use super::error::FilterError;
use super::parser::decode;
use std::fmt;

/// An ordered list of clauses backed by a stored query string
///
/// Edits happen on the decoded clauses and are written back by re-encoding
/// the whole list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterSet {
    clauses: Vec<Clause>,
}

impl FilterSet {
    pub fn new() -> Self {
        Self {
            clauses: Vec::new(),
        }
    }

    /// Decode a stored query; malformed parts are dropped
    pub fn from_query(query: &str) -> Self {
        Self {
            clauses: decode(query),
        }
    }

    pub fn to_query(&self) -> String {
        encode(&self.clauses)
    }

    pub fn clauses(&self) -> &[Clause] {
        &self.clauses
    }

    pub fn len(&self) -> usize {
        self.clauses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clauses.is_empty()
    }

    /// Append a clause at the end
    pub fn push(&mut self, clause: Clause) {
        tracing::trace!(clause = %clause, "adding clause");
        self.clauses.push(clause);
    }

    /// Remove the clause at `index`, returning it
    pub fn remove(&mut self, index: usize) -> Result<Clause, FilterError> {
        self.check_index(index)?;
        let removed = self.clauses.remove(index);
        tracing::trace!(index, clause = %removed, "removed clause");
        Ok(removed)
    }

    /// Replace the clause at `index` in place, returning the previous one
    pub fn replace(&mut self, index: usize, clause: Clause) -> Result<Clause, FilterError> {
        self.check_index(index)?;
        tracing::trace!(index, clause = %clause, "replacing clause");
        Ok(std::mem::replace(&mut self.clauses[index], clause))
    }

    fn check_index(&self, index: usize) -> Result<(), FilterError> {
        if index < self.clauses.len() {
            Ok(())
        } else {
            Err(FilterError::IndexOutOfRange {
                index,
                len: self.clauses.len(),
            })
        }
    }
}

impl From<Vec<Clause>> for FilterSet {
    fn from(clauses: Vec<Clause>) -> Self {
        Self { clauses }
    }
}

impl fmt::Display for FilterSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_query())
    }
}

/// Append `clause` to the clauses of `query` and re-encode
pub fn add_clause(query: &str, clause: Clause) -> String {
    let mut set = FilterSet::from_query(query);
    set.push(clause);
    set.to_query()
}

/// Drop the clause at `index` from `query` and re-encode
pub fn remove_clause(query: &str, index: usize) -> Result<String, FilterError> {
    let mut set = FilterSet::from_query(query);
    set.remove(index)?;
    Ok(set.to_query())
}

/// Swap the clause at `index` in `query` for `clause` and re-encode
pub fn change_clause(query: &str, index: usize, clause: Clause) -> Result<String, FilterError> {
    let mut set = FilterSet::from_query(query);
    set.replace(index, clause)?;
    Ok(set.to_query())
}
