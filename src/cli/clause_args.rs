use crate::filter::{Clause, FilterError, Operator};
use clap::Args;

/// Positional KEY OP VALUE triple
#[derive(Debug, Clone, Args)]
pub struct ClauseArgs {
    /// Label key
    pub key: String,
    /// Operator: = != < > =~ !~ (or eq ne lt gt re nre)
    pub operator: Operator,
    /// Value, written without surrounding quotes
    #[arg(allow_hyphen_values = true)]
    pub value: String,
}

impl From<ClauseArgs> for Clause {
    fn from(args: ClauseArgs) -> Self {
        Clause::new(args.key, args.operator, args.value)
    }
}

/// Group flat `--clause KEY OP VALUE` values into clauses
pub fn clauses_from_triples(values: &[String]) -> Result<Vec<Clause>, FilterError> {
    values
        .chunks_exact(3)
        .map(|triple| Ok(Clause::new(&triple[0], triple[1].parse()?, &triple[2])))
        .collect()
}
