//! Option sets for interactive controls.
//!
//! A presentation layer builds its selectors from these lists verbatim.

use crate::config::MissingStrategy;
use crate::table::{ColumnKind, Table};
use serde::Serialize;

/// One entry of the missing-value strategy selector.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StrategyOption {
    pub strategy: MissingStrategy,
    pub label: &'static str,
}

/// Every option set offered for the current snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ControlOptions {
    pub table_version: u64,
    /// The four missing-value strategies, in selector order.
    pub missing_strategies: Vec<StrategyOption>,
    /// Categorical columns; single selection.
    pub encodable_columns: Vec<String>,
    /// Numeric columns; multiple selection.
    pub scalable_columns: Vec<String>,
    /// Numeric columns; single selection.
    pub histogram_columns: Vec<String>,
}

impl ControlOptions {
    pub fn from_table(table: &Table) -> Self {
        let numeric = table.columns_of_kind(ColumnKind::Numeric);

        Self {
            table_version: table.version(),
            missing_strategies: MissingStrategy::ALL
                .iter()
                .map(|s| StrategyOption {
                    strategy: *s,
                    label: s.label(),
                })
                .collect(),
            encodable_columns: table.columns_of_kind(ColumnKind::Categorical),
            scalable_columns: numeric.clone(),
            histogram_columns: numeric,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_options_follow_column_kinds() {
        let table = Table::new(
            df![
                "age" => [30, 40],
                "city" => ["Oslo", "Rome"],
                "flag" => [true, false],
                "score" => [1.5, 2.5]
            ]
            .unwrap(),
        );

        let options = ControlOptions::from_table(&table);

        assert_eq!(options.encodable_columns, vec!["city".to_string()]);
        assert_eq!(
            options.scalable_columns,
            vec!["age".to_string(), "score".to_string()]
        );
        assert_eq!(options.histogram_columns, options.scalable_columns);

        let labels: Vec<&str> = options.missing_strategies.iter().map(|o| o.label).collect();
        assert_eq!(
            labels,
            vec!["Do Nothing", "Fill with Mean", "Fill with Median", "Drop Missing Values"]
        );
    }
}
