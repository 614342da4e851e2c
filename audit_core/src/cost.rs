//! Audit cost model.

use crate::test_spec::TestSpec;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Per-ballot cost of each audit test label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CostTable {
    /// Unit cost by label
    pub unit_costs: BTreeMap<char, f64>,

    /// Unit cost for labels missing from the table
    pub default_unit_cost: f64,
}

impl Default for CostTable {
    fn default() -> Self {
        let unit_costs = BTreeMap::from([
            ('a', 0.10), // quick machine recount
            ('b', 1.00), // signature and chain-of-custody check
            ('c', 20.00), // full hand inspection
        ]);

        Self {
            unit_costs,
            default_unit_cost: 0.0,
        }
    }
}

impl CostTable {
    /// Sets the unit cost for a label.
    pub fn with_unit_cost(mut self, label: char, cost: f64) -> Self {
        self.unit_costs.insert(label, cost);
        self
    }

    /// Returns the unit cost for a label.
    pub fn unit_cost(&self, label: char) -> f64 {
        self.unit_costs
            .get(&label)
            .copied()
            .unwrap_or(self.default_unit_cost)
    }

    /// Total cost of running every spec once.
    pub fn total(&self, specs: &[TestSpec]) -> f64 {
        specs
            .iter()
            .map(|spec| spec.sample_size as f64 * self.unit_cost(spec.label))
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_default_costs() {
        let table = CostTable::default();
        let specs = vec![
            TestSpec::new('a', 500),
            TestSpec::new('b', 100),
            TestSpec::new('c', 50),
        ];

        // 50 + 100 + 1000
        assert_relative_eq!(table.total(&specs), 1150.0, epsilon = 1e-9);
    }

    #[test]
    fn test_unknown_label_uses_default() {
        let mut table = CostTable::default();
        assert_eq!(table.unit_cost('z'), 0.0);

        table.default_unit_cost = 2.0;
        assert_relative_eq!(table.total(&[TestSpec::new('z', 3)]), 6.0);
    }

    #[test]
    fn test_override_unit_cost() {
        let table = CostTable::default().with_unit_cost('a', 0.5);
        assert_relative_eq!(table.total(&[TestSpec::new('a', 10)]), 5.0);
    }

    #[test]
    fn test_table_json_keyed_by_label() {
        let value = serde_json::to_value(CostTable::default()).unwrap();
        assert_eq!(value["unitCosts"]["c"], 20.0);
        assert_eq!(value["defaultUnitCost"], 0.0);

        let table: CostTable =
            serde_json::from_str(r#"{"unitCosts": {"x": 3.0}, "defaultUnitCost": 1.0}"#).unwrap();
        assert_eq!(table.unit_cost('x'), 3.0);
        assert_eq!(table.unit_cost('a'), 1.0);
    }
}
