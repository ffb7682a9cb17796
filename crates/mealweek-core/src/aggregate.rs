//! The ingredient aggregator: folds ingredient occurrences into a
//! name -> quantity map.

use std::collections::BTreeMap;

use mealweek_db::models::ShoppingEntry;

/// A consolidated shopping list under construction.
///
/// Each `add` counts one ingredient occurrence; the same name never produces
/// a second row. Enumeration is lexicographic by name, so display and export
/// are stable within a run. There is no removal: an aggregate lives for one
/// plan-build cycle and is rebuilt from scratch on the next.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ShoppingAggregate {
    quantities: BTreeMap<String, i64>,
}

impl ShoppingAggregate {
    pub fn new() -> Self {
        Self::default()
    }

    /// Count one occurrence of `ingredient`.
    pub fn add(&mut self, ingredient: &str) {
        *self.quantities.entry(ingredient.to_owned()).or_insert(0) += 1;
    }

    /// Count every occurrence in an ingredient list. Repeats within the list
    /// each count separately.
    pub fn extend<I, S>(&mut self, ingredients: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for ingredient in ingredients {
            self.add(ingredient.as_ref());
        }
    }

    /// Number of distinct ingredients.
    pub fn len(&self) -> usize {
        self.quantities.len()
    }

    pub fn is_empty(&self) -> bool {
        self.quantities.is_empty()
    }

    /// Sum of all quantities, i.e. the total occurrence count fed in.
    pub fn total_quantity(&self) -> i64 {
        self.quantities.values().sum()
    }

    /// The aggregate as shopping rows, in lexicographic name order.
    pub fn entries(&self) -> Vec<ShoppingEntry> {
        self.quantities
            .iter()
            .map(|(ingredient, quantity)| ShoppingEntry {
                ingredient: ingredient.clone(),
                quantity: *quantity,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_adds_accumulate() {
        let mut agg = ShoppingAggregate::new();
        for _ in 0..5 {
            agg.add("Oats");
        }
        assert_eq!(agg.entries(), vec![entry("Oats", 5)]);
    }

    #[test]
    fn quantities_are_order_independent() {
        let mut forward = ShoppingAggregate::new();
        forward.extend(["Milk", "Oats", "Milk", "Eggs"]);

        let mut backward = ShoppingAggregate::new();
        backward.extend(["Eggs", "Milk", "Oats", "Milk"]);

        assert_eq!(forward, backward);
    }

    #[test]
    fn total_equals_occurrences_across_lists() {
        let lists: Vec<Vec<&str>> = vec![
            vec!["Oats", "Milk"],
            vec!["Bread", "Butter"],
            vec!["Oats", "Milk"],
            vec!["Rice", "Rice", "Beans"],
        ];
        let occurrences: i64 = lists.iter().map(|l| l.len() as i64).sum();

        let mut agg = ShoppingAggregate::new();
        for list in &lists {
            agg.extend(list.iter().copied());
        }

        assert_eq!(agg.total_quantity(), occurrences);
        // Repeats within one list count per occurrence, not once.
        let rice = agg.entries().into_iter().find(|e| e.ingredient == "Rice");
        assert_eq!(rice.map(|e| e.quantity), Some(2));
    }

    #[test]
    fn entries_are_sorted_by_name() {
        let mut agg = ShoppingAggregate::new();
        agg.extend(["Zucchini", "Apple", "Milk"]);
        let names: Vec<String> = agg.entries().into_iter().map(|e| e.ingredient).collect();
        assert_eq!(names, ["Apple", "Milk", "Zucchini"]);
    }

    fn entry(ingredient: &str, quantity: i64) -> ShoppingEntry {
        ShoppingEntry {
            ingredient: ingredient.to_owned(),
            quantity,
        }
    }
}
