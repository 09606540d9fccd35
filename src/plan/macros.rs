use serde::Serialize;

use super::model::AssignedFood;

/// Raw macro totals in kcal/grams, before display rounding.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MacroTotals {
    pub calories: f64,
    pub protein: f64,
    pub carbs: f64,
    pub fat: f64,
}

/// Sum the grams-scaled macros of a sequence of assigned foods.
/// Every item contributes `per-100g value * grams / 100`; an empty sequence
/// yields zeros. Missing numeric fields were already zero-defaulted at
/// deserialization, so this never fails.
pub fn aggregate<'a, I>(items: I) -> MacroTotals
where
    I: IntoIterator<Item = &'a AssignedFood>,
{
    let mut total = MacroTotals::default();
    for item in items {
        let factor = item.grams / 100.0;
        total.calories += item.calories * factor;
        total.protein += item.protein * factor;
        total.carbs += item.carbs * factor;
        total.fat += item.fat * factor;
    }
    total
}

/// Totals formatted for display: kcal with no decimals, macros with one.
/// Both the screen views and the PDF go through this, so they always agree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MacroSummary {
    pub calories: String,
    pub protein: String,
    pub carbs: String,
    pub fat: String,
}

impl MacroTotals {
    pub fn rounded(&self) -> MacroSummary {
        MacroSummary {
            calories: format!("{:.0}", self.calories),
            protein: format!("{:.1}", self.protein),
            carbs: format!("{:.1}", self.carbs),
            fat: format!("{:.1}", self.fat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    fn item(calories: f64, protein: f64, carbs: f64, fat: f64, grams: f64) -> AssignedFood {
        AssignedFood {
            id: Uuid::new_v4(),
            name: "test".into(),
            protein,
            carbs,
            fat,
            calories,
            grams,
        }
    }

    #[test]
    fn empty_sequence_yields_all_zeros() {
        let totals = aggregate([]);
        assert_eq!(totals, MacroTotals::default());
        let s = totals.rounded();
        assert_eq!(s.calories, "0");
        assert_eq!(s.protein, "0.0");
    }

    #[test]
    fn scales_each_item_by_grams_over_100() {
        // 120 kcal / 10p / 5c / 5f per 100g, assigned at 150g
        let totals = aggregate(&[item(120.0, 10.0, 5.0, 5.0, 150.0)]);
        let s = totals.rounded();
        assert_eq!(s.calories, "180");
        assert_eq!(s.protein, "15.0");
        assert_eq!(s.carbs, "7.5");
        assert_eq!(s.fat, "7.5");
    }

    #[test]
    fn totals_are_the_sum_over_all_items() {
        let items = vec![
            item(120.0, 10.0, 5.0, 5.0, 150.0),
            item(80.0, 2.0, 18.0, 0.5, 50.0),
            item(200.0, 20.0, 0.0, 12.0, 0.0), // 0g contributes nothing
        ];
        let totals = aggregate(&items);
        assert!((totals.calories - (180.0 + 40.0)).abs() < 1e-9);
        assert!((totals.protein - (15.0 + 1.0)).abs() < 1e-9);
        assert!((totals.carbs - (7.5 + 9.0)).abs() < 1e-9);
        assert!((totals.fat - (7.5 + 0.25)).abs() < 1e-9);
    }
}
