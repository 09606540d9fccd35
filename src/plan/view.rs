use serde::Serialize;

use super::macros::{aggregate, MacroSummary};
use super::model::{AssignedEssential, Plan, PlanDateRange, WORKOUT_DAYS};

/// On-screen projection of a plan: active meal slots in canonical order with
/// per-slot totals, the daily nutrition summary, and workout days in
/// "Day 1".."Day 6" order. Slots and days with nothing assigned are absent.
#[derive(Debug, Serialize)]
pub struct PlanView {
    pub daily_summary: MacroSummary,
    pub meals: Vec<MealView>,
    pub days: Vec<DayView>,
    pub dates: PlanDateRange,
}

#[derive(Debug, Serialize)]
pub struct MealView {
    pub slot: String,
    pub foods: Vec<FoodView>,
    pub essentials: Vec<AssignedEssential>,
    /// Present only when the slot has food; essentials never contribute.
    pub meal_total: Option<MacroSummary>,
}

#[derive(Debug, Serialize)]
pub struct FoodView {
    pub name: String,
    pub grams: f64,
    pub kcal: String,
}

#[derive(Debug, Serialize)]
pub struct DayView {
    pub day: String,
    pub workouts: Vec<WorkoutView>,
}

#[derive(Debug, Serialize)]
pub struct WorkoutView {
    pub name: String,
    pub equipment: String,
    pub total_sets: u32,
    pub sets: String,
    pub reps: String,
}

impl PlanView {
    pub fn project(plan: &Plan) -> PlanView {
        let meals = plan
            .active_slots()
            .into_iter()
            .map(|slot| {
                let foods = plan.foods_in(slot);
                let meal_total = if foods.is_empty() {
                    None
                } else {
                    Some(aggregate(foods).rounded())
                };
                MealView {
                    slot: slot.label().to_string(),
                    foods: foods
                        .iter()
                        .map(|f| FoodView {
                            name: f.name.clone(),
                            grams: f.grams,
                            kcal: format!("{:.0}", f.scaled_kcal()),
                        })
                        .collect(),
                    essentials: plan.essentials_in(slot).to_vec(),
                    meal_total,
                }
            })
            .collect();

        let days = WORKOUT_DAYS
            .iter()
            .filter_map(|day| {
                let workouts = plan.workouts.get(*day)?;
                if workouts.is_empty() {
                    return None;
                }
                Some(DayView {
                    day: day.to_string(),
                    workouts: workouts
                        .iter()
                        .map(|w| {
                            let (sets, reps) = w.prescription.display();
                            WorkoutView {
                                name: w.name.clone(),
                                equipment: if w.equipment.trim().is_empty() {
                                    "None".to_string()
                                } else {
                                    w.equipment.clone()
                                },
                                total_sets: w.prescription.total_sets(),
                                sets,
                                reps,
                            }
                        })
                        .collect(),
                })
            })
            .collect();

        PlanView {
            daily_summary: aggregate(plan.all_foods()).rounded(),
            meals,
            days,
            dates: plan.dates.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{AssignedFood, AssignedWorkout, MealSlot, Phase, Prescription};
    use uuid::Uuid;

    fn food(name: &str, calories: f64, grams: f64) -> AssignedFood {
        AssignedFood {
            id: Uuid::new_v4(),
            name: name.into(),
            protein: 10.0,
            carbs: 5.0,
            fat: 5.0,
            calories,
            grams,
        }
    }

    fn workout(name: &str) -> AssignedWorkout {
        AssignedWorkout {
            id: Uuid::new_v4(),
            name: name.into(),
            muscle: "legs".into(),
            equipment: String::new(),
            prescription: Prescription::default(),
        }
    }

    #[test]
    fn meals_follow_canonical_slot_order_and_skip_inactive() {
        let mut plan = Plan::default();
        plan.assign_food(MealSlot::Dinner, food("Paneer", 265.0, 100.0))
            .unwrap();
        plan.assign_food(MealSlot::EmptyStomach, food("Oats", 389.0, 50.0))
            .unwrap();
        plan.assign_essential(MealSlot::Lunch, "Creatine").unwrap();

        let view = PlanView::project(&plan);
        let slots: Vec<&str> = view.meals.iter().map(|m| m.slot.as_str()).collect();
        assert_eq!(
            slots,
            vec!["Empty Stomach or Pre Workout", "Lunch", "Dinner"]
        );
    }

    #[test]
    fn essentials_only_slot_has_no_meal_total() {
        let mut plan = Plan::default();
        plan.assign_essential(MealSlot::Night, "ZMA").unwrap();
        let view = PlanView::project(&plan);
        assert_eq!(view.meals.len(), 1);
        assert!(view.meals[0].meal_total.is_none());
        assert_eq!(view.meals[0].essentials[0].name, "ZMA");
    }

    #[test]
    fn slot_and_daily_totals_agree_with_aggregation() {
        let mut plan = Plan::default();
        plan.assign_food(MealSlot::Lunch, food("Soya", 120.0, 150.0))
            .unwrap();
        let view = PlanView::project(&plan);
        let total = view.meals[0].meal_total.as_ref().unwrap();
        assert_eq!(total.calories, "180");
        assert_eq!(total.protein, "15.0");
        assert_eq!(view.daily_summary.calories, "180");
        assert_eq!(view.meals[0].foods[0].kcal, "180");
    }

    #[test]
    fn days_render_in_fixed_order_with_display_prescriptions() {
        let mut plan = Plan::default();
        plan.workouts
            .insert("Day 3".into(), vec![workout("Leg Press")]);
        let mut squat = workout("Squat");
        squat.prescription.set_phase_sets(Phase::Working, 4);
        squat.prescription.set_phase_reps(Phase::Working, 8);
        plan.workouts.insert("Day 1".into(), vec![squat]);
        plan.workouts.insert("Day 2".into(), Vec::new());

        let view = PlanView::project(&plan);
        let days: Vec<&str> = view.days.iter().map(|d| d.day.as_str()).collect();
        assert_eq!(days, vec!["Day 1", "Day 3"]);

        let squat = &view.days[0].workouts[0];
        assert_eq!(squat.sets, "-");
        assert_eq!(squat.reps, "working: 4x8");
        assert_eq!(squat.equipment, "None");

        let press = &view.days[1].workouts[0];
        assert_eq!(press.sets, "3");
        assert_eq!(press.reps, "10");
    }
}
