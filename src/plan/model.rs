use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;
use uuid::Uuid;

/// The twelve meal slots of a plan. Declaration order is the canonical order
/// used everywhere meals are listed or printed.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub enum MealSlot {
    #[serde(rename = "Empty Stomach or Pre Workout")]
    EmptyStomach,
    #[serde(rename = "Early Morning (6:30–7:00 AM)")]
    EarlyMorning,
    #[serde(rename = "Breakfast or Post Workout")]
    Breakfast,
    #[serde(rename = "Mid Morning (11:00 AM)")]
    MidMorning,
    #[serde(rename = "Lunch")]
    Lunch,
    #[serde(rename = "Afternoon (12:30–1:00 PM)")]
    Afternoon,
    #[serde(rename = "Evening")]
    Evening,
    #[serde(rename = "Late Evening or Pre Workout")]
    LateEvening,
    #[serde(rename = "Post Workout")]
    PostWorkout,
    #[serde(rename = "Dinner")]
    Dinner,
    #[serde(rename = "Night")]
    Night,
    #[serde(rename = "30 min Before Bed")]
    BeforeBed,
}

impl MealSlot {
    pub const ALL: [MealSlot; 12] = [
        MealSlot::EmptyStomach,
        MealSlot::EarlyMorning,
        MealSlot::Breakfast,
        MealSlot::MidMorning,
        MealSlot::Lunch,
        MealSlot::Afternoon,
        MealSlot::Evening,
        MealSlot::LateEvening,
        MealSlot::PostWorkout,
        MealSlot::Dinner,
        MealSlot::Night,
        MealSlot::BeforeBed,
    ];

    pub fn label(self) -> &'static str {
        match self {
            MealSlot::EmptyStomach => "Empty Stomach or Pre Workout",
            MealSlot::EarlyMorning => "Early Morning (6:30–7:00 AM)",
            MealSlot::Breakfast => "Breakfast or Post Workout",
            MealSlot::MidMorning => "Mid Morning (11:00 AM)",
            MealSlot::Lunch => "Lunch",
            MealSlot::Afternoon => "Afternoon (12:30–1:00 PM)",
            MealSlot::Evening => "Evening",
            MealSlot::LateEvening => "Late Evening or Pre Workout",
            MealSlot::PostWorkout => "Post Workout",
            MealSlot::Dinner => "Dinner",
            MealSlot::Night => "Night",
            MealSlot::BeforeBed => "30 min Before Bed",
        }
    }

    pub fn from_label(label: &str) -> Option<MealSlot> {
        MealSlot::ALL.iter().copied().find(|s| s.label() == label)
    }
}

impl fmt::Display for MealSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The six workout days of the fixed weekly split, in screen order.
pub const WORKOUT_DAYS: [&str; 6] = ["Day 1", "Day 2", "Day 3", "Day 4", "Day 5", "Day 6"];

/// Numeric suffix of a day label, for ordering days. "Day 10" sorts after
/// "Day 2"; labels without digits sort first.
pub fn day_number(label: &str) -> u32 {
    let digits: String = label
        .chars()
        .skip_while(|c| !c.is_ascii_digit())
        .take_while(|c| c.is_ascii_digit())
        .collect();
    digits.parse().unwrap_or(0)
}

/// Catalog food snapshotted into a meal slot at assignment time.
/// Macro fields are per 100 g and scale by `grams / 100` at render time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedFood {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
    #[serde(default)]
    pub calories: f64,
    #[serde(default)]
    pub grams: f64,
}

impl AssignedFood {
    pub fn scaled_kcal(&self) -> f64 {
        self.calories * self.grams / 100.0
    }
}

/// A supplement assigned to a slot. Stored by name only, deliberately
/// decoupled from the essentials catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedEssential {
    pub name: String,
    #[serde(default)]
    pub dosage: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Warmup,
    Working,
    Failure,
    Drop,
}

impl Phase {
    pub const ALL: [Phase; 4] = [Phase::Warmup, Phase::Working, Phase::Failure, Phase::Drop];

    pub fn label(self) -> &'static str {
        match self {
            Phase::Warmup => "warmup",
            Phase::Working => "working",
            Phase::Failure => "failure",
            Phase::Drop => "drop",
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhaseSets {
    #[serde(default)]
    pub sets: u32,
    #[serde(default)]
    pub reps: u32,
}

/// Per-phase set prescription for one workout.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetBreakdown {
    #[serde(default)]
    pub warmup: PhaseSets,
    #[serde(default)]
    pub working: PhaseSets,
    #[serde(default)]
    pub failure: PhaseSets,
    #[serde(default)]
    pub drop: PhaseSets,
}

impl SetBreakdown {
    pub fn phase(&self, phase: Phase) -> PhaseSets {
        match phase {
            Phase::Warmup => self.warmup,
            Phase::Working => self.working,
            Phase::Failure => self.failure,
            Phase::Drop => self.drop,
        }
    }

    pub fn phase_mut(&mut self, phase: Phase) -> &mut PhaseSets {
        match phase {
            Phase::Warmup => &mut self.warmup,
            Phase::Working => &mut self.working,
            Phase::Failure => &mut self.failure,
            Phase::Drop => &mut self.drop,
        }
    }

    /// Total sets across all four phases. The workout-level set count is
    /// always derived from this, never stored separately.
    pub fn total_sets(&self) -> u32 {
        Phase::ALL.iter().map(|p| self.phase(*p).sets).sum()
    }

    pub fn has_sets(&self) -> bool {
        Phase::ALL.iter().any(|p| self.phase(*p).sets > 0)
    }
}

/// How a workout is prescribed: a flat sets x reps pair, or a per-phase
/// breakdown. A workout toggled on starts as `Flat { 0, 0 }` so an
/// unconfigured entry is distinguishable from one configured with defaults.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Prescription {
    Flat {
        #[serde(default)]
        sets: u32,
        #[serde(default)]
        reps: u32,
    },
    Phased(SetBreakdown),
}

impl Default for Prescription {
    fn default() -> Self {
        Prescription::Flat { sets: 0, reps: 0 }
    }
}

impl Prescription {
    pub fn total_sets(&self) -> u32 {
        match self {
            Prescription::Flat { sets, .. } => *sets,
            Prescription::Phased(b) => b.total_sets(),
        }
    }

    /// True when any phase has sets, i.e. the flat view is hidden.
    pub fn has_breakdown(&self) -> bool {
        matches!(self, Prescription::Phased(b) if b.has_sets())
    }

    /// Edit one phase's set count. A flat prescription is promoted to a
    /// phased one; the derived total stays consistent by construction.
    pub fn set_phase_sets(&mut self, phase: Phase, sets: u32) {
        self.breakdown_mut().phase_mut(phase).sets = sets;
    }

    /// Edit one phase's rep count. Does not affect the derived total.
    pub fn set_phase_reps(&mut self, phase: Phase, reps: u32) {
        self.breakdown_mut().phase_mut(phase).reps = reps;
    }

    fn breakdown_mut(&mut self) -> &mut SetBreakdown {
        if let Prescription::Flat { .. } = self {
            *self = Prescription::Phased(SetBreakdown::default());
        }
        match self {
            Prescription::Phased(b) => b,
            Prescription::Flat { .. } => unreachable!(),
        }
    }

    /// (sets cell, reps cell) as shown on screen and in the printed table.
    /// With an active breakdown the sets cell is "-" and reps lists every
    /// phase with sets, in phase order; otherwise the flat pair is shown
    /// with the legacy 3 x 10 defaults for unset values.
    pub fn display(&self) -> (String, String) {
        match self {
            Prescription::Phased(b) if b.has_sets() => {
                let reps = Phase::ALL
                    .iter()
                    .filter(|p| b.phase(**p).sets > 0)
                    .map(|p| {
                        let ps = b.phase(*p);
                        format!("{}: {}x{}", p.label(), ps.sets, ps.reps)
                    })
                    .collect::<Vec<_>>()
                    .join(", ");
                ("-".to_string(), reps)
            }
            Prescription::Phased(_) => ("3".to_string(), "10".to_string()),
            Prescription::Flat { sets, reps } => (
                if *sets == 0 { 3 } else { *sets }.to_string(),
                if *reps == 0 { 10 } else { *reps }.to_string(),
            ),
        }
    }
}

/// Catalog workout snapshotted into a day at assignment time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignedWorkout {
    pub id: Uuid,
    pub name: String,
    #[serde(default)]
    pub muscle: String,
    #[serde(default)]
    pub equipment: String,
    #[serde(default)]
    pub prescription: Prescription,
}

/// Display-only date range; `from` after `to` is accepted as-is.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PlanDateRange {
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PlanError {
    #[error("\"{name}\" is already assigned to {slot}")]
    DuplicateFood { slot: MealSlot, name: String },
    #[error("essential \"{name}\" is already assigned to {slot}")]
    DuplicateEssential { slot: MealSlot, name: String },
    #[error("essential name cannot be empty ({slot})")]
    EmptyEssentialName { slot: MealSlot },
    #[error("\"{name}\" is already assigned to {day}")]
    DuplicateWorkout { day: String, name: String },
}

/// A client's full assignment: food and essentials per meal slot, workouts
/// per day, and the display date range. Embedded in the client record and
/// saved whole on explicit save; the later save wins.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Plan {
    #[serde(default)]
    pub food: BTreeMap<MealSlot, Vec<AssignedFood>>,
    #[serde(default)]
    pub essentials: BTreeMap<MealSlot, Vec<AssignedEssential>>,
    #[serde(default)]
    pub workouts: BTreeMap<String, Vec<AssignedWorkout>>,
    #[serde(default)]
    pub dates: PlanDateRange,
}

impl Plan {
    /// A slot is active when it has at least one food or essential.
    pub fn slot_is_active(&self, slot: MealSlot) -> bool {
        self.food.get(&slot).map_or(false, |v| !v.is_empty())
            || self.essentials.get(&slot).map_or(false, |v| !v.is_empty())
    }

    /// Active slots in canonical order.
    pub fn active_slots(&self) -> Vec<MealSlot> {
        MealSlot::ALL
            .iter()
            .copied()
            .filter(|s| self.slot_is_active(*s))
            .collect()
    }

    pub fn foods_in(&self, slot: MealSlot) -> &[AssignedFood] {
        self.food.get(&slot).map_or(&[], Vec::as_slice)
    }

    pub fn essentials_in(&self, slot: MealSlot) -> &[AssignedEssential] {
        self.essentials.get(&slot).map_or(&[], Vec::as_slice)
    }

    /// All assigned food across every slot, for the whole-plan totals.
    pub fn all_foods(&self) -> impl Iterator<Item = &AssignedFood> {
        self.food.values().flatten()
    }

    /// Days with at least one workout, ordered by numeric suffix.
    pub fn sorted_days(&self) -> Vec<&str> {
        let mut days: Vec<&str> = self
            .workouts
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(day, _)| day.as_str())
            .collect();
        days.sort_by_key(|d| day_number(d));
        days
    }

    pub fn has_food(&self, slot: MealSlot, food_id: Uuid) -> bool {
        self.foods_in(slot).iter().any(|f| f.id == food_id)
    }

    pub fn has_essential(&self, slot: MealSlot, name: &str) -> bool {
        self.essentials_in(slot)
            .iter()
            .any(|e| e.name.eq_ignore_ascii_case(name))
    }

    /// Assign a food snapshot to a slot. A food already in the slot (same
    /// catalog id) is rejected.
    pub fn assign_food(&mut self, slot: MealSlot, food: AssignedFood) -> Result<(), PlanError> {
        if self.has_food(slot, food.id) {
            return Err(PlanError::DuplicateFood {
                slot,
                name: food.name,
            });
        }
        self.food.entry(slot).or_default().push(food);
        Ok(())
    }

    /// Assign an essential by name. Empty names and case-insensitive
    /// duplicates within the slot are rejected.
    pub fn assign_essential(&mut self, slot: MealSlot, name: &str) -> Result<(), PlanError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(PlanError::EmptyEssentialName { slot });
        }
        if self.has_essential(slot, name) {
            return Err(PlanError::DuplicateEssential {
                slot,
                name: name.to_string(),
            });
        }
        self.essentials.entry(slot).or_default().push(AssignedEssential {
            name: name.to_string(),
            dosage: String::new(),
        });
        Ok(())
    }

    /// Toggle a workout on a day: remove it when present, otherwise add it
    /// unconfigured (no sets, no reps, no breakdown).
    pub fn toggle_workout(&mut self, day: &str, workout: AssignedWorkout) {
        let list = self.workouts.entry(day.to_string()).or_default();
        if let Some(pos) = list.iter().position(|w| w.id == workout.id) {
            list.remove(pos);
        } else {
            list.push(AssignedWorkout {
                prescription: Prescription::default(),
                ..workout
            });
        }
    }

    /// Re-check the per-slot and per-day uniqueness invariants over a whole
    /// plan, for drafts arriving from the editor in one piece.
    pub fn validate(&self) -> Result<(), PlanError> {
        for (slot, foods) in &self.food {
            for (i, f) in foods.iter().enumerate() {
                if foods[..i].iter().any(|other| other.id == f.id) {
                    return Err(PlanError::DuplicateFood {
                        slot: *slot,
                        name: f.name.clone(),
                    });
                }
            }
        }
        for (slot, essentials) in &self.essentials {
            for (i, e) in essentials.iter().enumerate() {
                if e.name.trim().is_empty() {
                    return Err(PlanError::EmptyEssentialName { slot: *slot });
                }
                if essentials[..i]
                    .iter()
                    .any(|other| other.name.eq_ignore_ascii_case(&e.name))
                {
                    return Err(PlanError::DuplicateEssential {
                        slot: *slot,
                        name: e.name.clone(),
                    });
                }
            }
        }
        for (day, workouts) in &self.workouts {
            for (i, w) in workouts.iter().enumerate() {
                if workouts[..i].iter().any(|other| other.id == w.id) {
                    return Err(PlanError::DuplicateWorkout {
                        day: day.clone(),
                        name: w.name.clone(),
                    });
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn food(id: Uuid, name: &str) -> AssignedFood {
        AssignedFood {
            id,
            name: name.to_string(),
            protein: 10.0,
            carbs: 5.0,
            fat: 5.0,
            calories: 120.0,
            grams: 100.0,
        }
    }

    fn workout(id: Uuid, name: &str) -> AssignedWorkout {
        AssignedWorkout {
            id,
            name: name.to_string(),
            muscle: "chest".into(),
            equipment: "Barbell".into(),
            prescription: Prescription::default(),
        }
    }

    #[test]
    fn assigning_same_food_twice_is_rejected() {
        let mut plan = Plan::default();
        let id = Uuid::new_v4();
        plan.assign_food(MealSlot::Lunch, food(id, "Soya")).unwrap();
        let err = plan
            .assign_food(MealSlot::Lunch, food(id, "Soya"))
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateFood { .. }));
        // the same food is fine in another slot
        plan.assign_food(MealSlot::Dinner, food(id, "Soya")).unwrap();
    }

    #[test]
    fn essential_duplicates_are_rejected_case_insensitively() {
        let mut plan = Plan::default();
        plan.assign_essential(MealSlot::Breakfast, "Multivitamin")
            .unwrap();
        let err = plan
            .assign_essential(MealSlot::Breakfast, "MULTIVITAMIN")
            .unwrap_err();
        assert!(matches!(err, PlanError::DuplicateEssential { .. }));
    }

    #[test]
    fn empty_essential_name_is_rejected() {
        let mut plan = Plan::default();
        let err = plan.assign_essential(MealSlot::Night, "   ").unwrap_err();
        assert_eq!(
            err,
            PlanError::EmptyEssentialName {
                slot: MealSlot::Night
            }
        );
    }

    #[test]
    fn toggling_a_workout_adds_unconfigured_then_removes() {
        let mut plan = Plan::default();
        let id = Uuid::new_v4();
        plan.toggle_workout("Day 1", workout(id, "Bench Press"));
        let w = &plan.workouts["Day 1"][0];
        assert_eq!(w.prescription, Prescription::Flat { sets: 0, reps: 0 });

        plan.toggle_workout("Day 1", workout(id, "Bench Press"));
        assert!(plan.workouts["Day 1"].is_empty());
    }

    #[test]
    fn phase_set_edit_keeps_derived_total_consistent() {
        let mut p = Prescription::default();
        p.set_phase_sets(Phase::Warmup, 2);
        p.set_phase_reps(Phase::Warmup, 12);
        assert_eq!(p.total_sets(), 2);
        p.set_phase_sets(Phase::Working, 3);
        assert_eq!(p.total_sets(), 5);
        p.set_phase_sets(Phase::Warmup, 1);
        assert_eq!(p.total_sets(), 4);
        // rep edits never move the total
        p.set_phase_reps(Phase::Working, 8);
        assert_eq!(p.total_sets(), 4);
    }

    #[test]
    fn breakdown_display_lists_phases_with_sets_in_order() {
        let mut p = Prescription::default();
        p.set_phase_sets(Phase::Warmup, 2);
        p.set_phase_reps(Phase::Warmup, 12);
        p.set_phase_sets(Phase::Working, 3);
        p.set_phase_reps(Phase::Working, 8);
        assert_eq!(p.total_sets(), 5);
        let (sets, reps) = p.display();
        assert_eq!(sets, "-");
        assert_eq!(reps, "warmup: 2x12, working: 3x8");
    }

    #[test]
    fn flat_display_uses_3x10_defaults_for_unset_values() {
        assert_eq!(
            Prescription::Flat { sets: 0, reps: 0 }.display(),
            ("3".to_string(), "10".to_string())
        );
        assert_eq!(
            Prescription::Flat { sets: 4, reps: 6 }.display(),
            ("4".to_string(), "6".to_string())
        );
        // a breakdown where every phase is zero behaves like an unset flat pair
        assert_eq!(
            Prescription::Phased(SetBreakdown::default()).display(),
            ("3".to_string(), "10".to_string())
        );
    }

    #[test]
    fn day_ordering_is_numeric_not_lexical() {
        let mut plan = Plan::default();
        for day in ["Day 10", "Day 2", "Day 1"] {
            plan.workouts
                .insert(day.to_string(), vec![workout(Uuid::new_v4(), "Squat")]);
        }
        plan.workouts.insert("Day 3".to_string(), Vec::new());
        assert_eq!(plan.sorted_days(), vec!["Day 1", "Day 2", "Day 10"]);
    }

    #[test]
    fn inactive_slots_never_appear() {
        let mut plan = Plan::default();
        plan.food.insert(MealSlot::Lunch, Vec::new());
        assert!(plan.active_slots().is_empty());

        plan.assign_essential(MealSlot::Night, "ZMA").unwrap();
        plan.assign_food(MealSlot::Lunch, food(Uuid::new_v4(), "Rice"))
            .unwrap();
        // canonical order, essentials alone keep a slot active
        assert_eq!(plan.active_slots(), vec![MealSlot::Lunch, MealSlot::Night]);
    }

    #[test]
    fn plan_round_trips_through_json_with_label_keys() {
        let mut plan = Plan::default();
        plan.assign_food(MealSlot::EmptyStomach, food(Uuid::new_v4(), "Oats"))
            .unwrap();
        plan.dates.from = Some("2025-01-01".into());
        let json = serde_json::to_value(&plan).unwrap();
        assert!(json["food"]
            .as_object()
            .unwrap()
            .contains_key("Empty Stomach or Pre Workout"));
        let back: Plan = serde_json::from_value(json).unwrap();
        assert_eq!(back.foods_in(MealSlot::EmptyStomach).len(), 1);
    }

    #[test]
    fn missing_numeric_fields_default_to_zero() {
        let f: AssignedFood = serde_json::from_value(serde_json::json!({
            "id": Uuid::new_v4(),
            "name": "Mystery",
            "grams": 50.0
        }))
        .unwrap();
        assert_eq!(f.calories, 0.0);
        assert_eq!(f.protein, 0.0);
        assert_eq!(f.scaled_kcal(), 0.0);
    }

    #[test]
    fn plan_dates_allow_reversed_range() {
        // known permissive behavior: the range is display-only and never
        // validated for ordering
        let mut plan = Plan::default();
        plan.dates.from = Some("2025-06-30".into());
        plan.dates.to = Some("2025-01-01".into());
        assert!(plan.validate().is_ok());
    }

    #[test]
    fn validate_catches_duplicates_in_a_whole_draft() {
        let id = Uuid::new_v4();
        let mut plan = Plan::default();
        plan.food
            .insert(MealSlot::Lunch, vec![food(id, "Soya"), food(id, "Soya")]);
        assert!(matches!(
            plan.validate(),
            Err(PlanError::DuplicateFood { .. })
        ));

        let mut plan = Plan::default();
        plan.essentials.insert(
            MealSlot::Lunch,
            vec![
                AssignedEssential {
                    name: "Fish Oil".into(),
                    dosage: String::new(),
                },
                AssignedEssential {
                    name: "fish oil".into(),
                    dosage: "2 caps".into(),
                },
            ],
        );
        assert!(matches!(
            plan.validate(),
            Err(PlanError::DuplicateEssential { .. })
        ));
    }
}
