use serde::{Deserialize, Serialize};

use super::repo::WorkoutRecord;

/// The fixed muscle groups a workout can target; the grouping key of the
/// catalog browser and the per-day picker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Muscle {
    Chest,
    Back,
    Shoulders,
    Legs,
    Arms,
    Core,
}

impl Muscle {
    pub fn as_str(self) -> &'static str {
        match self {
            Muscle::Chest => "chest",
            Muscle::Back => "back",
            Muscle::Shoulders => "shoulders",
            Muscle::Legs => "legs",
            Muscle::Arms => "arms",
            Muscle::Core => "core",
        }
    }
}

/// Food payload without calories: the kcal value is always derived,
/// never entered independently.
#[derive(Debug, Deserialize)]
pub struct FoodPayload {
    pub name: String,
    #[serde(default)]
    pub protein: f64,
    #[serde(default)]
    pub carbs: f64,
    #[serde(default)]
    pub fat: f64,
}

impl FoodPayload {
    /// 4 kcal/g for protein and carbs, 9 kcal/g for fat.
    pub fn derived_calories(&self) -> f64 {
        self.protein * 4.0 + self.carbs * 4.0 + self.fat * 9.0
    }
}

#[derive(Debug, Deserialize)]
pub struct WorkoutPayload {
    pub name: String,
    pub muscle: Muscle,
    #[serde(default)]
    pub equipment: String,
}

#[derive(Debug, Deserialize)]
pub struct EssentialPayload {
    pub name: String,
}

/// One muscle group of the catalog browser, groups sorted alphabetically.
#[derive(Debug, Serialize)]
pub struct MuscleGroup {
    pub muscle: String,
    pub workouts: Vec<WorkoutRecord>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn calories_are_derived_from_macros() {
        let payload = FoodPayload {
            name: "Soya".into(),
            protein: 10.0,
            carbs: 5.0,
            fat: 5.0,
        };
        assert_eq!(payload.derived_calories(), 105.0);
    }

    #[test]
    fn zero_macros_derive_zero_calories() {
        let payload: FoodPayload = serde_json::from_str(r#"{"name":"Water"}"#).unwrap();
        assert_eq!(payload.derived_calories(), 0.0);
    }

    #[test]
    fn muscle_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Muscle::Chest).unwrap(), r#""chest""#);
        let m: Muscle = serde_json::from_str(r#""legs""#).unwrap();
        assert_eq!(m, Muscle::Legs);
    }
}
