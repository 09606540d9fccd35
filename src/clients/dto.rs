use serde::{Deserialize, Serialize};
use time::macros::format_description;
use time::{Date, OffsetDateTime};
use uuid::Uuid;

use crate::catalog::repo::FoodRecord;
use crate::plan::model::{Plan, PlanDateRange};
use crate::plan::view::PlanView;

#[derive(Debug, Deserialize)]
pub struct NewClientRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default)]
    pub dob: Option<String>,
    #[serde(default)]
    pub gender: Option<String>,
    #[serde(default)]
    pub transformation_type: Option<String>,
    #[serde(default)]
    pub transformation_name: Option<String>,
    #[serde(default)]
    pub diet_type: Option<String>,
    #[serde(default)]
    pub height: Option<f64>,
    #[serde(default)]
    pub weight: Option<f64>,
}

#[derive(Debug, Serialize)]
pub struct ClientSummary {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub transformation_name: Option<String>,
    pub created_at: OffsetDateTime,
}

/// Trainer's view of one client: the raw editable plan plus the computed
/// projection, so editor and display always start from the same data.
#[derive(Debug, Serialize)]
pub struct ClientDetail {
    pub client: crate::clients::repo::ClientRecord,
    pub bmi: String,
    pub age: String,
    pub active_days: i64,
    pub view: PlanView,
}

/// Client's own dashboard payload.
#[derive(Debug, Serialize)]
pub struct ClientMe {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub dob: Option<String>,
    pub gender: Option<String>,
    pub transformation_type: Option<String>,
    pub transformation_name: Option<String>,
    pub diet_type: Option<String>,
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub bmi: String,
    pub dates: PlanDateRange,
    pub view: PlanView,
}

#[derive(Debug, Serialize)]
pub struct PlanEnvelope {
    pub plan: Plan,
    pub view: PlanView,
}

/// Picker options for one slot: catalog entries not yet assigned there.
#[derive(Debug, Serialize)]
pub struct SlotOptions {
    pub foods: Vec<FoodRecord>,
    pub essentials: Vec<String>,
}

/// BMI as weight / height², shown with one decimal, or "-" when either
/// input is missing.
pub fn bmi_label(height_cm: Option<f64>, weight_kg: Option<f64>) -> String {
    match (height_cm, weight_kg) {
        (Some(h), Some(w)) if h > 0.0 => {
            let meters = h / 100.0;
            format!("{:.1}", w / (meters * meters))
        }
        _ => "-".to_string(),
    }
}

/// Whole years between an ISO `YYYY-MM-DD` birth date and `today`, one less
/// when the birthday has not yet come around this year.
pub fn age_years(dob: &str, today: Date) -> Option<i32> {
    let fmt = format_description!("[year]-[month]-[day]");
    let dob = Date::parse(dob, &fmt).ok()?;
    let mut age = today.year() - dob.year();
    if (today.month() as u8, today.day()) < (dob.month() as u8, dob.day()) {
        age -= 1;
    }
    Some(age)
}

pub fn age_label(dob: Option<&str>) -> String {
    dob.and_then(|d| age_years(d, OffsetDateTime::now_utc().date()))
        .map(|a| a.to_string())
        .unwrap_or_else(|| "-".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::date;

    #[test]
    fn bmi_is_one_decimal() {
        assert_eq!(bmi_label(Some(170.0), Some(70.0)), "24.2");
        assert_eq!(bmi_label(Some(180.0), Some(81.0)), "25.0");
    }

    #[test]
    fn bmi_dashes_on_missing_inputs() {
        assert_eq!(bmi_label(None, Some(70.0)), "-");
        assert_eq!(bmi_label(Some(170.0), None), "-");
        assert_eq!(bmi_label(Some(0.0), Some(70.0)), "-");
    }

    #[test]
    fn age_counts_whole_years() {
        assert_eq!(age_years("1990-05-10", date!(2025 - 05 - 10)), Some(35));
        // birthday not yet reached this year
        assert_eq!(age_years("1990-05-10", date!(2025 - 05 - 09)), Some(34));
        assert_eq!(age_years("1990-12-31", date!(2025 - 01 - 01)), Some(34));
    }

    #[test]
    fn unparsable_dob_yields_dash() {
        assert_eq!(age_label(Some("not-a-date")), "-");
        assert_eq!(age_label(None), "-");
    }
}
