//! The printable plan: cover, daily food chart, day-wise workout plan and
//! the guideline sheet, rendered deterministically from a client and their
//! plan.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::clients::dto::{age_label, bmi_label};
use crate::clients::repo::ClientRecord;
use crate::plan::macros::aggregate;
use crate::plan::model::Plan;

use super::layout::{self, Fonts, PageCursor, BLACK, BRAND_RED, MARGIN, PAGE_W};

const POSTER_WIDTH_MM: f32 = 160.0;

const GUIDELINES: [&str; 14] = [
    " * Health conditions and allergies must be informed (e.g., BP, diabetes).",
    " * Use only the recommended dosage.",
    " * Inform if you have seizures/fits or take regular medication.",
    "1. Sleep at least 8 hours daily.",
    "2. Eat suggested protein amount.",
    "3. Lift progressively heavier weights.",
    "4. Prioritize hypertrophy training.",
    "5. Macro ratio: Protein:Carbs:Fats = 3:2:2.",
    "6. Weigh yourself every 3 days and update coach.",
    "7. Do 40 mins brisk walking daily.",
    "8. Cheat *meal* allowed once every 10 days.",
    "9. Remind coach every SATURDAY for updates.",
    "10. Stay hydrated, be consistent!",
    "11. This plan is personalized—do not share.",
];

#[derive(Debug, Error)]
pub enum PdfError {
    #[error("client name is required for the PDF")]
    MissingClientName,
    #[error("could not load poster image: {0}")]
    Poster(String),
    #[error("pdf rendering failed: {0}")]
    Render(String),
}

pub fn pdf_filename(client_name: &str) -> String {
    format!("{client_name}_Plan_Full.pdf")
}

/// Render the full plan document. The client name is checked before the
/// poster is touched, so a nameless client never costs a file read.
pub fn generate(client: &ClientRecord, plan: &Plan, poster: &Path) -> Result<Vec<u8>, PdfError> {
    if client.name.trim().is_empty() {
        return Err(PdfError::MissingClientName);
    }
    let poster_bytes =
        fs::read(poster).map_err(|e| PdfError::Poster(format!("{}: {e}", poster.display())))?;
    render(client, plan, &poster_bytes)
}

fn render(client: &ClientRecord, plan: &Plan, poster: &[u8]) -> Result<Vec<u8>, PdfError> {
    debug!(
        slots = plan.active_slots().len(),
        days = plan.sorted_days().len(),
        "rendering plan pdf"
    );
    let (mut page, fonts) =
        PageCursor::new("TEAM IRON LIFE").map_err(|e| PdfError::Render(e.to_string()))?;

    cover(&mut page, &fonts, client, plan, poster)?;
    food_section(&mut page, &fonts, plan);
    workout_section(&mut page, &fonts, plan);
    guideline_section(&mut page, &fonts);

    page.finish().map_err(|e| PdfError::Render(e.to_string()))
}

fn cover(
    page: &mut PageCursor,
    fonts: &Fonts,
    client: &ClientRecord,
    plan: &Plan,
    poster: &[u8],
) -> Result<(), PdfError> {
    page.set_color(BRAND_RED);
    page.text_centered("TEAM IRON LIFE", 22.0, &fonts.bold);
    page.y += 12.0;

    page.set_color(BLACK);
    let from = plan.dates.from.as_deref().unwrap_or("Not specified");
    let to = plan.dates.to.as_deref().unwrap_or("Not specified");
    page.text_centered(
        &format!("Diet Plan Duration: {from} to {to}"),
        14.0,
        &fonts.regular,
    );
    page.y += 8.0;

    let transformation = client
        .transformation_name
        .as_deref()
        .filter(|s| !s.trim().is_empty())
        .unwrap_or("Custom Transformation");
    page.text_centered(
        &format!("Transformation: {transformation}"),
        14.0,
        &fonts.regular,
    );
    page.y += 10.0;

    page.place_jpeg(poster, POSTER_WIDTH_MM)
        .map_err(PdfError::Poster)?;
    page.y += 10.0;

    let height = client
        .height
        .map_or_else(|| "-".to_string(), |h| h.to_string());
    let weight = client
        .weight
        .map_or_else(|| "-".to_string(), |w| w.to_string());
    page.text_centered(&client.name, 15.0, &fonts.bold);
    page.y += 10.0;
    page.text_centered(
        &format!(
            "Age: {}  Height: {} cm  Weight: {} kg",
            age_label(client.dob.as_deref()),
            height,
            weight
        ),
        15.0,
        &fonts.bold,
    );
    page.y += 10.0;
    page.text_centered(
        &format!("BMI: {}", bmi_label(client.height, client.weight)),
        15.0,
        &fonts.bold,
    );
    page.y += 10.0;
    Ok(())
}

fn food_section(page: &mut PageCursor, fonts: &Fonts, plan: &Plan) {
    page.new_page();
    page.set_color(BRAND_RED);
    page.text("Daily Food Chart", 16.0, MARGIN, &fonts.bold);

    page.set_color(BLACK);
    let totals = aggregate(plan.all_foods()).rounded();
    page.y = 30.0;
    page.text(
        &format!("Total Calories: {} kcal", totals.calories),
        12.0,
        MARGIN,
        &fonts.regular,
    );
    page.y = 38.0;
    page.text(
        &format!(
            "Protein: {}g | Carbs: {}g | Fat: {}g",
            totals.protein, totals.carbs, totals.fat
        ),
        12.0,
        MARGIN,
        &fonts.regular,
    );
    page.y = 48.0;

    for slot in plan.active_slots() {
        let label = slot.label();
        let foods = plan.foods_in(slot);
        let rows: Vec<[String; 4]> = if foods.is_empty() {
            vec![[label.to_string(), "-".into(), "-".into(), "-".into()]]
        } else {
            foods
                .iter()
                .map(|f| {
                    [
                        label.to_string(),
                        f.name.clone(),
                        format!("{}g", f.grams),
                        format!("{:.0} kcal", f.scaled_kcal()),
                    ]
                })
                .collect()
        };
        page.break_at(layout::TABLE_BREAK_Y);
        page.table(
            fonts,
            &[label, "Food Item", "Grams", "Calories"],
            &[62.0, 58.0, 25.0, 25.0],
            &rows,
        );
        page.y += 6.0;

        let essentials = plan.essentials_in(slot);
        if !essentials.is_empty() {
            let joined = essentials
                .iter()
                .map(|e| {
                    if e.dosage.trim().is_empty() {
                        e.name.clone()
                    } else {
                        format!("{} ({})", e.name, e.dosage)
                    }
                })
                .collect::<Vec<_>>()
                .join(", ");
            let lines = layout::wrap(
                &format!("Essentials: {joined}"),
                11.0,
                PAGE_W - 2.0 * MARGIN,
            );
            for line in &lines {
                page.break_at(layout::TABLE_BREAK_Y);
                page.text(line, 11.0, MARGIN, &fonts.italic);
                page.y += 6.0;
            }
            page.y += 6.0;
        }
        page.y += 4.0;
    }
}

fn workout_section(page: &mut PageCursor, fonts: &Fonts, plan: &Plan) {
    page.new_page();
    page.set_color(BRAND_RED);
    page.text("Workout Plan (Day-wise)", 16.0, MARGIN, &fonts.bold);
    page.y += 10.0;

    page.set_color(BLACK);
    for day in plan.sorted_days() {
        page.break_at(250.0);
        page.text(day, 13.0, MARGIN, &fonts.bold);
        page.y += 6.0;

        let rows: Vec<[String; 4]> = plan.workouts[day]
            .iter()
            .map(|w| {
                let (sets, reps) = w.prescription.display();
                let equipment = if w.equipment.trim().is_empty() {
                    "None".to_string()
                } else {
                    w.equipment.clone()
                };
                [w.name.clone(), equipment, sets, reps]
            })
            .collect();
        page.table(
            fonts,
            &["Workout", "Equipment", "Sets", "Reps"],
            &[60.0, 50.0, 20.0, 40.0],
            &rows,
        );
        page.y += 10.0;
    }
}

fn guideline_section(page: &mut PageCursor, fonts: &Fonts) {
    page.new_page();
    page.set_color(BRAND_RED);
    page.text("Important Guidelines", 14.0, MARGIN, &fonts.bold);
    page.y += 10.0;

    page.set_color(BLACK);
    for line in GUIDELINES {
        page.break_at(280.0);
        page.text(line, 12.0, MARGIN, &fonts.regular);
        page.y += 8.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::model::{AssignedWorkout, MealSlot, Phase, Prescription};
    use sqlx::types::Json;
    use time::OffsetDateTime;
    use uuid::Uuid;

    fn client(name: &str) -> ClientRecord {
        ClientRecord {
            id: Uuid::new_v4(),
            name: name.to_string(),
            phone: "9876543210".into(),
            email: "client@example.com".into(),
            dob: Some("1990-05-10".into()),
            gender: Some("male".into()),
            transformation_type: Some("fat-loss".into()),
            transformation_name: Some("Summer Shred".into()),
            diet_type: Some("vegetarian".into()),
            height: Some(175.0),
            weight: Some(80.0),
            plan: Json(Plan::default()),
            created_at: OffsetDateTime::now_utc(),
        }
    }

    fn populated_plan() -> Plan {
        let mut plan = Plan::default();
        plan.dates.from = Some("2025-06-01".into());
        plan.dates.to = Some("2025-08-31".into());
        plan.assign_food(
            MealSlot::Lunch,
            crate::plan::model::AssignedFood {
                id: Uuid::new_v4(),
                name: "Soya Chunks".into(),
                protein: 52.0,
                carbs: 33.0,
                fat: 0.5,
                calories: 345.0,
                grams: 100.0,
            },
        )
        .unwrap();
        plan.assign_essential(MealSlot::Night, "ZMA").unwrap();

        let mut prescription = Prescription::default();
        prescription.set_phase_sets(Phase::Warmup, 2);
        prescription.set_phase_reps(Phase::Warmup, 12);
        prescription.set_phase_sets(Phase::Working, 3);
        prescription.set_phase_reps(Phase::Working, 8);
        plan.workouts.insert(
            "Day 1".into(),
            vec![AssignedWorkout {
                id: Uuid::new_v4(),
                name: "Bench Press".into(),
                muscle: "chest".into(),
                equipment: "Barbell".into(),
                prescription,
            }],
        );
        plan
    }

    fn poster_path() -> &'static Path {
        Path::new(concat!(env!("CARGO_MANIFEST_DIR"), "/assets/poster.jpg"))
    }

    #[test]
    fn filename_embeds_the_client_name() {
        assert_eq!(pdf_filename("Arjun"), "Arjun_Plan_Full.pdf");
    }

    #[test]
    fn nameless_client_fails_before_the_poster_is_read() {
        let err = generate(
            &client("   "),
            &Plan::default(),
            Path::new("/nonexistent/poster.jpg"),
        )
        .unwrap_err();
        // a poster error here would mean the file was read first
        assert!(matches!(err, PdfError::MissingClientName));
    }

    #[test]
    fn missing_poster_is_a_poster_error() {
        let err = generate(
            &client("Arjun"),
            &Plan::default(),
            Path::new("/nonexistent/poster.jpg"),
        )
        .unwrap_err();
        assert!(matches!(err, PdfError::Poster(_)));
    }

    #[test]
    fn full_plan_renders_to_a_pdf() {
        let bytes = generate(&client("Arjun"), &populated_plan(), poster_path()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn empty_plan_renders_to_a_pdf() {
        let bytes = generate(&client("Arjun"), &Plan::default(), poster_path()).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }
}
