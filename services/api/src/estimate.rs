use crate::infra::InMemoryClimateRepository;
use clap::builder::PossibleValuesParser;
use clap::Args;
use climate_sense::advisor::{Assessment, Challenge, ClimateAdvisorService, GeminiClient};
use climate_sense::config::AppConfig;
use climate_sense::error::AppError;
use climate_sense::footprint::{validate_inputs, Category, UserInputs};
use std::fmt;
use std::sync::Arc;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    #[arg(long, value_parser = answers(Category::TransportMode))]
    pub(crate) transport_mode: String,
    #[arg(long, value_parser = answers(Category::VehicleDistance))]
    pub(crate) vehicle_distance: String,
    #[arg(long, value_parser = answers(Category::Electricity))]
    pub(crate) electricity: String,
    #[arg(long, value_parser = answers(Category::Diet))]
    pub(crate) diet: String,
    #[arg(long, value_parser = answers(Category::AirTravel))]
    pub(crate) air_travel: String,
    #[arg(long, value_parser = answers(Category::Waste))]
    pub(crate) waste: String,
    #[arg(long, value_parser = answers(Category::Recycling))]
    pub(crate) recycling: String,
    #[arg(long, value_parser = answers(Category::DeviceUsage))]
    pub(crate) device_usage: String,
    /// Print the assessment as JSON instead of a text report
    #[arg(long)]
    pub(crate) json: bool,
    /// Also request analysis, recommendations, and a weekly challenge from the configured model
    #[arg(long)]
    pub(crate) guidance: bool,
}

/// Accepted answers for a flag, taken from the category's weight table.
fn answers(category: Category) -> PossibleValuesParser {
    PossibleValuesParser::new(category.weights().iter().map(|(value, _)| *value))
}

impl EstimateArgs {
    fn answer(&self, category: Category) -> &str {
        match category {
            Category::TransportMode => &self.transport_mode,
            Category::VehicleDistance => &self.vehicle_distance,
            Category::Electricity => &self.electricity,
            Category::Diet => &self.diet,
            Category::AirTravel => &self.air_travel,
            Category::Waste => &self.waste,
            Category::Recycling => &self.recycling,
            Category::DeviceUsage => &self.device_usage,
        }
    }

    pub(crate) fn inputs(&self) -> UserInputs {
        Category::ordered()
            .into_iter()
            .map(|category| (category.key(), self.answer(category).to_string()))
            .collect()
    }
}

pub(crate) async fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let inputs = args.inputs();
    validate_inputs(&inputs)?;
    let assessment = Assessment::from_inputs(&inputs);

    if args.json {
        println!("{}", serde_json::to_string_pretty(&assessment)?);
    } else {
        print!("{}", render_assessment(&assessment));
    }

    if args.guidance {
        print_guidance(&inputs).await?;
    }
    Ok(())
}

pub(crate) fn render_assessment(assessment: &Assessment) -> String {
    AssessmentReport(assessment).to_string()
}

struct AssessmentReport<'a>(&'a Assessment);

impl fmt::Display for AssessmentReport<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let assessment = self.0;
        let footprint = &assessment.footprint;
        writeln!(f, "ClimateSense footprint estimate")?;
        writeln!(
            f,
            "- Total score: {} ({})",
            footprint.total_score,
            assessment.level.label()
        )?;
        writeln!(f, "  {}", assessment.level_description)?;
        writeln!(f, "Breakdown:")?;
        if footprint.breakdown.is_empty() {
            writeln!(f, "  (no positive contributions)")?;
        }
        for entry in &footprint.breakdown {
            writeln!(
                f,
                "  - {}: {} | score {} | {:.1}%",
                entry.category, entry.value, entry.score, entry.percentage
            )?;
        }
        writeln!(f, "\n{}", assessment.disclaimer)
    }
}

fn render_challenge(challenge: &Challenge) -> String {
    format!(
        "{}\n  What to do: {}\n  Why it matters: {}\n  Success criteria: {}",
        challenge.title, challenge.description, challenge.impact, challenge.success_criteria
    )
}

async fn print_guidance(inputs: &UserInputs) -> Result<(), AppError> {
    let config = AppConfig::load()?;
    let generator = Arc::new(GeminiClient::from_config(&config.generation)?);
    if !generator.is_configured() {
        println!("\nGuidance unavailable: set GEMINI_API_KEY to request generated advice.");
        return Ok(());
    }

    let service =
        ClimateAdvisorService::new(generator, Arc::new(InMemoryClimateRepository::default()));
    let user = service.register("cli")?;

    let analysis = service.analyze(inputs).await?;
    println!("\nImpact analysis\n{}", analysis.trim());

    let recommendations = service.recommend(inputs, &analysis).await?;
    println!("\nRecommendations\n{}", recommendations.trim());

    let issued = service.challenge(&user.id, inputs, &recommendations).await?;
    println!("\nYour 7-day challenge\n{}", render_challenge(&issued.challenge));
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Parser, Debug)]
    struct Harness {
        #[command(flatten)]
        args: EstimateArgs,
    }

    fn parse(extra: &[&str]) -> EstimateArgs {
        let mut argv = vec![
            "estimate",
            "--transport-mode",
            "EV",
            "--vehicle-distance",
            "Medium",
            "--electricity",
            "Low",
            "--diet",
            "Veg",
            "--air-travel",
            "Never",
            "--waste",
            "Low",
            "--recycling",
            "Yes",
            "--device-usage",
            "Medium",
        ];
        argv.extend_from_slice(extra);
        Harness::try_parse_from(argv).expect("arguments parse").args
    }

    #[test]
    fn flags_map_onto_canonical_inputs() {
        let args = parse(&["--json"]);
        assert!(args.json);
        assert!(!args.guidance);

        let inputs = args.inputs();
        let keys: Vec<&str> = inputs.keys().collect();
        assert_eq!(
            keys,
            Category::ordered()
                .iter()
                .map(|category| category.key())
                .collect::<Vec<_>>()
        );
        assert_eq!(inputs.get("diet").map(String::as_str), Some("Veg"));
        assert_eq!(inputs.get("recycling").map(String::as_str), Some("Yes"));
    }

    #[test]
    fn report_lists_total_level_breakdown_and_disclaimer() {
        let assessment = Assessment::from_inputs(&parse(&[]).inputs());
        let report = render_assessment(&assessment);

        // EV 8 + Medium 15 + Low 8 + Veg 5 + Never 0 + Low 5 + Yes -5 + Medium 8
        assert!(report.contains("- Total score: 44 (Low)"));
        assert!(report.contains("  - Vehicle Distance: Medium | score 15 | 34.1%"));
        assert!(!report.contains("Air Travel"));
        assert!(report.contains(assessment.disclaimer));
    }

    fn argv_with(category: Category, value: &str) -> Vec<String> {
        let mut argv = vec!["estimate".to_string()];
        for current in Category::ordered() {
            argv.push(format!("--{}", current.key().replace('_', "-")));
            let answer = if current == category {
                value
            } else {
                current.weights()[0].0
            };
            argv.push(answer.to_string());
        }
        argv
    }

    #[test]
    fn every_weighted_answer_is_accepted_by_its_flag() {
        for category in Category::ordered() {
            for (value, _) in category.weights() {
                let args = Harness::try_parse_from(argv_with(category, value))
                    .unwrap_or_else(|err| panic!("{} {value}: {err}", category.key()))
                    .args;
                assert_eq!(args.answer(category), *value);
            }
        }
    }

    #[test]
    fn answers_outside_the_weight_table_are_rejected() {
        assert!(Harness::try_parse_from(argv_with(Category::Diet, "Vegan")).is_err());
        assert!(Harness::try_parse_from(argv_with(Category::Recycling, "yes")).is_err());
        assert!(Harness::try_parse_from(argv_with(Category::Recycling, "Yes")).is_ok());
    }

    #[test]
    fn empty_breakdown_is_reported() {
        let inputs: UserInputs = [("recycling", "Yes")]
            .into_iter()
            .map(|(key, value)| (key, value.to_string()))
            .collect();
        let assessment = Assessment::from_inputs(&inputs);
        let report = render_assessment(&assessment);

        assert!(report.starts_with("ClimateSense footprint estimate\n"));
        assert!(report.contains("- Total score: 1 (Low)"));
        assert!(report.contains("  (no positive contributions)"));
        assert!(report.ends_with(&format!("\n\n{}\n", assessment.disclaimer)));
    }

    #[test]
    fn challenges_render_every_field() {
        let rendered = render_challenge(&Challenge {
            title: "Cold Wash Week".to_string(),
            description: "Wash clothes at 30C".to_string(),
            impact: "Less heating energy".to_string(),
            success_criteria: "Seven cold washes".to_string(),
        });
        assert!(rendered.starts_with("Cold Wash Week\n"));
        assert!(rendered.contains("Success criteria: Seven cold washes"));
    }
}
