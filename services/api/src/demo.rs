use crate::infra::{bundled_snapshot, load_catalog, parse_tag};
use clap::{ArgGroup, Args};
use label_guard::analysis::{AnalysisEngine, AnalysisRequest, AnalysisResult, UserProfile};
use label_guard::catalog::InMemoryCatalog;
use label_guard::config::AppConfig;
use label_guard::error::AppError;
use label_guard::telemetry;
use std::path::PathBuf;
use std::sync::Arc;

const SAMPLE_LABEL: &str = "\
MASALA INSTANT NOODLES
Ingredients: Refined wheat flour (Maida), palm oil, salt, flavour enhancers (INS 621, INS 627,
INS 631), antioxidant (E319), colour (E150d), thickener (E407).
Nutrition per 100g: Sugar: 4g, Sodium: 1180mg, Saturated Fat: 9g";

#[derive(Args, Debug)]
#[command(group(ArgGroup::new("input").required(true).args(["text", "file"])))]
pub(crate) struct AnalyzeArgs {
    /// Label text to analyse
    #[arg(long)]
    pub(crate) text: Option<String>,
    /// Read the label text from a file
    #[arg(long)]
    pub(crate) file: Option<PathBuf>,
    /// Health condition to personalise for (repeatable)
    #[arg(long, value_parser = parse_tag)]
    pub(crate) health: Vec<String>,
    /// Sensitivity or allergy tag to personalise for (repeatable)
    #[arg(long, value_parser = parse_tag)]
    pub(crate) sensitivity: Vec<String>,
    /// Include intermediate values in the output
    #[arg(long)]
    pub(crate) debug: bool,
    /// Print the result as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Health condition for the demo consumer (defaults to "pregnant")
    #[arg(long, value_parser = parse_tag)]
    pub(crate) health: Vec<String>,
    /// Print the result as JSON instead of a report
    #[arg(long)]
    pub(crate) json: bool,
}

pub(crate) async fn run_analyze(args: AnalyzeArgs) -> Result<(), AppError> {
    let AnalyzeArgs {
        text,
        file,
        health,
        sensitivity,
        debug,
        json,
    } = args;

    let config = AppConfig::load()?;
    telemetry::init_for_cli(&config.telemetry)?;

    let text = match (text, file) {
        (Some(text), _) => text,
        (None, Some(path)) => std::fs::read_to_string(path)?,
        (None, None) => String::new(),
    };

    let snapshot = load_catalog(&config.catalog)?;
    let engine = AnalysisEngine::new(Arc::new(InMemoryCatalog::from(snapshot)));
    let request =
        AnalysisRequest::new(text, UserProfile::new(health, sensitivity)).with_debug(debug);
    let result = engine.analyze(request).await?;

    print_result(&result, json)
}

pub(crate) async fn run_demo(args: DemoArgs) -> Result<(), AppError> {
    let DemoArgs { health, json } = args;
    let health = if health.is_empty() {
        vec!["pregnant".to_string()]
    } else {
        health
    };

    let engine = AnalysisEngine::new(Arc::new(InMemoryCatalog::from(bundled_snapshot()?)));
    let profile = UserProfile::new(health, ["MSG"]);

    if !json {
        println!("Label Guard demo");
        println!("Label:\n{SAMPLE_LABEL}");
        println!(
            "Consumer: health {:?}, sensitivities {:?}\n",
            profile.health_tags, profile.sensitivity_tags
        );
    }

    let result = engine
        .analyze(AnalysisRequest::new(SAMPLE_LABEL, profile))
        .await?;
    print_result(&result, json)
}

fn print_result(result: &AnalysisResult, json: bool) -> Result<(), AppError> {
    if json {
        let rendered = serde_json::to_string_pretty(result).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        println!("{}", render_report(result));
    }
    Ok(())
}

pub(crate) fn render_report(result: &AnalysisResult) -> String {
    let mut lines = Vec::new();

    lines.push(format!("Safety score: {:.1} / 10", result.safety_score));
    lines.push(format!("Verdict: {}", result.summary));
    lines.push(format!(
        "Recommended frequency: {}",
        result.frequency_recommendation.label()
    ));

    lines.push(String::new());
    if result.detected_additives.is_empty() {
        lines.push("Detected additives: none".to_string());
    } else {
        lines.push(format!(
            "Detected additives ({}):",
            result.detected_additives.len()
        ));
        for additive in &result.detected_additives {
            let category = additive.category.as_deref().unwrap_or("Uncategorised");
            lines.push(format!(
                "  - {} {} [{}] risk {}",
                additive.code,
                additive.name,
                category,
                additive.risk_level.label()
            ));
        }
    }

    lines.push(String::new());
    lines.push("Score breakdown:".to_string());
    for component in result.score_breakdown.components() {
        if component.amount != 0.0 {
            lines.push(format!("  {:+.1}  {}", component.amount, component.label));
        }
    }

    if !result.warnings_for_user.is_empty() {
        lines.push(String::new());
        lines.push("Warnings for you:".to_string());
        for warning in &result.warnings_for_user {
            lines.push(format!("  ! {warning}"));
        }
    }

    if !result.alternatives.is_empty() {
        lines.push(String::new());
        lines.push("Better alternatives:".to_string());
        for alternative in &result.alternatives {
            lines.push(format!(
                "  * {} ({:.1}) {} {}",
                alternative.name, alternative.score, alternative.why_better, alternative.cost
            ));
        }
    }

    if let Some(debug) = &result.debug {
        lines.push(String::new());
        lines.push(format!("Unclamped score: {:.1}", debug.unclamped_score));
        for trace in &debug.matches {
            lines.push(format!("  matched {} by {}", trace.code, trace.matched_by));
        }
    }

    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn sample_label_report_lists_breakdown() {
        let engine = AnalysisEngine::new(Arc::new(InMemoryCatalog::from(
            bundled_snapshot().expect("bundled catalog"),
        )));
        let result = engine
            .analyze(AnalysisRequest::new(
                SAMPLE_LABEL,
                UserProfile::new(["pregnant"], ["MSG"]),
            ))
            .await
            .expect("analysis succeeds");

        assert_eq!(result.detected_additives.len(), 6);
        assert_eq!(result.frequency_recommendation.label(), "Avoid / Rare treat");

        let report = render_report(&result);
        assert!(report.contains("-1.5  additive count"));
        assert!(report.contains("-1.0  high sodium"));
        assert!(report.contains("+0.5  no preservatives"));
        assert!(report.contains("Contains added MSG."));
        assert!(report.contains("Millet Noodles"));
        assert!(!report.contains("high sugar"));
    }
}
