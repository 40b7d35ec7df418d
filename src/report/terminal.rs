use anyhow::Result;
use colored::*;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};

use crate::models::{AnalysisReport, HealthStatus, NutrientProfile, RiskTier};

/// Render a colored terminal report.
pub fn render(report: &AnalysisReport, verbose: bool, quiet: bool) -> Result<()> {
    if quiet {
        println!(
            "{}  {}  Score: {}  Flagged: {}",
            report.barcode,
            report.product_name,
            colored_score(report.health_score),
            report.flagged_chemicals.len(),
        );
        return Ok(());
    }

    println!("\n {} v{}", "food-checkr".bold(), env!("CARGO_PKG_VERSION"));
    println!(" Barcode: {}\n", report.barcode);

    println!(" ┌────────────────────────────────────────────────────┐");
    println!(" │  {:<48} │", truncate(&report.product_name, 48).bold());
    if let Some(brands) = &report.brands {
        println!(" │  {:<48} │", truncate(brands, 48));
    }
    println!(
        " │  {:<48} │",
        format!("Health score       : {:>3} / 100", report.health_score)
    );
    println!(
        " │  {:<48} │",
        format!("Status             : {}", report.health_status)
    );
    if let Some(grade) = &report.nutriscore_grade {
        println!(
            " │  {:<48} │",
            format!("Nutri-Score        : {}", grade.to_uppercase())
        );
    }
    println!(
        " │  {:<48} │",
        format!("Flagged chemicals  : {:>3}", report.flagged_chemicals.len())
    );
    println!(" └────────────────────────────────────────────────────┘\n");

    println!(
        " {} {}\n",
        status_badge(report.health_status),
        colored_score(report.health_score)
    );

    if !report.flagged_chemicals.is_empty() {
        println!(" {} Ingredients of concern:\n", "[FLAGGED]".red().bold());
        render_chemicals(report);
        println!();
    }

    if !report.disease_warnings.is_empty() {
        println!(" {} Health warnings:\n", "[WARN]".yellow().bold());
        for warning in &report.disease_warnings {
            println!("   {} {}", "⚠".yellow(), warning);
        }
        println!();
    }

    if verbose {
        println!(" {} Nutrients per 100g:\n", "[INFO]".cyan().bold());
        render_nutrients(&report.nutrients);
        println!();

        let b = &report.breakdown;
        println!(
            " Baseline {} + bonuses {} - nutrient penalties {} - chemical penalty {}",
            b.baseline, b.bonuses, b.nutrient_penalties, b.chemical_penalty
        );
        for ceiling in &b.ceilings {
            println!("   {} capped: {}", "↓".red(), ceiling);
        }
        if report.nutrient_diagnostics > 0 {
            println!(
                "   {} nutrient value(s) missing or unreadable, counted as 0",
                report.nutrient_diagnostics
            );
        }
        println!("\n Ingredients: {}\n", report.ingredients_text);
    }

    Ok(())
}

fn render_chemicals(report: &AnalysisReport) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Name").add_attribute(Attribute::Bold),
            Cell::new("Risk").add_attribute(Attribute::Bold),
            Cell::new("Source").add_attribute(Attribute::Bold),
            Cell::new("Cause").add_attribute(Attribute::Bold),
            Cell::new("Advice").add_attribute(Attribute::Bold),
        ]);

    for chem in &report.flagged_chemicals {
        let record = &chem.record;
        let risk_color = match record.risk {
            RiskTier::High => Color::Red,
            RiskTier::Medium => Color::Yellow,
            RiskTier::Low => Color::DarkGrey,
        };

        table.add_row(vec![
            Cell::new(&record.name),
            Cell::new(record.risk.to_string())
                .fg(risk_color)
                .set_alignment(CellAlignment::Center),
            Cell::new(chem.source.to_string()),
            Cell::new(&record.cause),
            Cell::new(&record.avoid),
        ]);
    }

    println!("{}", table);
}

fn render_nutrients(n: &NutrientProfile) {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec![
            Cell::new("Nutrient").add_attribute(Attribute::Bold),
            Cell::new("Amount").add_attribute(Attribute::Bold),
        ]);

    let rows = [
        ("Energy", format!("{:.0} kcal", n.calories)),
        ("Protein", format!("{:.1} g", n.protein)),
        ("Carbohydrates", format!("{:.1} g", n.carbohydrates)),
        ("  of which sugars", format!("{:.1} g", n.sugars)),
        ("Fiber", format!("{:.1} g", n.fiber)),
        ("Fat", format!("{:.1} g", n.fat)),
        ("  of which saturated", format!("{:.1} g", n.saturated_fat)),
        ("  of which trans", format!("{:.2} g", n.trans_fat)),
        ("Sodium", format!("{:.0} mg", n.sodium_mg())),
        ("Salt", format!("{:.2} g", n.salt)),
        ("Cholesterol", format!("{:.0} mg", n.cholesterol * 1000.0)),
    ];
    for (name, amount) in rows {
        table.add_row(vec![
            Cell::new(name),
            Cell::new(amount).set_alignment(CellAlignment::Right),
        ]);
    }

    println!("{}", table);
}

fn colored_score(score: u8) -> ColoredString {
    let text = format!("{}/100", score);
    match score {
        60..=100 => text.green().bold(),
        40..=59 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

fn status_badge(status: HealthStatus) -> ColoredString {
    let text = format!("[{}]", status.to_string().to_uppercase());
    match status {
        HealthStatus::Excellent | HealthStatus::Good => text.green().bold(),
        HealthStatus::Average => text.yellow().bold(),
        HealthStatus::Unhealthy
        | HealthStatus::VeryUnhealthy
        | HealthStatus::HighSugar
        | HealthStatus::ContainsTransFat => text.red().bold(),
    }
}

fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let mut cut: String = text.chars().take(max.saturating_sub(1)).collect();
        cut.push('…');
        cut
    }
}
