//! `food-checkr`: score packaged food products by barcode.
//!
//! # Flow
//! 1. Parse CLI arguments ([`cli`]).
//! 2. Load config ([`config::load_config`]) and install logging ([`logging`]).
//! 3. Load the additive knowledge base once ([`knowledge::base`]).
//! 4. Fetch each product by barcode ([`source::open_food_facts`]).
//! 5. Normalize nutrients ([`nutrients`]) and flag additives ([`knowledge::matcher`]).
//! 6. Check the remaining ingredients for adverse-event reports ([`adverse`]).
//! 7. Score ([`scoring`]) and derive disease warnings ([`warnings`]).
//! 8. Render the requested report for every barcode ([`report`]).
//! 9. Exit `0` if all succeeded, otherwise with the code of the first [`error::AnalysisError`].

mod adverse;
mod analysis;
mod cli;
mod config;
mod error;
mod knowledge;
mod logging;
mod models;
mod nutrients;
mod report;
mod scoring;
mod source;
mod warnings;

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};

use adverse::{AdverseEventClient, LookupCache};
use analysis::Analyzer;
use cli::{Cli, ReportFormat};
use config::load_config;
use knowledge::base::KnowledgeBase;
use source::open_food_facts::ProductClient;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let config = load_config(&cwd, cli.config.as_deref())?;
    logging::init(&config.logging, cli.verbose, cli.quiet);

    let kb_path = cli
        .knowledge_base
        .clone()
        .or_else(|| config.knowledge_base.path.clone());
    let kb = Arc::new(KnowledgeBase::from_configured(kb_path.as_deref()));

    let products = ProductClient::new(&config.sources)?;
    let adverse = if config.adverse_events.enabled && !cli.offline {
        let cache = Arc::new(LookupCache::new(config.adverse_events.cache_capacity()));
        Some(AdverseEventClient::new(
            &config.sources,
            &config.adverse_events,
            cache,
        )?)
    } else {
        None
    };
    let analyzer = Analyzer::new(kb, products, adverse);

    let spinner = if cli.report == ReportFormat::Terminal && !cli.quiet {
        Some(spinner()?)
    } else {
        None
    };

    // One analyzer, and so one lookup cache, serves every barcode.
    let mut outcomes = Vec::with_capacity(cli.barcodes.len());
    for barcode in &cli.barcodes {
        if let Some(pb) = &spinner {
            pb.set_message(format!("Analyzing {}", barcode.trim()));
        }
        outcomes.push(analyzer.analyze(barcode).await);
    }

    if let Some(pb) = spinner {
        pb.finish_and_clear();
    }

    let mut exit_code = 0;
    let mut documents = Vec::new();
    for (barcode, outcome) in cli.barcodes.iter().zip(&outcomes) {
        match outcome {
            Ok(report) => match cli.report {
                ReportFormat::Terminal => report::terminal::render(report, cli.verbose, cli.quiet)?,
                ReportFormat::Json => documents.push(serde_json::to_value(report)?),
            },
            Err(err) => {
                if exit_code == 0 {
                    exit_code = err.exit_code();
                }
                match cli.report {
                    ReportFormat::Terminal => {
                        eprintln!("{} {}: {}", "error:".red().bold(), barcode.trim(), err)
                    }
                    ReportFormat::Json => documents.push(serde_json::json!({
                        "status": "error",
                        "barcode": barcode.trim(),
                        "kind": err.kind(),
                        "message": err.to_string(),
                    })),
                }
            }
        }
    }

    if cli.report == ReportFormat::Json {
        let output = if documents.len() == 1 {
            documents.remove(0)
        } else {
            serde_json::Value::Array(documents)
        };
        println!("{}", serde_json::to_string_pretty(&output)?);
    }

    if exit_code != 0 {
        std::process::exit(exit_code);
    }

    Ok(())
}

fn spinner() -> Result<ProgressBar> {
    let pb = ProgressBar::new_spinner();
    pb.set_style(ProgressStyle::default_spinner().template("{spinner:.green} {msg}")?);
    pb.enable_steady_tick(Duration::from_millis(100));
    Ok(pb)
}
