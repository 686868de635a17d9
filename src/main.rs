use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};
use travel_assistant::models::TrafficReport;
use travel_assistant::{AssistantConfig, TravelAssistant, TravelState, logging};

#[derive(Debug, Parser)]
#[command(name = "travel-assistant")]
#[command(version, about = "Conversational travel planning assistant")]
struct Cli {
    /// Path to a TOML config file
    #[arg(long)]
    config: Option<PathBuf>,

    /// Log at debug level
    #[arg(long)]
    verbose: bool,

    /// Travel plan to process instead of prompting for one
    #[arg(long)]
    plan: Option<String>,
}

async fn prompt(lines: &mut Lines<BufReader<Stdin>>, text: &str) -> Result<Option<String>> {
    let mut stdout = tokio::io::stdout();
    stdout.write_all(text.as_bytes()).await?;
    stdout.flush().await?;
    Ok(lines.next_line().await?)
}

fn print_summary(state: &TravelState) {
    println!("Route:");
    for leg in &state.route_details {
        println!(
            "  {} -> {}: {}, {} (in traffic: {})",
            leg.start_address, leg.end_address, leg.distance, leg.duration, leg.duration_in_traffic
        );
    }
    println!("Weather:");
    for (location, report) in &state.weather_forecast {
        match report.info() {
            Some(info) => println!(
                "  {location}: {}, {}",
                info.description,
                info.format_temperature()
            ),
            None => println!("  {location}: unavailable"),
        }
    }
    match &state.traffic_conditions {
        TrafficReport::Available(segments) => {
            println!("Traffic:");
            for segment in segments {
                let delay = segment
                    .traffic_delay
                    .seconds()
                    .map_or_else(|| "unknown".to_string(), |s| format!("{} min", s / 60));
                println!(
                    "  {} -> {}: {} (delay: {delay})",
                    segment.segment_start, segment.segment_end, segment.traffic_duration
                );
            }
        }
        TrafficReport::Unavailable { error } => println!("Traffic: {error}"),
    }
}

/// Only the bare word ends the session, in any case
fn is_exit(query: &str) -> bool {
    query.eq_ignore_ascii_case("exit")
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = AssistantConfig::load_from_path(cli.config.clone())
        .context("Failed to load configuration")?;
    logging::init(&config.logging, cli.verbose)?;

    let mut assistant = TravelAssistant::from_config(&config)?;
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    let plan = match cli.plan {
        Some(plan) => plan,
        None => match prompt(&mut lines, "Enter your travel plan: ").await? {
            Some(plan) => plan,
            None => return Ok(()),
        },
    };

    match assistant.process_travel_plan(&plan).await {
        Ok(state) => print_summary(&state),
        Err(e) => eprintln!("{}", e.user_message()),
    }

    loop {
        let Some(query) = prompt(
            &mut lines,
            "\nAsk a travel-related question (or type 'exit' to quit): ",
        )
        .await?
        else {
            break;
        };
        if is_exit(&query) {
            break;
        }

        let response = assistant.process_query(&query).await;
        println!("Assistant: {response}");
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("exit", true)]
    #[case("EXIT", true)]
    #[case("Exit", true)]
    #[case(" exit ", false)]
    #[case("exit now", false)]
    #[case("", false)]
    fn test_is_exit(#[case] query: &str, #[case] expected: bool) {
        assert_eq!(is_exit(query), expected);
    }
}
