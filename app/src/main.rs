use anyhow::Context;
use clap::Parser;
use search::Gazetteer;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::PathBuf;
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use viewmodel::{ContentViewModel, ViewBridge};
use workflow::config::ScenarioConfig;
use workflow::runner::Runner;

use notifycore::engine::LocationEngine;
use notifycore::notify::AuthorizationPolicy;

mod generator;
mod search;
mod viewmodel;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "Rust-facing destination-alarm driver")]
struct Args {
    /// Run a single offline scenario and emit a summary
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a scenario config from YAML
    #[arg(long)]
    scenario: Option<PathBuf>,
    /// Destination query used when no scenario file is given
    #[arg(long, default_value = "Tokyo Tower")]
    query: String,
    /// Load the place index from YAML instead of the built-in set
    #[arg(long)]
    places: Option<PathBuf>,
    /// Keep the view bridge alive for incoming interactions
    #[arg(long, default_value_t = false)]
    serve: bool,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let scenario = if let Some(path) = args.scenario {
        ScenarioConfig::load(path)?
    } else {
        ScenarioConfig::from_query(&args.query)
    };

    let gazetteer = Arc::new(match args.places {
        Some(path) => Gazetteer::load(path)?,
        None => Gazetteer::builtin(),
    });
    let engine = Arc::new(LocationEngine::new(
        "NotifyByLocation",
        AuthorizationPolicy::Grant,
    ));

    let runtime = TokioBuilder::new_current_thread()
        .enable_all()
        .build()
        .context("creating driver runtime")?;

    if args.offline {
        let runner = Runner::new(scenario.clone());
        let result = runtime.block_on(runner.execute(engine.clone(), gazetteer.clone()))?;

        println!(
            "Offline run -> destination {}, pin ({:.4}, {:.4}), fixes {}, delivered {:?}",
            result.destination, result.pin.latitude, result.pin.longitude, result.fix_count,
            result.delivered
        );

        let report = format!(
            "destination={} pin=({:.4},{:.4}) span={:.5} status={:?} suggestions={} fixes={} delivered={:?}\n",
            result.destination,
            result.pin.latitude,
            result.pin.longitude,
            result.span_deg,
            result.status,
            result.suggestion_count,
            result.fix_count,
            result.delivered
        );
        let report_path = PathBuf::from("tools/data/offline_alarm.log");
        if let Some(parent) = report_path.parent() {
            fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(report_path)?;
        file.write_all(report.as_bytes())?;
    }
    if args.serve {
        let (view_model, results_rx) =
            ContentViewModel::with_settings(engine.clone(), gazetteer, scenario.alarm_settings());
        runtime.block_on(async {
            engine.register_sink(view_model.clone()).await;
            view_model.on_appear().await;
        });

        let bridge = ViewBridge::new(view_model);
        bridge.serve_in_background(results_rx);
        bridge.publish_status("View bridge running (Ctrl+C to stop)...");

        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    }

    Ok(())
}
