/*
 * Copyright © 2025, United States Government, as represented by the Administrator of
 * the National Aeronautics and Space Administration. All rights reserved.
 *
 * The “ODIN” software is licensed under the Apache License, Version 2.0 (the "License");
 * you may not use this file except in compliance with the License. You may obtain a copy
 * of the License at http://www.apache.org/licenses/LICENSE-2.0.
 *
 * Unless required by applicable law or agreed to in writing, software distributed under
 * the License is distributed on an "AS IS" BASIS, WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND,
 * either express or implied. See the License for the specific language governing permissions
 * and limitations under the License.
 */

#![allow(unused)]

/// feed driver for the weather report simulator: assembles the pipeline over a synthetic
/// gridded weather field and prints one JSON window update per advance step (one line each),
/// suitable for piping into downstream consumers.
/// Use RUST_LOG=odin_wxsim=debug to watch the pipeline stages

use std::{path::Path, sync::Arc};
use anyhow::Result;
use chrono::{DateTime,Utc};
use clap::Parser;
use serde::Serialize;
use tracing::debug;
use tracing_subscriber::EnvFilter;

use odin_wxsim::{
    config::{load_config,TrafficConfig,WxSimConfig},
    weather::GridWeatherModel,
    FlightId, WeatherReport, WxReportSimulator,
};

#[derive(Parser,Debug)]
#[command(version, about, long_about = "synthetic in-flight weather report feed")]
pub struct Args {
    /// filename of a WxSimConfig RON file (built-in defaults if not given)
    #[arg(long)]
    pub sim_config: Option<String>,

    /// filename of a TrafficConfig RON file (built-in airport network if not given)
    #[arg(long)]
    pub traffic_config: Option<String>,

    /// first timestamp of the synthetic weather data (RFC 3339)
    #[arg(long, default_value="2016-01-01T00:00:00Z")]
    pub start: String,

    /// where to cache the fitted position index predictor
    #[arg(long)]
    pub predictor_cache: Option<String>,

    /// RNG seed override for reproducible feeds
    #[arg(short,long)]
    pub seed: Option<u64>,

    /// simulated seconds per advance step
    #[arg(long, default_value_t = 60)]
    pub step_secs: u64,

    /// number of advance steps to run
    #[arg(long, default_value_t = 20)]
    pub steps: u32,
}

/// reference to an evicted report - enough for a consumer to drop it from its own window
#[derive(Serialize)]
struct RemovedRef {
    #[serde(serialize_with = "odin_wxsim::generator::ser_epoch_millis")]
    time: DateTime<Utc>,
    flight: FlightId,
}

/// the per-step feed message: full reports for additions, references for evictions
#[derive(Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
struct WindowUpdate<'a> {
    #[serde(serialize_with = "odin_wxsim::generator::ser_epoch_millis")]
    time: DateTime<Utc>,
    n_active: usize,
    n_retained: usize,
    added: &'a [Arc<WeatherReport>],
    removed: Vec<RemovedRef>,
}

fn main ()->Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter( EnvFilter::from_default_env())  // use RUST_LOG to set max level
        .init();

    let args = Args::parse();

    let mut sim_config: WxSimConfig = match &args.sim_config {
        Some(path) => load_config( path)?,
        None => WxSimConfig::default()
    };
    if args.seed.is_some() { sim_config.seed = args.seed }

    let traffic: TrafficConfig = match &args.traffic_config {
        Some(path) => load_config( path)?,
        None => TrafficConfig::default()
    };

    let step = std::time::Duration::from_secs( args.step_secs);
    let first_time: DateTime<Utc> = DateTime::parse_from_rfc3339( args.start.as_str())?.with_timezone( &Utc);

    // enough hourly slices to cover warm-up plus the whole run
    let run_secs = sim_config.warmup.as_secs() + args.step_secs * (args.steps as u64);
    let n_hours = (run_secs / 3600 + 2) as usize;

    let cache = args.predictor_cache.as_deref().map( Path::new);
    if sim_config.parallel { // dataset hint - the in-memory synthetic grid has nothing to parallelize
        debug!("parallel weather data access requested, ignored for synthetic grid");
    }
    let model = GridWeatherModel::synthetic( first_time, n_hours, cache)?;

    let mut sim = WxReportSimulator::new( model, &sim_config, traffic)?;
    println!("feed warmed up at {} with {} active flights", sim.current_time(), sim.active_flights().len());

    for _ in 0..args.steps {
        sim.advance( step)?;

        let update = WindowUpdate {
            time: sim.current_time(),
            n_active: sim.active_flights().len(),
            n_retained: sim.current_reports().count(),
            added: sim.new_reports(),
            removed: sim.removed_reports().iter()
                .map( |r| RemovedRef { time: r.time, flight: r.flight.id })
                .collect(),
        };
        println!("{}", serde_json::to_string( &update)?);
    }

    Ok(())
}
