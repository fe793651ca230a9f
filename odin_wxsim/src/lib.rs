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

#[doc = include_str!("../doc/odin_wxsim.md")]

use std::{
    fmt::{self,Display}, sync::Arc, time::Duration
};
use chrono::{DateTime,TimeDelta,Utc};
use serde::{Deserialize,Serialize};
use rand::{rngs::StdRng, SeedableRng};
use tracing::{debug,info};
use uom::si::f64::{AvailableEnergy,Length,Mass,Velocity};

pub mod geo;
pub mod sample;
pub mod generator;
pub mod flights;
pub mod tracker;
pub mod reports;
pub mod buffer;
pub mod weather;
pub mod config;

mod errors;
pub use errors::*;

use generator::{Dated,EventSource};
use flights::FlightGenerator;
use tracker::FlightTracker;
use reports::ReportGenerator;
use buffer::ReportBuffer;
use weather::WeatherModel;
use config::{TrafficConfig,WxSimConfig};

/* #region data model ********************************************************************************************/

/// process-unique flight identifier, monotonically increasing in generation order
pub type FlightId = u64;

/// aircraft type drawn from the configured fleet mix
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Aircraft {
    pub name: String,
    pub weight: Mass,
}

/// airport snapshot embedded into flights at creation time (decoupled from later table edits)
#[derive(Debug,Clone,PartialEq,Serialize,Deserialize)]
pub struct Airport {
    pub code: String,
    pub name: String,

    /// degrees, positive north
    pub latitude: f64,
    /// degrees, positive east
    pub longitude: f64,
    pub elevation: Length,
}

/// the immutable identity of a flight. Everything that never changes after generation lives
/// here so that weather reports can share it through an `Arc` without seeing later position
/// updates of the tracked flight
#[derive(Debug,Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct FlightInfo {
    pub id: FlightId,
    pub origin: Airport,
    pub destination: Airport,
    #[serde(serialize_with = "generator::ser_epoch_millis")]
    pub start_time: DateTime<Utc>,
    #[serde(serialize_with = "generator::ser_epoch_millis")]
    pub end_time: DateTime<Utc>,
    pub aircraft: Aircraft,
}

impl FlightInfo {
    pub fn scheduled_duration (&self)->TimeDelta {
        self.end_time - self.start_time
    }

    /// fraction of the route completed at time `t` (not clamped - callers pass t within
    /// [start_time,end_time])
    pub fn progress_at (&self, t: DateTime<Utc>)->f64 {
        let total = self.scheduled_duration().num_milliseconds();
        if total > 0 { (t - self.start_time).num_milliseconds() as f64 / total as f64 } else { 1.0 }
    }
}

impl Display for FlightInfo {
    fn fmt (&self, f: &mut fmt::Formatter<'_>)->fmt::Result {
        write!( f, "flight {} {}→{} [{} .. {}]", self.id, self.origin.code, self.destination.code,
                self.start_time.format("%H:%M:%S%.3f"), self.end_time.format("%H:%M:%S%.3f"))
    }
}

/// current position and heading of a tracked flight, overwritten on every tracker advance
#[derive(Debug,Clone,Copy,Serialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Length,
    /// degrees clockwise from true north
    pub bearing: f64,
}

/// a generated flight: shared immutable identity plus the mutable track owned by the tracker.
/// Freshly generated flights carry the (0,0) placeholder track until their first advance
#[derive(Debug,Clone,Serialize)]
pub struct Flight {
    pub info: Arc<FlightInfo>,
    pub track: TrackPoint,
}

impl Flight {
    pub fn id (&self)->FlightId { self.info.id }
}

impl Dated for Flight {
    fn date (&self)->DateTime<Utc> { self.info.start_time }
}

/// a simulated in-flight weather report. The position fields are a value snapshot taken when
/// the report was generated; `flight` links back to the immutable identity only, so buffered
/// reports are unaffected by the sender flying on
#[derive(Debug,Serialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct WeatherReport {
    #[serde(serialize_with = "generator::ser_epoch_millis")]
    pub time: DateTime<Utc>,
    pub flight: Arc<FlightInfo>,
    pub latitude: f64,
    pub longitude: f64,
    pub altitude: Length,

    /// zonal (west→east) wind component
    pub wind_u: Velocity,
    /// meridional (south→north) wind component
    pub wind_v: Velocity,
    /// ambient turbulent kinetic energy
    pub tke: AvailableEnergy,
}

impl Dated for WeatherReport {
    fn date (&self)->DateTime<Utc> { self.time }
}

/* #endregion data model */

/* #region simulator facade **************************************************************************************/

/// the fully wired report feed: flight generation -> active flight tracking -> report
/// sampling -> retention buffer, all behind one `advance` entry point.
///
/// Construction anchors the flight generator at `model.first_time() - warmup` and pre-advances
/// the tracker over the warm-up period so the active flight set is populated before the first
/// report is drawn. With a configured seed the whole feed is deterministic
pub struct WxReportSimulator<M> where M: WeatherModel {
    buffer: ReportBuffer<ReportGenerator<FlightGenerator,M>>,

    mean_flight_interval: Duration,
    mean_report_interval: Duration,
}

impl<M> WxReportSimulator<M> where M: WeatherModel {
    pub fn new (model: M, config: &WxSimConfig, traffic: TrafficConfig)->Result<Self> {
        let warmup = TimeDelta::from_std( config.warmup).map_err( |e| time_error( format!("warmup out of range: {e}")))?;
        let anchor = model.first_time() - warmup;
        debug!("anchoring flight generation at {} ({:?} before first weather time)", anchor, config.warmup);

        let flight_gen = FlightGenerator::new( anchor, config, traffic, stage_rng( config.seed, 0))?;
        let mut tracker = FlightTracker::new( flight_gen);
        tracker.advance( config.warmup)?;
        info!("report feed warmed up at {} with {} active flights", tracker.current_time(), tracker.active_flights().len());

        let report_gen = ReportGenerator::new( tracker, model, config.mean_report_interval, stage_rng( config.seed, 1))?;
        let buffer = ReportBuffer::new( report_gen, config.retention);

        Ok( WxReportSimulator {
            buffer,
            mean_flight_interval: config.mean_flight_interval,
            mean_report_interval: config.mean_report_interval,
        })
    }

    /// move the feed forward by `d`, regenerating the report deltas and the active flight set
    pub fn advance (&mut self, d: Duration)->Result<()> {
        self.buffer.advance(d)
    }

    pub fn current_time (&self)->DateTime<Utc> {
        self.buffer.current_time()
    }

    /// all reports currently within the retention window, oldest first
    pub fn current_reports (&self)->impl Iterator<Item=&Arc<WeatherReport>> {
        self.buffer.reports()
    }

    /// reports that entered the window during the last `advance`
    pub fn new_reports (&self)->&[Arc<WeatherReport>] {
        self.buffer.new_reports()
    }

    /// reports that aged out of the window during the last `advance`
    pub fn removed_reports (&self)->&[Arc<WeatherReport>] {
        self.buffer.removed_reports()
    }

    pub fn active_flights (&self)->&[Flight] {
        self.buffer.generator().tracker().active_flights()
    }

    pub fn weather_model (&self)->&M {
        self.buffer.generator().model()
    }

    pub fn mean_flight_interval (&self)->Duration { self.mean_flight_interval }
    pub fn mean_report_interval (&self)->Duration { self.mean_report_interval }
}

/// per-stage RNG so that flight generation and report sampling draw from independent,
/// individually reproducible streams
fn stage_rng (seed: Option<u64>, stage: u64)->StdRng {
    match seed {
        Some(s) => StdRng::seed_from_u64( s.wrapping_add( stage.wrapping_mul( 0x9E3779B97F4A7C15))),
        None => StdRng::from_os_rng()
    }
}

/* #endregion simulator facade */
