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

/// random generation of in-flight weather reports.
///
/// Report times are gamma distributed like flight departures. Each draw advances the flight
/// tracker to the report time, picks a uniformly random active flight and samples the weather
/// model at its current track position. A position outside of weather data coverage yields no
/// report but still consumes the draw, which produces the gaps seen in real feeds.

use std::sync::Arc;
use chrono::{DateTime,Utc};
use rand::{rngs::StdRng,Rng};
use std::time::Duration;
use tracing::debug;

use crate::{Flight,WeatherReport};
use crate::errors::{OdinWxSimError,Result};
use crate::generator::{advance_time,EventSource};
use crate::sample::InterarrivalSampler;
use crate::tracker::FlightTracker;
use crate::weather::WeatherModel;

/// generator of random [`WeatherReport`] events with strictly increasing times. Owns the
/// flight tracker and keeps it advanced in lockstep with its own clock
pub struct ReportGenerator<S,M> where S: EventSource<Event=Flight>, M: WeatherModel {
    current_time: DateTime<Utc>,
    interarrival: InterarrivalSampler,
    tracker: FlightTracker<S>,
    model: M,
    rng: StdRng,
}

impl<S,M> ReportGenerator<S,M> where S: EventSource<Event=Flight>, M: WeatherModel {
    pub fn new (tracker: FlightTracker<S>, model: M, mean_report_interval: Duration, rng: StdRng)->Result<Self> {
        let interarrival = InterarrivalSampler::new( mean_report_interval)?;
        Ok( ReportGenerator {
            current_time: tracker.current_time(),
            interarrival, tracker, model, rng
        })
    }

    pub fn current_time (&self)->DateTime<Utc> { self.current_time }
    pub fn tracker (&self)->&FlightTracker<S> { &self.tracker }
    pub fn model (&self)->&M { &self.model }

    /// draw the next report, advancing both the report clock and the flight tracker by the
    /// sampled delay. `Ok(None)` means the chosen flight was outside weather data coverage.
    /// Fails with [`OdinWxSimError::NoActiveFlights`] if no flight is airborne at the report
    /// time (an under-warmed simulation, not a recoverable gap)
    pub fn next_report (&mut self)->Result<Option<Arc<WeatherReport>>> {
        let dt = self.interarrival.next_delay( &mut self.rng);
        self.current_time = advance_time( self.current_time, dt)?;
        self.tracker.advance( dt)?;

        let (info, track) = {
            let flights = self.tracker.active_flights();
            if flights.is_empty() {
                return Err( OdinWxSimError::NoActiveFlights)
            }
            let flight = &flights[ self.rng.random_range( 0..flights.len())];
            (flight.info.clone(), flight.track)
        };

        let Some(wx) = self.model.sample( track.latitude, track.longitude, track.altitude, self.current_time) else {
            debug!("no weather data at ({:.3},{:.3}) {}, report skipped", track.latitude, track.longitude, self.current_time);
            return Ok(None)
        };

        debug!("report at {} from flight {} ({:.3},{:.3})", self.current_time, info.id, track.latitude, track.longitude);
        Ok( Some( Arc::new( WeatherReport {
            time: self.current_time,
            flight: info,
            latitude: track.latitude,
            longitude: track.longitude,
            altitude: track.altitude,
            wind_u: wx.wind_u,
            wind_v: wx.wind_v,
            tke: wx.tke,
        })))
    }
}

impl<S,M> EventSource for ReportGenerator<S,M> where S: EventSource<Event=Flight>, M: WeatherModel {
    type Event = Arc<WeatherReport>;

    fn current_time (&self)->DateTime<Utc> { self.current_time }

    fn next_event (&mut self)->Result<Option<Arc<WeatherReport>>> {
        self.next_report()
    }
}
