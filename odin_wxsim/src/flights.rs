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

/// random generation of flight departure events from airport traffic statistics.
///
/// Interarrival times are gamma distributed, origin / destination / aircraft type are drawn
/// from the configured weight tables (destination conditional on origin), and the flight
/// duration follows from the geodesic route length at constant cruise speed.

use std::{collections::HashMap, sync::Arc, time::Duration};
use chrono::{DateTime,Utc};
use rand::rngs::StdRng;
use tracing::debug;
use uom::si::f64::{Length,Velocity};
use uom::si::length::meter;
use uom::si::velocity::meter_per_second;

use crate::{Aircraft,Airport,Flight,FlightId,FlightInfo,TrackPoint};
use crate::config::{TrafficConfig,WxSimConfig};
use crate::errors::{config_error, time_error, Result};
use crate::generator::{advance_time,EventSource};
use crate::geo::{bearing_degrees,geodesic_distance};
use crate::sample::{weighted_random,InterarrivalSampler};

/// generator of random [`Flight`] events with strictly increasing start times.
/// Owns its RNG and the flight id counter, so seeded instances produce identical sequences
pub struct FlightGenerator {
    current_time: DateTime<Utc>,
    interarrival: InterarrivalSampler,
    cruise_speed: Velocity,
    cruise_altitude: Length,

    airports: HashMap<String,Airport>,
    origin_dist: Vec<(String,f64)>,
    dest_dist: HashMap<String,Vec<(String,f64)>>,
    aircraft_dist: Vec<(Aircraft,f64)>,

    next_id: FlightId,
    rng: StdRng,
}

impl FlightGenerator {
    /// set up generation anchored at `start_time`, cross-checking the traffic tables so that
    /// unknown airport codes are rejected here instead of failing mid-simulation
    pub fn new (start_time: DateTime<Utc>, config: &WxSimConfig, traffic: TrafficConfig, rng: StdRng)->Result<Self> {
        if config.cruise_speed.get::<meter_per_second>() <= 0.0 {
            return Err( config_error("cruise speed must be positive"))
        }
        let interarrival = InterarrivalSampler::new( config.mean_flight_interval)?;

        let airports: HashMap<String,Airport> = traffic.airports.into_iter()
            .map( |a| (a.code.clone(), a))
            .collect();
        let dest_dist: HashMap<String,Vec<(String,f64)>> = traffic.destination_weights.into_iter().collect();

        for (org,_) in &traffic.origin_weights {
            if !airports.contains_key( org) {
                return Err( config_error( format!("unknown origin airport {org}")))
            }
            let Some(dists) = dest_dist.get( org) else {
                return Err( config_error( format!("no destination weights for origin {org}")))
            };
            for (dst,_) in dists {
                if !airports.contains_key( dst) {
                    return Err( config_error( format!("unknown destination airport {dst} for origin {org}")))
                }
            }
        }

        Ok( FlightGenerator {
            current_time: start_time,
            interarrival,
            cruise_speed: config.cruise_speed,
            cruise_altitude: config.cruise_altitude,
            airports,
            origin_dist: traffic.origin_weights,
            dest_dist,
            aircraft_dist: traffic.aircraft,
            next_id: 0,
            rng,
        })
    }

    pub fn current_time (&self)->DateTime<Utc> { self.current_time }

    /// draw the next flight and advance the generator clock by its gamma distributed delay.
    /// The returned flight starts at the new clock value and carries the placeholder track
    /// until the tracker first advances it
    pub fn next_flight (&mut self)->Result<Flight> {
        let dt = self.interarrival.next_delay( &mut self.rng);
        self.current_time = advance_time( self.current_time, dt)?;
        let start_time = self.current_time;

        let origin_code = weighted_random( &self.origin_dist, &mut self.rng)?;
        let dest_table = self.dest_dist.get( origin_code.as_str())
            .ok_or_else( || config_error( format!("no destination weights for origin {origin_code}")))?;
        let dest_code = weighted_random( dest_table, &mut self.rng)?;
        let aircraft = weighted_random( &self.aircraft_dist, &mut self.rng)?.clone();

        let origin = self.airports.get( origin_code.as_str())
            .ok_or_else( || config_error( format!("unknown origin airport {origin_code}")))?.clone();
        let destination = self.airports.get( dest_code.as_str())
            .ok_or_else( || config_error( format!("unknown destination airport {dest_code}")))?.clone();

        let route_len = geodesic_distance( origin.latitude, origin.longitude, destination.latitude, destination.longitude);
        let flight_secs = route_len.get::<meter>() / self.cruise_speed.get::<meter_per_second>();
        let duration = Duration::try_from_secs_f64( flight_secs)
            .map_err( |e| time_error( format!("invalid flight duration {flight_secs}s: {e}")))?;
        let end_time = advance_time( start_time, duration)?;

        let bearing = bearing_degrees( origin.latitude, origin.longitude, destination.latitude, destination.longitude);

        let id = self.next_id;
        self.next_id += 1;

        let info = Arc::new( FlightInfo { id, origin, destination, start_time, end_time, aircraft });
        debug!("generated {}", info);

        Ok( Flight {
            info,
            track: TrackPoint { latitude: 0.0, longitude: 0.0, altitude: self.cruise_altitude, bearing }
        })
    }
}

impl EventSource for FlightGenerator {
    type Event = Flight;

    fn current_time (&self)->DateTime<Utc> { self.current_time }

    fn next_event (&mut self)->Result<Option<Flight>> {
        self.next_flight().map( Some)
    }
}
