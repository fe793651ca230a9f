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

/// simulator configuration, loaded from RON files (one file per config struct)

use std::{fs, path::Path, time::Duration};
use serde::{Deserialize,Serialize};
use uom::si::f64::{Length,Mass,Velocity};
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::velocity::meter_per_second;

use crate::{Aircraft,Airport};
use crate::errors::Result;

pub const CRUISE_SPEED_MPS: f64 = 245.0;
pub const CRUISE_ALTITUDE_M: f64 = 6000.0;

/// read a config struct from a RON file
pub fn load_config<C> (path: impl AsRef<Path>)->Result<C> where C: for<'a> Deserialize<'a> {
    let data = fs::read( path.as_ref())?;
    Ok( ron::de::from_bytes( data.as_slice())? )
}

/// general feed parameters
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct WxSimConfig {
    /// mean time between new flight departures
    pub mean_flight_interval: Duration,

    /// mean time between weather reports
    pub mean_report_interval: Duration,

    /// how long reports stay in the feed window after creation
    pub retention: Duration,

    /// how long before the first weather data time flight generation is anchored, so the
    /// active flight set is populated when reporting starts
    pub warmup: Duration,

    pub cruise_speed: Velocity,
    pub cruise_altitude: Length,

    /// fixed base seed for reproducible feeds (None draws from OS entropy)
    pub seed: Option<u64>,

    /// hint for the weather data layer to open its dataset for parallel access
    pub parallel: bool,
}

impl Default for WxSimConfig {
    fn default ()->Self {
        WxSimConfig {
            mean_flight_interval: Duration::from_secs(20),
            mean_report_interval: Duration::from_secs(10),
            retention: Duration::from_secs(3600),
            warmup: Duration::from_secs(3*3600),
            cruise_speed: Velocity::new::<meter_per_second>( CRUISE_SPEED_MPS),
            cruise_altitude: Length::new::<meter>( CRUISE_ALTITUDE_M),
            seed: None,
            parallel: false,
        }
    }
}

/// airport traffic statistics: where flights start, where they go from there and what flies.
/// Weight tables are kept as vectors since the categorical sampler scans them in table order,
/// which a map would not preserve across runs
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct TrafficConfig {
    pub airports: Vec<Airport>,

    /// unnormalized origin weights by airport code
    pub origin_weights: Vec<(String,f64)>,

    /// per-origin destination weights by airport code
    pub destination_weights: Vec<(String,Vec<(String,f64)>)>,

    /// fleet mix
    pub aircraft: Vec<(Aircraft,f64)>,
}

impl TrafficConfig {
    pub fn airport (&self, code: &str)->Option<&Airport> {
        self.airports.iter().find( |a| a.code == code)
    }
}

impl Default for TrafficConfig {
    /// a small built-in network of major US airports with enplanement-proportional weights,
    /// destination preference proportional to the destination's own origin weight
    fn default ()->Self {
        let airports = vec![
            airport( "KORD", "Chicago O'Hare International", 41.9742, -87.9073, 204.8),
            airport( "KDEN", "Denver International", 39.8561, -104.6737, 1655.1),
            airport( "KLAX", "Los Angeles International", 33.9425, -118.4081, 38.7),
            airport( "KJFK", "John F. Kennedy International", 40.6413, -73.7781, 4.0),
            airport( "KSFO", "San Francisco International", 37.6188, -122.3754, 4.0),
            airport( "KSEA", "Seattle-Tacoma International", 47.4502, -122.3088, 132.9),
        ];
        let origin_weights: Vec<(String,f64)> = vec![
            ("KORD".into(), 0.22), ("KDEN".into(), 0.20), ("KLAX".into(), 0.20),
            ("KJFK".into(), 0.14), ("KSFO".into(), 0.13), ("KSEA".into(), 0.11),
        ];
        let destination_weights = origin_weights.iter().map( |(org,_)| {
            let dists: Vec<(String,f64)> = origin_weights.iter()
                .filter( |(dst,_)| dst != org)
                .map( |(dst,w)| (dst.clone(), *w))
                .collect();
            (org.clone(), dists)
        }).collect();
        let aircraft = vec![
            (Aircraft { name: "Cessna 172".into(), weight: Mass::new::<kilogram>(100.0) }, 0.2),
            (Aircraft { name: "Boeing 747".into(), weight: Mass::new::<kilogram>(100.0) }, 0.5),
            (Aircraft { name: "Airbus A380".into(), weight: Mass::new::<kilogram>(100.0) }, 0.3),
        ];

        TrafficConfig { airports, origin_weights, destination_weights, aircraft }
    }
}

fn airport (code: &str, name: &str, latitude: f64, longitude: f64, elev_m: f64)->Airport {
    Airport {
        code: code.into(), name: name.into(), latitude, longitude,
        elevation: Length::new::<meter>( elev_m)
    }
}
