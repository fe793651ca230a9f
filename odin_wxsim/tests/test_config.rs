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

/// unit tests for RON config loading
/// run with "cargo test --test test_config -- --nocapture"

use std::{fs, time::Duration};
use uom::si::length::meter;
use uom::si::mass::kilogram as kg;
use uom::si::velocity::meter_per_second;

use odin_wxsim::OdinWxSimError;
use odin_wxsim::config::{load_config,TrafficConfig,WxSimConfig};

#[test]
fn test_load_wxsim_config () {
    println!("--- configs/wxsim.ron deserializes to the expected values");
    let config: WxSimConfig = load_config( "configs/wxsim.ron").unwrap();

    assert_eq!( config.mean_flight_interval, Duration::from_secs(20));
    assert_eq!( config.mean_report_interval, Duration::from_secs(10));
    assert_eq!( config.retention, Duration::from_secs(3600));
    assert_eq!( config.warmup, Duration::from_secs(3*3600));
    assert_eq!( config.cruise_speed.get::<meter_per_second>(), 245.0);
    assert_eq!( config.cruise_altitude.get::<meter>(), 6000.0);
    assert_eq!( config.seed, Some(42));
    assert!( !config.parallel);
}

#[test]
fn test_load_traffic_config () {
    println!("--- configs/traffic.ron deserializes to the expected network");
    let traffic: TrafficConfig = load_config( "configs/traffic.ron").unwrap();

    assert_eq!( traffic.airports.len(), 6);
    let kden = traffic.airport("KDEN").unwrap();
    assert_eq!( kden.name, "Denver International");
    assert_eq!( kden.latitude, 39.8561);
    assert_eq!( kden.longitude, -104.6737);
    assert_eq!( kden.elevation.get::<meter>(), 1655.1);

    assert_eq!( traffic.origin_weights.len(), 6);
    assert_eq!( traffic.origin_weights[0], ("KORD".to_string(), 0.22));

    for (org,dists) in &traffic.destination_weights {
        assert!( traffic.airport(org).is_some());
        assert_eq!( dists.len(), 5);
        for (dst,w) in dists {
            assert!( traffic.airport(dst).is_some());
            assert_ne!( dst, org, "{org} lists itself as destination");
            assert!( *w > 0.0);
        }
    }

    assert_eq!( traffic.aircraft.len(), 3);
    let names: Vec<&str> = traffic.aircraft.iter().map( |(a,_)| a.name.as_str()).collect();
    assert_eq!( names, vec!["Cessna 172", "Boeing 747", "Airbus A380"]);
    let weights: Vec<f64> = traffic.aircraft.iter().map( |(_,w)| *w).collect();
    assert_eq!( weights, vec![0.2, 0.5, 0.3]);
    assert_eq!( traffic.aircraft[0].0.weight.get::<kg>(), 100.0);
}

#[test]
fn test_config_files_match_defaults () {
    // the shipped config files restate the built-in defaults
    let config: WxSimConfig = load_config( "configs/wxsim.ron").unwrap();
    let defaults = WxSimConfig::default();

    assert_eq!( config.mean_flight_interval, defaults.mean_flight_interval);
    assert_eq!( config.mean_report_interval, defaults.mean_report_interval);
    assert_eq!( config.retention, defaults.retention);
    assert_eq!( config.warmup, defaults.warmup);

    let traffic: TrafficConfig = load_config( "configs/traffic.ron").unwrap();
    let default_traffic = TrafficConfig::default();
    assert_eq!( traffic.origin_weights, default_traffic.origin_weights);
    assert_eq!( traffic.destination_weights, default_traffic.destination_weights);
}

#[test]
fn test_missing_config_file () {
    let res: odin_wxsim::Result<WxSimConfig> = load_config( "configs/no_such_config.ron");
    assert!( matches!( res, Err(OdinWxSimError::IOError(_))));
}

#[test]
fn test_malformed_config_file () {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.ron");
    fs::write( &path, "WxSimConfig( mean_flight_interval: \"soon\" )").unwrap();

    let res: odin_wxsim::Result<WxSimConfig> = load_config( &path);
    assert!( matches!( res, Err(OdinWxSimError::RonDeError(_))));
}

#[test]
fn test_default_traffic_consistency () {
    println!("--- the built-in traffic network is internally consistent");
    let traffic = TrafficConfig::default();

    for (org,w) in &traffic.origin_weights {
        assert!( traffic.airport(org).is_some(), "origin {org} has no airport entry");
        assert!( *w > 0.0);

        let dists = traffic.destination_weights.iter().find( |(o,_)| o == org)
            .map( |(_,d)| d).expect("origin without destination table");
        assert!( !dists.is_empty());
        for (dst,_) in dists {
            assert_ne!( dst, org);
            assert!( traffic.airport(dst).is_some());
        }
    }
}
