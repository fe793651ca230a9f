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

/// unit tests for the sliding report retention window over a deterministic report source
/// run with "cargo test --test test_buffer -- --nocapture"

use std::{sync::Arc, time::Duration};
use chrono::{DateTime,TimeDelta,TimeZone,Utc};
use uom::si::f64::{AvailableEnergy,Length,Mass,Velocity};
use uom::si::available_energy::joule_per_kilogram;
use uom::si::length::meter;
use uom::si::mass::kilogram;
use uom::si::velocity::meter_per_second;

use odin_wxsim::{Aircraft,Airport,FlightInfo,Result,WeatherReport};
use odin_wxsim::buffer::ReportBuffer;
use odin_wxsim::generator::EventSource;

fn t0 ()->DateTime<Utc> {
    Utc.with_ymd_and_hms( 2016, 1, 1, 0, 0, 0).unwrap()
}

fn test_flight ()->Arc<FlightInfo> {
    let airport = |code: &str, lat: f64, lon: f64| Airport {
        code: code.into(), name: code.into(),
        latitude: lat, longitude: lon, elevation: Length::new::<meter>(0.0)
    };
    Arc::new( FlightInfo {
        id: 0,
        origin: airport( "ORG", 40.0, -110.0),
        destination: airport( "DST", 40.0, -80.0),
        start_time: t0(),
        end_time: t0() + TimeDelta::hours(2),
        aircraft: Aircraft { name: "Test 100".into(), weight: Mass::new::<kilogram>(100.0) },
    })
}

/// deterministic report source: one report every `interval`, optionally yielding nothing
/// on every n-th draw (like positions outside weather data coverage would)
struct FixedReportSource {
    current_time: DateTime<Utc>,
    interval: TimeDelta,
    flight: Arc<FlightInfo>,
    skip_every: Option<u64>,
    n_draws: u64,
}

fn fixed_source (interval_secs: i64, skip_every: Option<u64>)->FixedReportSource {
    FixedReportSource {
        current_time: t0(),
        interval: TimeDelta::seconds( interval_secs),
        flight: test_flight(),
        skip_every,
        n_draws: 0,
    }
}

impl EventSource for FixedReportSource {
    type Event = Arc<WeatherReport>;

    fn current_time (&self)->DateTime<Utc> { self.current_time }

    fn next_event (&mut self)->Result<Option<Arc<WeatherReport>>> {
        self.current_time = self.current_time + self.interval;
        self.n_draws += 1;

        if let Some(n) = self.skip_every {
            if self.n_draws % n == 0 {
                return Ok(None)  // draw consumed the clock but produced no report
            }
        }
        Ok( Some( Arc::new( WeatherReport {
            time: self.current_time,
            flight: self.flight.clone(),
            latitude: 40.0,
            longitude: -100.0,
            altitude: Length::new::<meter>(6000.0),
            wind_u: Velocity::new::<meter_per_second>(10.0),
            wind_v: Velocity::new::<meter_per_second>(-2.0),
            tke: AvailableEnergy::new::<joule_per_kilogram>(0.6),
        })))
    }
}

fn secs_of (r: &Arc<WeatherReport>)->i64 {
    (r.time - t0()).num_seconds()
}

fn secs (rs: &[Arc<WeatherReport>])->Vec<i64> {
    rs.iter().map( secs_of).collect()
}

#[test]
fn test_window_scenario () {
    println!("--- reports every 10s, 30s retention, advanced by 25s / 20s / 10s");
    let mut buffer = ReportBuffer::new( fixed_source( 10, None), Duration::from_secs(30));
    assert!( buffer.is_empty());
    assert_eq!( buffer.retention(), Duration::from_secs(30));

    buffer.advance( Duration::from_secs(25)).unwrap();  // t=25
    println!("t=25: added {:?} removed {:?}", secs( buffer.new_reports()), secs( buffer.removed_reports()));
    assert_eq!( secs( buffer.new_reports()), vec![10,20]);
    assert!( buffer.removed_reports().is_empty());
    assert_eq!( buffer.len(), 2);

    buffer.advance( Duration::from_secs(20)).unwrap();  // t=45, horizon 15
    println!("t=45: added {:?} removed {:?}", secs( buffer.new_reports()), secs( buffer.removed_reports()));
    assert_eq!( secs( buffer.new_reports()), vec![30,40]);
    assert_eq!( secs( buffer.removed_reports()), vec![10]);
    let retained: Vec<i64> = buffer.reports().map( secs_of).collect();
    assert_eq!( retained, vec![20,30,40]);

    buffer.advance( Duration::from_secs(10)).unwrap();  // t=55, horizon 25
    println!("t=55: added {:?} removed {:?}", secs( buffer.new_reports()), secs( buffer.removed_reports()));
    assert_eq!( secs( buffer.new_reports()), vec![50]);
    assert_eq!( secs( buffer.removed_reports()), vec![20]);
    let retained: Vec<i64> = buffer.reports().map( secs_of).collect();
    assert_eq!( retained, vec![30,40,50]);
}

#[test]
fn test_window_deltas_exact () {
    println!("--- added == reports in (prev,now], removed == aged out, over uneven advances");
    let retention = 30i64;
    let mut buffer = ReportBuffer::new( fixed_source( 10, None), Duration::from_secs( retention as u64));

    let mut prev = 0i64;
    let mut evicted: Vec<i64> = Vec::new();
    for d in [7i64, 13, 25, 5, 42, 8] {
        let stop = prev + d;
        buffer.advance( Duration::from_secs( d as u64)).unwrap();

        // expected from the closed form: report k is at 10*k. A report added by this call can
        // age out in the same call; the removed list is everything that was within the old
        // horizon (or just added) but not the new one
        let expected_added: Vec<i64> = (1..).map( |k| 10*k).skip_while( |t| *t <= prev).take_while( |t| *t <= stop).collect();
        let expected_retained: Vec<i64> = (1..).map( |k| 10*k).take_while( |t| *t <= stop)
            .filter( |t| *t >= stop - retention).collect();
        let expected_removed: Vec<i64> = (1..).map( |k| 10*k).take_while( |t| *t <= stop)
            .filter( |t| *t >= prev - retention && *t < stop - retention).collect();

        println!("t={stop}: added {:?} removed {:?}", secs( buffer.new_reports()), secs( buffer.removed_reports()));
        assert_eq!( secs( buffer.new_reports()), expected_added);
        assert_eq!( secs( buffer.removed_reports()), expected_removed);
        let retained: Vec<i64> = buffer.reports().map( secs_of).collect();
        assert_eq!( retained, expected_retained);

        // every retained report is within the horizon
        for t in &retained {
            assert!( *t >= stop - retention);
        }

        // evicted reports never come back
        for r in buffer.removed_reports() {
            assert!( !evicted.contains( &secs_of(r)));
            evicted.push( secs_of(r));
        }
        for t in &retained {
            assert!( !evicted.contains(t));
        }

        prev = stop;
    }
}

#[test]
fn test_report_carryover () {
    // the report generated past the stop time is delivered by the next covering call,
    // exactly once
    let mut buffer = ReportBuffer::new( fixed_source( 10, None), Duration::from_secs(3600));

    buffer.advance( Duration::from_secs(25)).unwrap();
    assert_eq!( secs( buffer.new_reports()), vec![10,20]);  // the 30s report is parked
    assert_eq!( (buffer.generator().current_time() - t0()).num_seconds(), 30);

    buffer.advance( Duration::from_secs(2)).unwrap();   // t=27, still not due
    assert!( buffer.new_reports().is_empty());

    buffer.advance( Duration::from_secs(3)).unwrap();   // t=30
    assert_eq!( secs( buffer.new_reports()), vec![30]);

    buffer.advance( Duration::from_secs(15)).unwrap();  // t=45
    assert_eq!( secs( buffer.new_reports()), vec![40]); // 30 not delivered again
}

#[test]
fn test_gap_draws_consume_time () {
    println!("--- draws without weather data advance the clock but add nothing");
    let mut buffer = ReportBuffer::new( fixed_source( 10, Some(2)), Duration::from_secs(3600));

    buffer.advance( Duration::from_secs(45)).unwrap();
    println!("t=45: added {:?}", secs( buffer.new_reports()));
    assert_eq!( secs( buffer.new_reports()), vec![10,30]);  // 20s and 40s draws were gaps
    assert_eq!( (buffer.current_time() - t0()).num_seconds(), 45);
}

#[test]
fn test_boundary_times () {
    // a report dated exactly at the stop time belongs to this window; a report aged to
    // exactly the horizon is retained
    let mut buffer = ReportBuffer::new( fixed_source( 10, None), Duration::from_secs(30));

    buffer.advance( Duration::from_secs(30)).unwrap();  // t=30: report at 30 included
    assert_eq!( secs( buffer.new_reports()), vec![10,20,30]);

    buffer.advance( Duration::from_secs(10)).unwrap();  // t=40, horizon 10: report at 10 stays
    let retained: Vec<i64> = buffer.reports().map( secs_of).collect();
    assert_eq!( retained, vec![10,20,30,40]);

    buffer.advance( Duration::from_secs(1)).unwrap();   // t=41, horizon 11: now it ages out
    assert_eq!( secs( buffer.removed_reports()), vec![10]);
}
