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

/// tracking of the active flight set over simulated time.
///
/// Flights enter the set when the tracker advances past their start time, leave it when it
/// advances past their end time, and have their track interpolated along the great-circle
/// route at every advance. A flight whose whole lifetime fits between two advances is never
/// observed as active.

use std::time::Duration;
use chrono::{DateTime,Utc};
use tracing::debug;

use crate::{Flight,FlightId,TrackPoint};
use crate::errors::Result;
use crate::generator::{advance_time,EventSource,Lookahead};
use crate::geo::{bearing_degrees,interpolate_position};

/// consumer of a [`Flight`] event source that maintains the set of currently airborne flights.
/// Membership invariant after every advance to time t: a flight is in the set iff
/// `start_time <= t < end_time`
pub struct FlightTracker<S> where S: EventSource<Event=Flight> {
    source: Lookahead<S>,
    active: Vec<Flight>,
    current_time: DateTime<Utc>,
}

impl<S> FlightTracker<S> where S: EventSource<Event=Flight> {
    pub fn new (source: S)->Self {
        let current_time = source.current_time();
        FlightTracker { source: Lookahead::new( source), active: Vec::new(), current_time }
    }

    pub fn current_time (&self)->DateTime<Utc> { self.current_time }

    /// currently airborne flights with their tracks as of the last advance
    pub fn active_flights (&self)->&[Flight] { &self.active }

    pub fn source (&self)->&S { self.source.source() }

    /// current track of the given flight, None if it is not active
    pub fn track_of (&self, id: FlightId)->Option<TrackPoint> {
        self.active.iter().find( |f| f.info.id == id).map( |f| f.track)
    }

    /// move tracking forward by `d`: start flights departing within the window, drop flights
    /// that have landed by its end, and re-interpolate the tracks of all remaining ones
    pub fn advance (&mut self, d: Duration)->Result<()> {
        let stop = advance_time( self.current_time, d)?;

        let mut incoming: Vec<Flight> = Vec::new();
        self.source.advance_until( stop, &mut |flight| {
            incoming.push( flight);
            Ok(())
        })?;

        let n_in = incoming.len();
        let mut active: Vec<Flight> = incoming.into_iter().filter( |f| f.info.end_time > stop).collect();
        let n_started = active.len();
        let n_before = self.active.len();
        active.extend( self.active.drain(..).filter( |f| f.info.end_time > stop));
        let n_landed = n_before - (active.len() - n_started);

        for flight in &mut active {
            let fraction = flight.info.progress_at( stop);
            let dest = &flight.info.destination;
            let (lat,lon) = interpolate_position(
                flight.info.origin.latitude, flight.info.origin.longitude,
                dest.latitude, dest.longitude, fraction
            );
            flight.track.latitude = lat;
            flight.track.longitude = lon;
            flight.track.bearing = bearing_degrees( lat, lon, dest.latitude, dest.longitude);
        }

        self.active = active;
        self.current_time = stop;
        debug!("tracked to {}: {} started, {} landed, {} expired unseen, {} active",
               stop, n_started, n_landed, n_in - n_started, self.active.len());
        Ok(())
    }
}
