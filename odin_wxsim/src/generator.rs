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

/// time-windowed event generation. Flight departures and weather reports are both produced by
/// stochastic sources that advance their own clock with each generated event, and both are
/// consumed through the same windowing scheme: pull events up to a stop time and hold the one
/// event that overshoots it until a later window covers its timestamp. This module factors
/// that scheme into the [`EventSource`] abstraction and the [`Lookahead`] driver.

use std::time::Duration;
use chrono::{DateTime,TimeDelta,Utc};
use serde::Serializer;

use crate::errors::{time_error, Result};

/// a type bound for something we can get a date for
pub trait Dated {
    fn date (&self)->DateTime<Utc>;
}

impl<T> Dated for std::sync::Arc<T> where T: Dated {
    fn date (&self)->DateTime<Utc> { self.as_ref().date() }
}

/// a stochastic generator of time-stamped events with a monotonic internal clock.
///
/// `current_time` is the timestamp of the most recently generated event (initially the
/// configured start time). `next_event` always advances that clock, even when it yields
/// `Ok(None)` - a productive step that produced no event, e.g. a report attempt outside
/// of weather data coverage
pub trait EventSource {
    type Event: Dated;

    fn current_time (&self)->DateTime<Utc>;
    fn next_event (&mut self)->Result<Option<Self::Event>>;
}

/// windowing driver for an [`EventSource`]: delivers events up to a stop time and carries
/// the single event that overshot it over to a later window.
///
/// The carry-over slot can never hold more than one event. It is only filled when the source
/// clock has passed the stop time, which ends the pull loop of the current window, and every
/// subsequent window examines the slot before pulling again
pub struct Lookahead<S> where S: EventSource {
    source: S,
    pending: Option<S::Event>,
}

impl<S> Lookahead<S> where S: EventSource {
    pub fn new (source: S)->Self {
        Lookahead { source, pending: None }
    }

    pub fn source (&self)->&S { &self.source }
    pub fn source_mut (&mut self)->&mut S { &mut self.source }

    /// true if an overshot event is currently held back
    pub fn has_pending (&self)->bool { self.pending.is_some() }

    /// deliver to `sink`, in generation order, every event dated at or before `stop`: first
    /// the held-back event if it has become due, then newly pulled ones. Pulling ends once
    /// the source clock has reached `stop`; the one event dated past `stop` is parked and
    /// re-examined by a later call, so it is delivered exactly once
    pub fn advance_until<F> (&mut self, stop: DateTime<Utc>, sink: &mut F)->Result<()>
        where F: FnMut(S::Event)->Result<()>
    {
        if let Some(ev) = self.pending.take() {
            if ev.date() <= stop {
                sink(ev)?;
            } else {
                self.pending = Some(ev);
                return Ok(())
            }
        }

        while self.source.current_time() < stop {
            if let Some(ev) = self.source.next_event()? {
                if ev.date() <= stop {
                    sink(ev)?;
                } else {
                    self.pending = Some(ev);
                }
            }
        }
        Ok(())
    }
}

/// checked clock advance, mapping std Duration values chrono cannot represent into our own error
pub fn advance_time (t: DateTime<Utc>, d: Duration)->Result<DateTime<Utc>> {
    let dt = TimeDelta::from_std(d).map_err( |e| time_error( format!("time step out of range: {e}")))?;
    Ok( t + dt )
}

pub fn ser_epoch_millis<S: Serializer> (dt: &DateTime<Utc>, s: S) -> std::result::Result<S::Ok, S::Error>  {
    s.serialize_i64(dt.timestamp_millis())
}
