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

/// the sliding retention window over generated weather reports.
///
/// This is the outermost pipeline stage and the one the feed host drives directly: each
/// `advance` pulls reports from the generator up to the new current time, appends them to a
/// time-ordered deque and evicts the ones that have aged out of the retention horizon. The
/// per-call added/removed lists are what downstream consumers use to apply incremental updates
/// instead of re-reading the whole window.

use std::{collections::VecDeque, sync::Arc, time::Duration};
use chrono::{DateTime,TimeDelta,Utc};
use tracing::debug;

use crate::WeatherReport;
use crate::errors::{time_error, Result};
use crate::generator::{advance_time,EventSource,Lookahead};

/// FIFO buffer of the reports generated within the trailing retention window.
/// Push order equals non-decreasing report time since the upstream generator produces reports
/// with strictly increasing timestamps, so eviction only ever inspects the front
pub struct ReportBuffer<S> where S: EventSource<Event=Arc<WeatherReport>> {
    source: Lookahead<S>,
    reports: VecDeque<Arc<WeatherReport>>,
    retention: Duration,

    new_reports: Vec<Arc<WeatherReport>>,
    removed_reports: Vec<Arc<WeatherReport>>,
    current_time: DateTime<Utc>,
}

impl<S> ReportBuffer<S> where S: EventSource<Event=Arc<WeatherReport>> {
    pub fn new (source: S, retention: Duration)->Self {
        let current_time = source.current_time();
        ReportBuffer {
            source: Lookahead::new( source),
            reports: VecDeque::new(),
            retention,
            new_reports: Vec::new(),
            removed_reports: Vec::new(),
            current_time,
        }
    }

    pub fn current_time (&self)->DateTime<Utc> { self.current_time }
    pub fn retention (&self)->Duration { self.retention }

    pub fn generator (&self)->&S { self.source.source() }

    /// all reports currently within the window, oldest first
    pub fn reports (&self)->impl Iterator<Item=&Arc<WeatherReport>> {
        self.reports.iter()
    }

    pub fn len (&self)->usize { self.reports.len() }
    pub fn is_empty (&self)->bool { self.reports.is_empty() }

    /// reports added to the window by the last `advance`, in report time order
    pub fn new_reports (&self)->&[Arc<WeatherReport>] { self.new_reports.as_slice() }

    /// reports evicted from the window by the last `advance`, oldest first. Once evicted a
    /// report never reappears
    pub fn removed_reports (&self)->&[Arc<WeatherReport>] { self.removed_reports.as_slice() }

    /// move the window forward by `d`: collect the reports generated up to the new current
    /// time (including a previously carried-over one that has become due) and evict everything
    /// older than the retention horizon. The added/removed lists always refer to this call only
    pub fn advance (&mut self, d: Duration)->Result<()> {
        let stop = advance_time( self.current_time, d)?;
        self.new_reports.clear();
        self.removed_reports.clear();

        let reports = &mut self.reports;
        let added = &mut self.new_reports;
        self.source.advance_until( stop, &mut |report| {
            reports.push_back( report.clone());
            added.push( report);
            Ok(())
        })?;

        let keep = TimeDelta::from_std( self.retention).map_err( |e| time_error( format!("retention out of range: {e}")))?;
        let horizon = stop - keep;
        while self.reports.front().is_some_and( |r| r.time < horizon) {
            if let Some(removed) = self.reports.pop_front() {
                self.removed_reports.push( removed);
            }
        }

        self.current_time = stop;
        debug!("window advanced to {}: {} added, {} evicted, {} retained",
               stop, self.new_reports.len(), self.removed_reports.len(), self.reports.len());
        Ok(())
    }
}
