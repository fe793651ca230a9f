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

/// random sampling primitives for the report pipeline: categorical choice over unnormalized
/// weight tables and gamma distributed interarrival delays.
/// Weight tables are slices of (value,weight) pairs - the scan order is the table order, which
/// keeps seeded runs reproducible (a HashMap would not)

use std::time::Duration;
use rand::Rng;
use rand_distr::{Distribution,Gamma};

use crate::errors::{invalid_distribution, Result};

/// select an entry of `dist` with probability weight/sum(weights). Weights do not need to be
/// normalized but must not be negative, and the table must not be empty.
/// The draw is uniform in [0,sum) and resolved by a running-total scan in table order; if
/// accumulated floating point error leaves the draw unmatched the last entry is returned -
/// that fallback is deliberate, not dead code
pub fn weighted_random<'a,T,R> (dist: &'a [(T,f64)], rng: &mut R) -> Result<&'a T> where R: Rng + ?Sized {
    if dist.is_empty() {
        return Err( invalid_distribution("empty weight table"))
    }
    if dist.iter().any( |(_,w)| *w < 0.0) {
        return Err( invalid_distribution("all weights must be non-negative"))
    }

    let total: f64 = dist.iter().map( |(_,w)| *w).sum();
    let r = if total > 0.0 { rng.random_range( 0.0..total) } else { 0.0 };

    let mut acc = 0.0;
    for (i,(value,weight)) in dist.iter().enumerate() {
        acc += weight;
        if acc >= r || i == dist.len()-1 {
            return Ok(value)
        }
    }
    unreachable!() // the scan always returns from its last iteration
}

/// sampler for random delays between successive generated events (flight departures, weather
/// reports). The delay is gamma distributed with the mean interarrival seconds as shape and
/// unit scale - an unusual parameterization (variance equals the mean) that we keep for
/// compatibility with the data this simulation was calibrated against
#[derive(Debug,Clone)]
pub struct InterarrivalSampler {
    mean: Duration,
    gamma: Gamma<f64>,
}

impl InterarrivalSampler {
    pub fn new (mean: Duration) -> Result<Self> {
        let shape = mean.as_secs_f64();
        if shape <= 0.0 {
            return Err( invalid_distribution("mean interarrival must be positive"))
        }
        let gamma = Gamma::new( shape, 1.0).map_err( |e| invalid_distribution(e))?;
        Ok( InterarrivalSampler { mean, gamma } )
    }

    pub fn mean (&self)->Duration { self.mean }

    /// next interarrival delay, guaranteed strictly positive so that generated event times
    /// are strictly increasing
    pub fn next_delay<R> (&self, rng: &mut R) -> Duration where R: Rng + ?Sized {
        loop {
            let dt = self.gamma.sample( rng);
            if dt > 0.0 && dt.is_finite() {
                return Duration::from_secs_f64(dt)
            }
        }
    }
}
