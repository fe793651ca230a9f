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

/// wrap-safe track geometry for simulated flights.
/// Positions are plain geodetic degrees (f64) since they mostly feed unit-less math - uom
/// quantities only enter at the data model level. Route lengths use the geodesic solver of
/// the [geo](https://docs.rs/geo/latest/geo/index.html) crate, which is also what we build
/// flight durations from.

use geo::{Point, Distance};
use geo::algorithm::line_measures::metric_spaces::Geodesic;
use uom::si::f64::Length;
use uom::si::length::meter;

#[inline]
pub fn normalize_360 (d: f64) -> f64 {
    let x = d % 360.0;
    if x < 0.0 { 360.0 + x } else { x }
}

/// linear interpolation between two angles that were shifted into [0,width), always taking
/// the shorter of the two directions around the wrap boundary. Ties go backward, matching
/// the piecewise interpolation this was derived from
fn wrap_lerp (start: f64, end: f64, fraction: f64, width: f64) -> f64 {
    let fwd = (end - start).rem_euclid( width);
    let back = (start - end).rem_euclid( width);

    if fwd < back {
        (fraction * fwd + start).rem_euclid( width)
    } else {
        (-fraction * back + start).rem_euclid( width)
    }
}

/// interpolated position along a flight leg, `fraction` being elapsed/total flight duration
/// in [0,1]. Latitudes are shifted by +90 into [0,180), longitudes by +180 into [0,360), both
/// differences are taken mod the domain width in either direction and the smaller one wins, so
/// legs crossing the anti-meridian never take the long way around.
/// Note the modulus aliases the exact poles (+90 wraps to -90) - acceptable since airports
/// don't sit on the pole point
pub fn interpolate_position (lat1: f64, lon1: f64, lat2: f64, lon2: f64, fraction: f64) -> (f64,f64) {
    let lat = wrap_lerp( lat1 + 90.0, lat2 + 90.0, fraction, 180.0) - 90.0;
    let lon = wrap_lerp( lon1 + 180.0, lon2 + 180.0, fraction, 360.0) - 180.0;
    (lat, lon)
}

/// initial great-circle bearing from (lat1,lon1) towards (lat2,lon2) in degrees [0,360),
/// 0 = north, 90 = east.
/// This is the canonical spherical formula
///    θ = atan2( sin Δλ · cos φ2,  cos φ1 · sin φ2 − sin φ1 · cos φ2 · cos Δλ )
pub fn bearing_degrees (lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let phi1 = lat1.to_radians();
    let phi2 = lat2.to_radians();
    let dlam = (lon2 - lon1).to_radians();

    let y = dlam.sin() * phi2.cos();
    let x = phi1.cos() * phi2.sin() - phi1.sin() * phi2.cos() * dlam.cos();

    normalize_360( y.atan2(x).to_degrees())
}

/// geodesic (WGS84) distance between two positions. Note the geo crate uses lon,lat point order
pub fn geodesic_distance (lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> Length {
    let dist = Geodesic.distance( Point::new( lon1, lat1), Point::new( lon2, lat2));
    Length::new::<meter>(dist)
}
