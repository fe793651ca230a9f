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

/// the weather field interface of the report pipeline plus a self-contained in-memory
/// implementation.
///
/// The report generator only depends on the [`WeatherModel`] trait - where the weather values
/// come from (gridded reanalysis data, a live service, a synthetic field) is up to the host.
/// [`GridWeatherModel`] follows the layout of the reanalysis datasets this feed was built
/// around: regular lat/lon axes, a time axis counted in hours since 1800-01-01, sparse cell
/// coverage, and position lookup through linear index predictors that are fitted once and
/// cached on disk.

use std::{fs, io, path::Path};
use chrono::{DateTime,TimeDelta,TimeZone,Utc};
use lazy_static::lazy_static;
use linreg::linear_regression;
use serde::{Deserialize,Serialize};
use tracing::{debug,warn};
use uom::si::f64::{AvailableEnergy,Length,Velocity};
use uom::si::available_energy::joule_per_kilogram;
use uom::si::velocity::meter_per_second;

use crate::errors::{op_failed, OdinWxSimError, Result};

lazy_static! {
    /// time axis origin of the reanalysis data family this model format stems from
    pub static ref WX_EPOCH: DateTime<Utc> = Utc.with_ymd_and_hms( 1800, 1, 1, 0, 0, 0).unwrap();
}

/// hours since [`struct@WX_EPOCH`] - the unit of [`GridWeatherModel`] time slices
pub fn hours_since_epoch (t: DateTime<Utc>)->f64 {
    (t - *WX_EPOCH).num_milliseconds() as f64 / 3_600_000.0
}

/// the weather state sampled at one position and time
#[derive(Debug,Clone,Copy,Serialize,Deserialize)]
pub struct WxSample {
    /// ambient turbulent kinetic energy
    pub tke: AvailableEnergy,
    /// zonal (west→east) wind component
    pub wind_u: Velocity,
    /// meridional (south→north) wind component
    pub wind_v: Velocity,
}

/// what the report pipeline needs from a weather data source.
///
/// `sample` returning `None` is the normal sparse-coverage case and suppresses the report for
/// that draw - implementations should reserve errors for construction time
pub trait WeatherModel {
    /// the earliest instant for which this model has data. The simulator anchors flight
    /// generation a warm-up period before this
    fn first_time (&self)->DateTime<Utc>;

    /// weather at the given position and time, `None` if it is outside data coverage
    fn sample (&self, latitude: f64, longitude: f64, altitude: Length, time: DateTime<Utc>)->Option<WxSample>;
}

/* #region index predictor ***************************************************************************************/

/// linear predictors mapping latitude to grid row and longitude to grid column, fitted once
/// against the dataset coordinate axes so position lookup does not have to scan them.
/// Fitting is cheap but the fit is part of the dataset identity, hence it gets persisted
/// (as RON) and reloaded by [`IndexPredictor::load_or_fit`]
#[derive(Debug,Clone,Serialize,Deserialize)]
pub struct IndexPredictor {
    lat_slope: f64,
    lat_intercept: f64,
    lon_slope: f64,
    lon_intercept: f64,
}

impl IndexPredictor {
    /// fit the two index regressions from the dataset's latitude and longitude axis values
    pub fn fit (lats: &[f64], lons: &[f64])->Result<Self> {
        if lats.len() < 2 || lons.len() < 2 {
            return Err( op_failed("index predictor needs at least 2 points per axis"))
        }
        let lat_idx: Vec<f64> = (0..lats.len()).map( |i| i as f64).collect();
        let lon_idx: Vec<f64> = (0..lons.len()).map( |i| i as f64).collect();

        let (lat_slope,lat_intercept) = linear_regression( lats, lat_idx.as_slice()).map_err( |e| op_failed( e.to_string()))?;
        let (lon_slope,lon_intercept) = linear_regression( lons, lon_idx.as_slice()).map_err( |e| op_failed( e.to_string()))?;

        Ok( IndexPredictor { lat_slope, lat_intercept, lon_slope, lon_intercept } )
    }

    /// fractional row index for a latitude
    pub fn lat_index (&self, lat: f64)->f64 {
        self.lat_slope * lat + self.lat_intercept
    }

    /// fractional column index for a longitude
    pub fn lon_index (&self, lon: f64)->f64 {
        self.lon_slope * lon + self.lon_intercept
    }

    /// load a previously persisted predictor from `path`, re-fitting and re-persisting if the
    /// cache file is missing or unusable. Only those two outcomes are cache misses - anything
    /// else (unreadable file, failing write) is a real error and propagates
    pub fn load_or_fit (path: impl AsRef<Path>, lats: &[f64], lons: &[f64])->Result<Self> {
        let path = path.as_ref();
        match Self::load( path) {
            Ok(predictor) => {
                debug!("loaded index predictor from {:?}", path);
                Ok(predictor)
            }
            Err(OdinWxSimError::IOError(e)) if e.kind() == io::ErrorKind::NotFound => {
                debug!("no index predictor cache at {:?}, fitting", path);
                Self::refit( path, lats, lons)
            }
            Err(OdinWxSimError::PredictorCacheCorrupt(msg)) => {
                warn!("index predictor cache {:?} unusable ({}), re-fitting", path, msg);
                Self::refit( path, lats, lons)
            }
            Err(other) => Err(other)
        }
    }

    fn refit (path: &Path, lats: &[f64], lons: &[f64])->Result<Self> {
        let predictor = Self::fit( lats, lons)?;
        predictor.save( path)?;
        Ok(predictor)
    }

    fn load (path: &Path)->Result<Self> {
        let data = fs::read_to_string( path)?;
        let predictor: IndexPredictor = ron::from_str( data.as_str())
            .map_err( |e| OdinWxSimError::PredictorCacheCorrupt( e.to_string()))?;

        let coeffs = [predictor.lat_slope, predictor.lat_intercept, predictor.lon_slope, predictor.lon_intercept];
        if coeffs.iter().any( |c| !c.is_finite()) {
            return Err( OdinWxSimError::PredictorCacheCorrupt("non-finite regression coefficients".to_string()))
        }
        Ok(predictor)
    }

    pub fn save (&self, path: impl AsRef<Path>)->Result<()> {
        let s = ron::ser::to_string_pretty( self, ron::ser::PrettyConfig::default())?;
        fs::write( path.as_ref(), s)?;
        Ok(())
    }
}

/* #endregion index predictor */

/* #region grid model ********************************************************************************************/

/// in-memory gridded weather model with `[time][lat][lon]` cells and hourly time slices.
/// Cells are optional - `None` marks positions the dataset has no values for, which the
/// pipeline turns into skipped reports.
/// Used by the feed driver and the tests; real datasets plug in behind the same trait
pub struct GridWeatherModel {
    lats: Vec<f64>,
    lons: Vec<f64>,
    /// ascending whole hours since [`struct@WX_EPOCH`], one per time slice
    time_hours: Vec<i64>,
    /// `time_hours.len() * lats.len() * lons.len()` cells in `[time][lat][lon]` order
    cells: Vec<Option<WxSample>>,
    predictor: IndexPredictor,
}

impl GridWeatherModel {
    pub fn new (lats: Vec<f64>, lons: Vec<f64>, time_hours: Vec<i64>, cells: Vec<Option<WxSample>>,
                predictor: IndexPredictor)->Result<Self>
    {
        if lats.len() < 2 || lons.len() < 2 || time_hours.is_empty() {
            return Err( op_failed("weather grid needs at least 2x2 cells and 1 time slice"))
        }
        if !time_hours.is_sorted() {
            return Err( op_failed("weather grid time axis must be ascending"))
        }
        if cells.len() != time_hours.len() * lats.len() * lons.len() {
            return Err( op_failed( format!("weather grid cell count {} does not match axes {}x{}x{}",
                                           cells.len(), time_hours.len(), lats.len(), lons.len())))
        }
        Ok( GridWeatherModel { lats, lons, time_hours, cells, predictor } )
    }

    /// a deterministic synthetic weather field over the CONUS area, starting at `first_time`
    /// (rounded down to the grid hour) and extending over `n_hours` hourly slices. Wind and tke
    /// vary smoothly over position and time; a moving band of cells is left without data so
    /// consumers see realistic coverage gaps.
    /// The index predictor is fitted on the fly, or reloaded from `cache` if given
    pub fn synthetic (first_time: DateTime<Utc>, n_hours: usize, cache: Option<&Path>)->Result<Self> {
        let lats: Vec<f64> = (0..15).map( |i| 20.0 + 2.5 * (i as f64)).collect();   // 20°..55° N
        let lons: Vec<f64> = (0..29).map( |i| -130.0 + 2.5 * (i as f64)).collect(); // 130°..60° W

        let h0 = hours_since_epoch( first_time).floor() as i64;
        let time_hours: Vec<i64> = (0..n_hours.max(1) as i64).map( |h| h0 + h).collect();

        let mut cells: Vec<Option<WxSample>> = Vec::with_capacity( time_hours.len() * lats.len() * lons.len());
        for (it,_) in time_hours.iter().enumerate() {
            let th = it as f64;
            for lat in &lats {
                for lon in &lons {
                    let phase = lat.to_radians() * 3.0 + lon.to_radians() * 2.0;
                    let gap = (lat * 0.7 + lon * 0.9 + th * 0.3).sin() > 0.93;
                    cells.push( if gap { None } else {
                        Some( WxSample {
                            tke: AvailableEnergy::new::<joule_per_kilogram>( 0.5 + 0.4 * (phase + th * 0.2).cos().abs()),
                            wind_u: Velocity::new::<meter_per_second>( 12.0 + 8.0 * (phase + th * 0.1).sin()),
                            wind_v: Velocity::new::<meter_per_second>( 2.0 + 5.0 * (phase * 0.5 - th * 0.1).cos()),
                        })
                    });
                }
            }
        }

        let predictor = match cache {
            Some(path) => IndexPredictor::load_or_fit( path, lats.as_slice(), lons.as_slice())?,
            None => IndexPredictor::fit( lats.as_slice(), lons.as_slice())?
        };
        Self::new( lats, lons, time_hours, cells, predictor)
    }

    pub fn predictor (&self)->&IndexPredictor { &self.predictor }

    pub fn last_time (&self)->DateTime<Utc> {
        *WX_EPOCH + TimeDelta::hours( self.time_hours[ self.time_hours.len()-1])
    }

    /// nearest time slice for `t`, `None` outside the covered range (± half a slice)
    fn time_index (&self, t: DateTime<Utc>)->Option<usize> {
        let h = hours_since_epoch( t);
        let first = self.time_hours[0] as f64;
        let last = self.time_hours[ self.time_hours.len()-1] as f64;
        if h < first - 0.5 || h > last + 0.5 {
            return None
        }
        let i = self.time_hours.partition_point( |&th| (th as f64) < h);
        if i == 0 { return Some(0) }
        if i == self.time_hours.len() { return Some( i-1) }

        let d_lo = h - self.time_hours[i-1] as f64;
        let d_hi = self.time_hours[i] as f64 - h;
        Some( if d_lo <= d_hi { i-1 } else { i })
    }

    /// nearest grid index predicted for a coordinate, `None` outside the axis
    fn axis_index (predicted: f64, len: usize)->Option<usize> {
        let i = predicted.round();
        if i >= 0.0 && (i as usize) < len { Some(i as usize) } else { None }
    }
}

impl WeatherModel for GridWeatherModel {
    fn first_time (&self)->DateTime<Utc> {
        *WX_EPOCH + TimeDelta::hours( self.time_hours[0])
    }

    /// nearest-cell lookup; the single-level grid has no vertical axis so altitude is ignored
    fn sample (&self, latitude: f64, longitude: f64, _altitude: Length, time: DateTime<Utc>)->Option<WxSample> {
        let it = self.time_index( time)?;
        let ilat = Self::axis_index( self.predictor.lat_index( latitude), self.lats.len())?;
        let ilon = Self::axis_index( self.predictor.lon_index( longitude), self.lons.len())?;

        self.cells[ (it * self.lats.len() + ilat) * self.lons.len() + ilon]
    }
}

/* #endregion grid model */
