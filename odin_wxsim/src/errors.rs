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

use thiserror::Error;
use ron;

pub type Result<T> = std::result::Result<T, OdinWxSimError>;

#[derive(Error,Debug)]
pub enum OdinWxSimError {
    #[error("IO error {0}")]
    IOError( #[from] std::io::Error),

    #[error("RON error {0}")]
    RonError( #[from] ron::Error),

    #[error("RON deserialize error {0}")]
    RonDeError( #[from] ron::de::SpannedError),

    #[error("config error {0}")]
    ConfigError(String),

    /// a categorical weight table with negative weights or no entries
    #[error("invalid distribution {0}")]
    InvalidDistribution(String),

    /// report sampling hit an empty active flight set - the caller has to warm up the
    /// flight tracker before drawing reports
    #[error("no active flights to sample reports from")]
    NoActiveFlights,

    /// a persisted predictor that exists but cannot be deserialized. This is recoverable
    /// by re-fitting and hence normally not propagated
    #[error("predictor cache corrupt {0}")]
    PredictorCacheCorrupt(String),

    #[error("time arithmetic error {0}")]
    TimeError(String),

    /// a generic error
    #[error("operation failed {0}")]
    OpFailed(String)
}

pub fn op_failed (msg: impl ToString)->OdinWxSimError {
    OdinWxSimError::OpFailed(msg.to_string())
}

pub fn config_error (msg: impl ToString)->OdinWxSimError {
    OdinWxSimError::ConfigError(msg.to_string())
}

pub fn invalid_distribution (msg: impl ToString)->OdinWxSimError {
    OdinWxSimError::InvalidDistribution(msg.to_string())
}

pub fn time_error (msg: impl ToString)->OdinWxSimError {
    OdinWxSimError::TimeError(msg.to_string())
}
