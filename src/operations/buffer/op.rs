use tracing::{debug, warn};

use crate::error::{BufferError, OperationError, Result};
use crate::geometry::Geometry;
use crate::math::PrecisionModel;

use super::builder::BufferBuilder;
use super::parameters::BufferParameters;

/// Finest precision tried after the input precision fails, in decimal
/// digits of the buffer envelope.
pub const MAX_PRECISION_DIGITS: u32 = 12;

/// Computes the buffer of a geometry, retrying at decreasing precision
/// when the computation hits a robustness failure.
///
/// # Algorithm
///
/// 1. Buffer at the input precision with monotone-chain noding.
/// 2. On a topology failure, if the input precision is fixed, snap-round
///    on its grid once.
/// 3. Otherwise snap-round on grids of `MAX_PRECISION_DIGITS` significant
///    digits down to 0, stopping at the first success.
///
/// Only topology failures trigger a retry; invalid input fails at once.
/// Each attempt runs on a fresh builder.
#[derive(Debug)]
pub struct BufferOp<'a> {
    geom: &'a Geometry,
    params: BufferParameters,
    precision: PrecisionModel,
    max_precision_digits: u32,
    last_precision_digits: Option<u32>,
}

impl<'a> BufferOp<'a> {
    #[must_use]
    pub fn new(geom: &'a Geometry) -> Self {
        Self {
            geom,
            params: BufferParameters::default(),
            precision: PrecisionModel::Floating,
            max_precision_digits: MAX_PRECISION_DIGITS,
            last_precision_digits: None,
        }
    }

    #[must_use]
    pub fn with_params(mut self, params: BufferParameters) -> Self {
        self.params = params;
        self
    }

    /// Sets the precision model of the input coordinates.
    #[must_use]
    pub fn with_precision(mut self, precision: PrecisionModel) -> Self {
        self.precision = precision;
        self
    }

    /// Caps the digits of the first reduced-precision attempt.
    #[must_use]
    pub fn with_max_precision_digits(mut self, digits: u32) -> Self {
        self.max_precision_digits = digits.min(MAX_PRECISION_DIGITS);
        self
    }

    /// Digits of the reduced-precision attempt that produced the last
    /// result, or `None` if the input precision succeeded.
    #[must_use]
    pub fn last_precision_digits(&self) -> Option<u32> {
        self.last_precision_digits
    }

    /// Buffers the geometry by `distance`.
    ///
    /// # Errors
    ///
    /// Returns `OperationError::InvalidInput` for a non-finite distance,
    /// invalid parameters or non-finite coordinates, and the last
    /// `TopologyError` if every precision fails.
    pub fn execute(&mut self, distance: f64) -> Result<Geometry> {
        if !distance.is_finite() {
            return Err(OperationError::InvalidInput(format!("buffer distance {distance} is not finite")).into());
        }
        self.params.validate()?;
        self.last_precision_digits = None;

        // Step 1: input precision.
        debug!(distance, precision = ?self.precision, "buffering at input precision");
        let err = match BufferBuilder::new(self.params)
            .with_precision(self.precision)
            .buffer(self.geom, distance)
        {
            Ok(geom) => return Ok(geom),
            Err(err) if err.is_topology() => err,
            Err(err) => return Err(err),
        };
        debug!(error = %err, "input precision failed");

        // Step 2: fixed input precision gets one snap-rounded attempt.
        if !self.precision.is_floating() {
            return BufferBuilder::new(self.params)
                .with_snap_rounding(self.precision)
                .buffer(self.geom, distance)
                .inspect_err(|e| warn!(error = %e, "fixed precision buffer failed"));
        }

        // Step 3: decreasing precision.
        let env_size = self.geom.envelope();
        let env_size = env_size.width().max(env_size.height());
        let params = self.params;
        let geom = self.geom;
        let (result, digits) = retry_reduced_precision(self.max_precision_digits, err, |digits| {
            let scale = precision_scale_factor(env_size, distance, digits);
            debug!(digits, scale, "buffering at reduced precision");
            BufferBuilder::new(params)
                .with_snap_rounding(PrecisionModel::fixed(scale))
                .buffer(geom, distance)
        })?;
        self.last_precision_digits = Some(digits);
        Ok(result)
    }
}

/// Runs `attempt` for `max_digits` down to 0 until one succeeds, returning
/// the result and its digit count. Non-topology errors stop the loop.
fn retry_reduced_precision<F>(max_digits: u32, mut last_err: BufferError, mut attempt: F) -> Result<(Geometry, u32)>
where
    F: FnMut(u32) -> Result<Geometry>,
{
    for digits in (0..=max_digits).rev() {
        match attempt(digits) {
            Ok(geom) => return Ok((geom, digits)),
            Err(err) if err.is_topology() => {
                debug!(digits, error = %err, "reduced precision failed");
                last_err = err;
            }
            Err(err) => return Err(err),
        }
    }
    warn!(error = %last_err, "buffer failed at every precision");
    Err(last_err)
}

/// Scale of a fixed grid with `digits` significant digits across the
/// buffered envelope: `10^(digits - (log10(size + 2 * max(distance, 0)) + 1))`.
#[must_use]
pub fn precision_scale_factor(env_size: f64, distance: f64, digits: u32) -> f64 {
    let buf_env_size = env_size + 2.0 * distance.max(0.0);
    if buf_env_size <= 0.0 {
        return 10f64.powf(f64::from(digits));
    }
    let buf_env_log10 = buf_env_size.log10() + 1.0;
    10f64.powf(f64::from(digits) - buf_env_log10)
}
