// Configuration validation for splitter construction
//
// Rejects frame geometries the mixers cannot run with before any pool or mixer
// is built.

use anyhow::Result;
use super::super::types::{SplitterConfig, DEFAULT_SAMPLE_SIZE_BITS};

/// Validate splitter configuration
pub fn validate_config(config: &SplitterConfig) -> Result<()> {
    // Frame period is computed in whole milliseconds
    if config.frame_period_nanos < 1_000_000 {
        return Err(anyhow::anyhow!(
            "Invalid frame period: {}ns (must be at least 1ms)",
            config.frame_period_nanos
        ));
    }
    if config.frame_period_nanos > 1_000_000_000 {
        return Err(anyhow::anyhow!(
            "Invalid frame period: {}ns (must be at most 1s)",
            config.frame_period_nanos
        ));
    }

    if config.sample_rate == 0 || config.sample_rate > 192000 {
        return Err(anyhow::anyhow!(
            "Invalid sample rate: {} (must be 1-192000 Hz)",
            config.sample_rate
        ));
    }

    // Frames are 16-bit PCM end to end
    if config.sample_size_bits != DEFAULT_SAMPLE_SIZE_BITS {
        return Err(anyhow::anyhow!(
            "Invalid sample size: {} bits (only {}-bit samples are mixed)",
            config.sample_size_bits,
            DEFAULT_SAMPLE_SIZE_BITS
        ));
    }

    if config.channels < 1 || config.channels > 32 {
        return Err(anyhow::anyhow!(
            "Invalid channel count: {} (must be 1-32 channels)",
            config.channels
        ));
    }

    if config.frame_len() == 0 {
        return Err(anyhow::anyhow!(
            "Frame period {}ns at {} Hz yields an empty frame",
            config.frame_period_nanos,
            config.sample_rate
        ));
    }

    if let Some(gain) = config.gain {
        validate_gain(gain)?;
    }

    Ok(())
}

/// Validate a configured gain value
pub fn validate_gain(gain: f64) -> Result<()> {
    if gain.is_nan() {
        return Err(anyhow::anyhow!("Gain is NaN"));
    }
    if gain.is_infinite() {
        return Err(anyhow::anyhow!("Gain is infinite"));
    }
    Ok(())
}
