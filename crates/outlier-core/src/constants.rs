//! Shared constants for the outlier statement engine.

/// Default number of spread units beyond which a value is flagged.
pub const DEFAULT_THRESHOLD: f64 = 3.0;

/// Default row cap for a generated statement.
pub const DEFAULT_MAX_RESULTS: u32 = 500;

/// Upper limit accepted for `max_results`.
pub const DEFAULT_MAX_RESULTS_LIMIT: u32 = 10_000;

/// Scales a median absolute deviation into a standard deviation estimate
/// for normally distributed data (1 / Φ⁻¹(3/4)).
pub const MAD_NORMAL_CONSISTENCY: f64 = 1.4826;

/// Longest integral part a numeric value may carry before it is treated as
/// unparseable. Matches the decimal exponent range of an IEEE 754 double.
pub const MAX_INTEGRAL_DIGITS: usize = 307;

/// Strict decimal grammar for stored value text. No exponent notation.
pub const NUMERIC_VALUE_PATTERN: &str = r"^[+-]?[0-9]+(\.[0-9]+)?$";

/// Default name of the pre-aggregated fact table.
pub const DEFAULT_ANALYTICS_TABLE: &str = "analytics";
