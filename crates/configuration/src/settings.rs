use crate::error::ConfigError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::Deserialize;
use std::path::PathBuf;

/// The root configuration structure for the entire application.
///
/// Every section carries defaults, so running without a config file yields the
/// documented analysis policy.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub input: InputSettings,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Config {
    /// Rejects configurations the analysis cannot run with.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.analysis.validate()?;
        if self.logging.level.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "logging.level must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

/// Where the order table comes from when no path is given on the command line.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct InputSettings {
    pub path: Option<PathBuf>,
    /// Worksheet to read. The first sheet is used when omitted.
    pub sheet: Option<String>,
}

/// All thresholds and scales used by the analysis pipeline.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AnalysisConfig {
    #[serde(default)]
    pub risk_curve: RiskCurve,
    #[serde(default)]
    pub client_policy: ClientPolicy,
    #[serde(default)]
    pub order_policy: OrderPolicy,
    #[serde(default)]
    pub bottleneck: BottleneckScreen,
    #[serde(default)]
    pub shift: ShiftSettings,
}

impl AnalysisConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.risk_curve.validate()?;
        self.client_policy.validate()?;
        self.order_policy.validate()?;
        self.bottleneck.validate()?;
        self.shift.validate()
    }
}

/// Shape of the exponential mapping from risk percent to the 1-10 RISK scale.
#[derive(Debug, Clone, Deserialize)]
pub struct RiskCurve {
    /// Decay constant in percentage points. Smaller values saturate sooner.
    #[serde(default = "default_scale_pct")]
    pub scale_pct: f64,
}

fn default_scale_pct() -> f64 {
    15.0
}

impl Default for RiskCurve {
    fn default() -> Self {
        Self {
            scale_pct: default_scale_pct(),
        }
    }
}

impl RiskCurve {
    /// Highest risk percentage at which the curve is allowed to first round to 10.
    pub const MAX_SATURATION_PCT: f64 = 50.0;

    /// The risk percentage from which on the rounded score is 10.
    ///
    /// The score rounds to 10 once `9 * (1 - exp(-x / scale))` reaches 8.5,
    /// which happens at `x = scale * ln(18)`.
    pub fn saturation_pct(&self) -> f64 {
        self.scale_pct * 18f64.ln()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self.scale_pct.is_finite() || self.scale_pct <= 0.0 {
            return Err(ConfigError::ValidationError(format!(
                "risk_curve.scale_pct must be positive, got {}",
                self.scale_pct
            )));
        }
        if self.saturation_pct() > Self::MAX_SATURATION_PCT {
            return Err(ConfigError::ValidationError(format!(
                "risk_curve.scale_pct = {} saturates at {:.1}% risk, must saturate at or before {}%",
                self.scale_pct,
                self.saturation_pct(),
                Self::MAX_SATURATION_PCT
            )));
        }
        Ok(())
    }
}

/// Thresholds for the per-client view: client classification and the
/// summary bad-order policy.
#[derive(Debug, Clone, Deserialize)]
pub struct ClientPolicy {
    #[serde(default = "default_high_score")]
    pub high_risk: u8,
    /// Population variance of the client's risk percentages.
    #[serde(default = "default_high_variance")]
    pub high_variance: f64,
    #[serde(default = "default_high_score")]
    pub high_gain: u8,
    #[serde(default = "default_low_score")]
    pub low_risk: u8,
    #[serde(default = "default_low_variance")]
    pub low_variance: f64,
    #[serde(default = "default_low_score")]
    pub low_gain: u8,
}

fn default_high_score() -> u8 {
    6
}
fn default_low_score() -> u8 {
    4
}
fn default_high_variance() -> f64 {
    60.0
}
fn default_low_variance() -> f64 {
    40.0
}

impl Default for ClientPolicy {
    fn default() -> Self {
        Self {
            high_risk: default_high_score(),
            high_variance: default_high_variance(),
            high_gain: default_high_score(),
            low_risk: default_low_score(),
            low_variance: default_low_variance(),
            low_gain: default_low_score(),
        }
    }
}

impl ClientPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, value) in [
            ("high_risk", self.high_risk),
            ("high_gain", self.high_gain),
            ("low_risk", self.low_risk),
            ("low_gain", self.low_gain),
        ] {
            if !(1..=10).contains(&value) {
                return Err(ConfigError::ValidationError(format!(
                    "client_policy.{name} must be between 1 and 10, got {value}"
                )));
            }
        }
        if self.high_variance < 0.0 || self.low_variance < 0.0 {
            return Err(ConfigError::ValidationError(
                "client_policy variance thresholds must not be negative".to_string(),
            ));
        }
        Ok(())
    }
}

/// Threshold for the per-order bad-order policy.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderPolicy {
    /// Orders whose risk fraction (risk percent / 100) is strictly above this are flagged.
    #[serde(default = "default_max_risk_fraction")]
    pub max_risk_fraction: Decimal,
}

fn default_max_risk_fraction() -> Decimal {
    dec!(0.15)
}

impl Default for OrderPolicy {
    fn default() -> Self {
        Self {
            max_risk_fraction: default_max_risk_fraction(),
        }
    }
}

impl OrderPolicy {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.max_risk_fraction <= Decimal::ZERO || self.max_risk_fraction >= Decimal::ONE {
            return Err(ConfigError::ValidationError(format!(
                "order_policy.max_risk_fraction must be between 0 and 1, got {}",
                self.max_risk_fraction
            )));
        }
        Ok(())
    }
}

/// The screen for orders that block a bottleneck machine: long, low-yield and risky.
#[derive(Debug, Clone, Deserialize)]
pub struct BottleneckScreen {
    #[serde(default = "default_processing_time_quantile")]
    pub processing_time_quantile: f64,
    #[serde(default = "default_margin_quantile")]
    pub margin_quantile: f64,
    #[serde(default = "default_min_risk_pct")]
    pub min_risk_pct: Decimal,
}

fn default_processing_time_quantile() -> f64 {
    0.75
}
fn default_margin_quantile() -> f64 {
    0.25
}
fn default_min_risk_pct() -> Decimal {
    dec!(15)
}

impl Default for BottleneckScreen {
    fn default() -> Self {
        Self {
            processing_time_quantile: default_processing_time_quantile(),
            margin_quantile: default_margin_quantile(),
            min_risk_pct: default_min_risk_pct(),
        }
    }
}

impl BottleneckScreen {
    fn validate(&self) -> Result<(), ConfigError> {
        for (name, q) in [
            ("processing_time_quantile", self.processing_time_quantile),
            ("margin_quantile", self.margin_quantile),
        ] {
            if !(0.0..=1.0).contains(&q) {
                return Err(ConfigError::ValidationError(format!(
                    "bottleneck.{name} must be within [0, 1], got {q}"
                )));
            }
        }
        Ok(())
    }
}

/// Capacity of one shift.
#[derive(Debug, Clone, Deserialize)]
pub struct ShiftSettings {
    #[serde(default = "default_capacity_hr")]
    pub capacity_hr: Decimal,
}

fn default_capacity_hr() -> Decimal {
    dec!(800)
}

impl Default for ShiftSettings {
    fn default() -> Self {
        Self {
            capacity_hr: default_capacity_hr(),
        }
    }
}

impl ShiftSettings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.capacity_hr <= Decimal::ZERO {
            return Err(ConfigError::ValidationError(format!(
                "shift.capacity_hr must be positive, got {}",
                self.capacity_hr
            )));
        }
        Ok(())
    }
}

/// Logging output. Without a directory, logs go to stderr.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default filter directive. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_level")]
    pub level: String,
    /// Directory for daily rolling log files.
    pub directory: Option<PathBuf>,
    #[serde(default = "default_file_prefix")]
    pub file_prefix: String,
}

fn default_level() -> String {
    "info".to_string()
}
fn default_file_prefix() -> String {
    "order-insight".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
            directory: None,
            file_prefix: default_file_prefix(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = Config::default();
        assert!(config.validate().is_ok());
        assert_eq!(config.analysis.shift.capacity_hr, dec!(800));
        assert_eq!(config.analysis.order_policy.max_risk_fraction, dec!(0.15));
        assert_eq!(config.analysis.client_policy.high_risk, 6);
        assert_eq!(config.analysis.client_policy.high_variance, 60.0);
    }

    #[test]
    fn default_curve_saturates_between_forty_and_fifty_percent() {
        let sat = RiskCurve::default().saturation_pct();
        assert!(sat > 40.0 && sat <= 50.0, "saturation at {sat}");
    }

    #[test]
    fn rejects_slow_risk_curve() {
        let mut config = Config::default();
        config.analysis.risk_curve.scale_pct = 20.0;
        assert!(matches!(config.validate(), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn rejects_non_positive_capacity() {
        let mut config = Config::default();
        config.analysis.shift.capacity_hr = Decimal::ZERO;
        assert!(config.validate().is_err());
    }

    #[test]
    fn rejects_out_of_range_thresholds() {
        let mut config = Config::default();
        config.analysis.order_policy.max_risk_fraction = dec!(1.5);
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.bottleneck.margin_quantile = 1.2;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.analysis.client_policy.high_gain = 0;
        assert!(config.validate().is_err());
    }
}
