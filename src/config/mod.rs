use std::env;
use std::fmt;

use crate::cases::domain::CasePhase;

/// Top-level configuration for the engine. Every threshold, rate, fee, and
/// grace period the algorithms consume lives here; the modules themselves
/// hard-code nothing.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub accrual: AccrualConfig,
    pub classifier: ClassifierConfig,
    pub deadlines: DeadlineConfig,
    pub sweep: SweepConfig,
    pub telemetry: TelemetryConfig,
}

impl EngineConfig {
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let accrual = AccrualConfig {
            monthly_interest_bps: read_u32("LEGAL_INTEREST_BPS", 100)?,
            compound_monthly: read_bool("LEGAL_INTEREST_COMPOUND", false)?,
            ..AccrualConfig::default()
        };

        let classifier = ClassifierConfig {
            sla_days: read_i64("LEGAL_SLA_DAYS", 30)?,
            ..ClassifierConfig::default()
        };

        let sweep = SweepConfig {
            workers: read_usize("LEGAL_SWEEP_WORKERS", 4)?,
        };

        let telemetry = TelemetryConfig {
            log_level: env::var("LEGAL_LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        };

        let config = Self {
            accrual,
            classifier,
            deadlines: DeadlineConfig::default(),
            sweep,
            telemetry,
        };
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.classifier.validate()?;
        if self.sweep.workers == 0 {
            return Err(ConfigError::InvalidThreshold {
                name: "LEGAL_SWEEP_WORKERS",
                reason: "worker count must be at least 1",
            });
        }
        Ok(())
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            accrual: AccrualConfig::default(),
            classifier: ClassifierConfig::default(),
            deadlines: DeadlineConfig::default(),
            sweep: SweepConfig::default(),
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }
}

/// Interest and fee schedule. Rates are basis points per 30-day month; fees
/// are flat amounts in minor units, charged once per phase entered.
#[derive(Debug, Clone)]
pub struct AccrualConfig {
    pub monthly_interest_bps: u32,
    pub compound_monthly: bool,
    pub legal_fee_per_phase: PhaseFeeTable,
    pub court_fee_per_phase: PhaseFeeTable,
}

impl Default for AccrualConfig {
    fn default() -> Self {
        Self {
            monthly_interest_bps: 100,
            compound_monthly: false,
            legal_fee_per_phase: PhaseFeeTable {
                pre_judicial: 50_000,
                judicial: 150_000,
                execution: 100_000,
            },
            court_fee_per_phase: PhaseFeeTable {
                pre_judicial: 0,
                judicial: 25_000,
                execution: 50_000,
            },
        }
    }
}

#[derive(Debug, Clone, Copy)]
pub struct PhaseFeeTable {
    pub pre_judicial: i64,
    pub judicial: i64,
    pub execution: i64,
}

impl PhaseFeeTable {
    pub const fn fee_for(&self, phase: CasePhase) -> i64 {
        match phase {
            CasePhase::PreJudicial => self.pre_judicial,
            CasePhase::Judicial => self.judicial,
            CasePhase::Execution => self.execution,
            CasePhase::Closed => 0,
        }
    }
}

/// Breakpoints for the priority/risk classifier, in minor units. Breakpoints
/// must be strictly ascending so the classification stays monotonic.
#[derive(Debug, Clone)]
pub struct ClassifierConfig {
    pub medium_amount: i64,
    pub high_amount: i64,
    pub urgent_amount: i64,
    pub sla_days: i64,
}

impl ClassifierConfig {
    fn validate(&self) -> Result<(), ConfigError> {
        if !(self.medium_amount < self.high_amount && self.high_amount < self.urgent_amount) {
            return Err(ConfigError::InvalidThreshold {
                name: "amount breakpoints",
                reason: "must be strictly ascending (medium < high < urgent)",
            });
        }
        if self.sla_days <= 0 {
            return Err(ConfigError::InvalidThreshold {
                name: "LEGAL_SLA_DAYS",
                reason: "SLA must be a positive day count",
            });
        }
        Ok(())
    }
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            medium_amount: 500_000,
            high_amount: 1_000_000,
            urgent_amount: 3_000_000,
            sla_days: 30,
        }
    }
}

/// Grace periods, in days, between entering a status and its deadline.
#[derive(Debug, Clone)]
pub struct DeadlineConfig {
    pub notice_days: i64,
    pub response_days: i64,
    pub filing_days: i64,
    pub court_days: i64,
    pub judgment_days: i64,
    pub execution_days: i64,
    pub collection_days: i64,
}

impl Default for DeadlineConfig {
    fn default() -> Self {
        Self {
            notice_days: 10,
            response_days: 15,
            filing_days: 10,
            court_days: 30,
            judgment_days: 15,
            execution_days: 30,
            collection_days: 30,
        }
    }
}

/// Escalation sweep controls.
#[derive(Debug, Clone)]
pub struct SweepConfig {
    pub workers: usize,
}

impl Default for SweepConfig {
    fn default() -> Self {
        Self { workers: 4 }
    }
}

/// Tracing controls.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    pub log_level: String,
}

#[derive(Debug)]
pub enum ConfigError {
    InvalidNumber { name: &'static str, value: String },
    InvalidThreshold { name: &'static str, reason: &'static str },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidNumber { name, value } => {
                write!(f, "{name} must be a valid number, got '{value}'")
            }
            ConfigError::InvalidThreshold { name, reason } => {
                write!(f, "invalid {name}: {reason}")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

fn read_u32(name: &'static str, default: u32) -> Result<u32, ConfigError> {
    read_parsed(name, default)
}

fn read_i64(name: &'static str, default: i64) -> Result<i64, ConfigError> {
    read_parsed(name, default)
}

fn read_usize(name: &'static str, default: usize) -> Result<usize, ConfigError> {
    read_parsed(name, default)
}

fn read_bool(name: &'static str, default: bool) -> Result<bool, ConfigError> {
    match env::var(name) {
        Ok(value) => match value.trim().to_ascii_lowercase().as_str() {
            "1" | "true" | "yes" => Ok(true),
            "0" | "false" | "no" => Ok(false),
            _ => Err(ConfigError::InvalidNumber { name, value }),
        },
        Err(_) => Ok(default),
    }
}

fn read_parsed<T: std::str::FromStr>(name: &'static str, default: T) -> Result<T, ConfigError> {
    match env::var(name) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map_err(|_| ConfigError::InvalidNumber { name, value }),
        Err(_) => Ok(default),
    }
}
