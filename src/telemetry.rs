use crate::error::TelemetryError;
use opentelemetry::global;
use opentelemetry_sdk::metrics::MeterProvider;
use tracing::info;

pub struct TelemetryConfig {
    pub enable_metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            enable_metrics: true,
        }
    }
}

pub struct TelemetryService {
    config: TelemetryConfig,
}

impl TelemetryService {
    pub fn new(config: TelemetryConfig) -> Result<Self, TelemetryError> {
        if config.enable_metrics {
            // Default SDK meter provider for push-based collection.
            let provider = MeterProvider::builder().build();
            global::set_meter_provider(provider);
        }

        Ok(Self { config })
    }

    pub fn initialize(&self) -> Result<(), TelemetryError> {
        if !self.config.enable_metrics {
            info!("Metrics collection disabled");
            return Ok(());
        }

        crate::metrics::Metrics::init();
        info!("OpenTelemetry metrics initialized");
        Ok(())
    }
}

// Convenience function to initialize telemetry with default configuration
pub fn init_telemetry() -> Result<TelemetryService, TelemetryError> {
    let service = TelemetryService::new(TelemetryConfig::default())?;
    service.initialize()?;
    Ok(service)
}
