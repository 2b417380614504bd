//! Printer capability provider
//!
//! The host owns the actual printer connection. The engine only asks a few
//! questions through this trait and substitutes documented defaults whenever
//! a query fails, so a broken driver never takes down a reflow.

use crate::types::PaperSize;

/// Host-side capability lookup. Any error is treated as "use the fallback".
pub trait PrinterCapabilityProvider: Send + Sync {
    /// Paper size the device selects by default
    fn default_paper(&self) -> anyhow::Result<PaperSize>;

    /// Smallest margin the device can honor, in points
    fn minimum_margin(&self) -> anyhow::Result<f32>;

    /// Whether the device can print both sheet faces on one leaf
    fn supports_duplex(&self) -> anyhow::Result<bool>;

    /// Whether the device can produce color output
    fn supports_color(&self) -> anyhow::Result<bool>;
}

/// Provider for hosts without a live printer. Always succeeds with defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullCapabilities;

impl PrinterCapabilityProvider for NullCapabilities {
    fn default_paper(&self) -> anyhow::Result<PaperSize> {
        Ok(PaperSize::A4)
    }

    fn minimum_margin(&self) -> anyhow::Result<f32> {
        Ok(0.0)
    }

    fn supports_duplex(&self) -> anyhow::Result<bool> {
        Ok(false)
    }

    fn supports_color(&self) -> anyhow::Result<bool> {
        Ok(true)
    }
}

/// Default paper, falling back to ISO A4 on query failure
pub fn paper_or_default(provider: &dyn PrinterCapabilityProvider) -> PaperSize {
    match provider.default_paper() {
        Ok(size) => size,
        Err(e) => {
            log::warn!("Paper size query failed, falling back to A4: {e:#}");
            PaperSize::A4
        }
    }
}

/// Minimum printable margin, falling back to zero on query failure
pub fn margin_floor(provider: &dyn PrinterCapabilityProvider) -> f32 {
    match provider.minimum_margin() {
        Ok(margin) => margin,
        Err(e) => {
            log::warn!("Minimum margin query failed, falling back to 0: {e:#}");
            0.0
        }
    }
}

/// Duplex support, falling back to single-sided on query failure
pub fn duplex_available(provider: &dyn PrinterCapabilityProvider) -> bool {
    match provider.supports_duplex() {
        Ok(supported) => supported,
        Err(e) => {
            log::warn!("Duplex query failed, assuming single-sided: {e:#}");
            false
        }
    }
}

/// Color support, falling back to color-capable on query failure
pub fn color_available(provider: &dyn PrinterCapabilityProvider) -> bool {
    match provider.supports_color() {
        Ok(supported) => supported,
        Err(e) => {
            log::warn!("Color query failed, assuming color capable: {e:#}");
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::anyhow;

    struct BrokenProvider;

    impl PrinterCapabilityProvider for BrokenProvider {
        fn default_paper(&self) -> anyhow::Result<PaperSize> {
            Err(anyhow!("driver offline"))
        }

        fn minimum_margin(&self) -> anyhow::Result<f32> {
            Err(anyhow!("driver offline"))
        }

        fn supports_duplex(&self) -> anyhow::Result<bool> {
            Err(anyhow!("driver offline"))
        }

        fn supports_color(&self) -> anyhow::Result<bool> {
            Err(anyhow!("driver offline"))
        }
    }

    #[test]
    fn test_failed_queries_fall_back_to_defaults() {
        let provider = BrokenProvider;
        assert_eq!(paper_or_default(&provider), PaperSize::A4);
        assert_eq!(margin_floor(&provider), 0.0);
        assert!(!duplex_available(&provider));
        assert!(color_available(&provider));
    }

    #[test]
    fn test_null_provider_defaults() {
        let provider = NullCapabilities;
        assert_eq!(paper_or_default(&provider), PaperSize::A4);
        assert_eq!(margin_floor(&provider), 0.0);
    }
}
