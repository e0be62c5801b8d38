/// provider of the current live delay factor.
///
/// implementations own their own timeouts and retries. a source that cannot be
/// reached must report 0.0 instead of failing so that callers never need a
/// failure branch.
pub trait TrafficSignal: Send + Sync {
    /// live delay factor in [0, 1]
    fn get_live_delay(&self) -> f64;
}

/// signal for deployments without a live source.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLiveTraffic;

impl TrafficSignal for NoLiveTraffic {
    fn get_live_delay(&self) -> f64 {
        0.0
    }
}

/// signal that always reports the same delay.
#[derive(Debug, Clone, Copy)]
pub struct FixedTrafficSignal(pub f64);

impl TrafficSignal for FixedTrafficSignal {
    fn get_live_delay(&self) -> f64 {
        self.0
    }
}

/// reads a signal and forces the result into [0, 1]. non-finite values read as 0.0.
pub fn live_delay_or_zero(signal: &dyn TrafficSignal) -> f64 {
    let delay = signal.get_live_delay();
    if delay.is_finite() {
        delay.clamp(0.0, 1.0)
    } else {
        log::warn!("live traffic signal reported non-finite delay {delay}, using 0.0");
        0.0
    }
}
