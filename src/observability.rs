use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("devchat.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("devchat.client.request_errors");
pub(crate) static CLIENT_REQUEST_RETRIES: Counter = Counter::new("devchat.client.retries");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("devchat.client.request_duration_seconds");

pub(crate) static PROBE_REQUESTS: Counter = Counter::new("devchat.probe.requests");
pub(crate) static PROBE_FAILURES: Counter = Counter::new("devchat.probe.failures");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_counter(&CLIENT_REQUEST_RETRIES);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&PROBE_REQUESTS);
    collector.register_counter(&PROBE_FAILURES);
}
