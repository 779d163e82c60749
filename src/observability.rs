use biometrics::{Collector, Counter, Moments};

pub(crate) static CLIENT_REQUESTS: Counter = Counter::new("reframe.client.requests");
pub(crate) static CLIENT_REQUEST_ERRORS: Counter = Counter::new("reframe.client.request_errors");
pub(crate) static CLIENT_REQUEST_DURATION: Moments =
    Moments::new("reframe.client.request_duration_seconds");

pub(crate) static SESSION_TURNS: Counter = Counter::new("reframe.session.turns");
pub(crate) static SESSION_TURN_FAILURES: Counter = Counter::new("reframe.session.turn_failures");

pub(crate) static WEB_SESSIONS: Counter = Counter::new("reframe.web.sessions");
pub(crate) static WEB_SESSIONS_EVICTED: Counter = Counter::new("reframe.web.sessions_evicted");

pub(crate) static CONFIG_HALTS: Counter = Counter::new("reframe.config.halts");

/// Register this crate's biometrics with the provided collector.
pub fn register_biometrics(collector: Collector) {
    collector.register_counter(&CLIENT_REQUESTS);
    collector.register_counter(&CLIENT_REQUEST_ERRORS);
    collector.register_moments(&CLIENT_REQUEST_DURATION);

    collector.register_counter(&SESSION_TURNS);
    collector.register_counter(&SESSION_TURN_FAILURES);

    collector.register_counter(&WEB_SESSIONS);
    collector.register_counter(&WEB_SESSIONS_EVICTED);

    collector.register_counter(&CONFIG_HALTS);
}
