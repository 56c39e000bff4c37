//! Shared fixtures for the belnet integration tests: the classic example
//! networks and a tolerance assertion helper.

use belnet_core::{for_event, BeliefNetwork, Term};

/// Asserts `actual` is within `tol` of `expected`, with a labeled failure.
pub fn assert_close(actual: f64, expected: f64, tol: f64, label: &str) {
    assert!(
        (actual - expected).abs() <= tol,
        "{} mismatch: expected {:.15}, got {:.15}, diff={:.3e}",
        label,
        expected,
        actual,
        (actual - expected).abs()
    );
}

/// Events of the sprinkler network, in creation order.
pub struct Sprinkler {
    pub cloudy: Term,
    pub rain: Term,
    pub sprinkler: Term,
    pub grass_wet: Term,
}

/// cloudy -> {rain, sprinkler} -> grass_wet.
///
/// P(cloudy)=0.4; P(rain|cloudy)=0.5, P(rain|~cloudy)=0.0;
/// P(sprinkler|cloudy)=0.01, P(sprinkler|~cloudy)=0.4;
/// P(grass_wet|rain,sprinkler)=0.99, 0.8, 0.9, 0.0 for the other rows.
pub fn sprinkler_network() -> (BeliefNetwork, Sprinkler) {
    let mut net = BeliefNetwork::default();
    let cloudy = net.add_event("cloudy");
    let rain = net.add_event("rain");
    let sprinkler = net.add_event("sprinkler");
    let grass_wet = net.add_event("grass_wet");

    net.commit([
        for_event(cloudy).assign(0.4).unwrap(),
        for_event(rain)
            .given([cloudy])
            .assign(0.5)
            .unwrap()
            .given([!cloudy])
            .unwrap()
            .assign(0.0)
            .unwrap()
            .build(),
        for_event(sprinkler)
            .given([cloudy])
            .assign(0.01)
            .unwrap()
            .given([!cloudy])
            .unwrap()
            .assign(0.4)
            .unwrap()
            .build(),
        for_event(grass_wet)
            .given([rain, sprinkler])
            .assign(0.99)
            .unwrap()
            .given([rain, !sprinkler])
            .unwrap()
            .assign(0.8)
            .unwrap()
            .given([!rain, sprinkler])
            .unwrap()
            .assign(0.9)
            .unwrap()
            .given([!rain, !sprinkler])
            .unwrap()
            .assign(0.0)
            .unwrap()
            .build(),
    ])
    .expect("sprinkler network commits");

    (
        net,
        Sprinkler {
            cloudy,
            rain,
            sprinkler,
            grass_wet,
        },
    )
}

/// Events of the alarm network, in creation order.
pub struct Alarm {
    pub burglary: Term,
    pub earthquake: Term,
    pub alarm: Term,
    pub john_calls: Term,
    pub mary_calls: Term,
}

/// {burglary, earthquake} -> alarm -> {john_calls, mary_calls}.
pub fn alarm_network() -> (BeliefNetwork, Alarm) {
    let mut net = BeliefNetwork::default();
    let burglary = net.add_event("burglary");
    let earthquake = net.add_event("earthquake");
    let alarm = net.add_event("alarm");
    let john_calls = net.add_event("john_calls");
    let mary_calls = net.add_event("mary_calls");

    net.commit([
        for_event(burglary).assign(0.001).unwrap(),
        for_event(earthquake).assign(0.001).unwrap(),
        for_event(alarm)
            .given([burglary, earthquake])
            .assign(0.95)
            .unwrap()
            .given([burglary, !earthquake])
            .unwrap()
            .assign(0.94)
            .unwrap()
            .given([!burglary, earthquake])
            .unwrap()
            .assign(0.29)
            .unwrap()
            .given([!burglary, !earthquake])
            .unwrap()
            .assign(0.001)
            .unwrap()
            .build(),
        for_event(john_calls)
            .given([alarm])
            .assign(0.9)
            .unwrap()
            .given([!alarm])
            .unwrap()
            .assign(0.05)
            .unwrap()
            .build(),
        for_event(mary_calls)
            .given([alarm])
            .assign(0.7)
            .unwrap()
            .given([!alarm])
            .unwrap()
            .assign(0.01)
            .unwrap()
            .build(),
    ])
    .expect("alarm network commits");

    (
        net,
        Alarm {
            burglary,
            earthquake,
            alarm,
            john_calls,
            mary_calls,
        },
    )
}

/// Events of the five-event chain network, in creation order.
pub struct Chain {
    pub a: Term,
    pub b: Term,
    pub c: Term,
    pub d: Term,
    pub e: Term,
}

/// {a, b} feed c, d and e: P(a)=0.3, P(b)=0.6, P(c|a)=0.8, P(c|~a)=0.4,
/// P(d|a,b)=0.7/0.8/0.1/0.2, P(e|c)=0.7, P(e|~c)=0.2.
pub fn chain_network() -> (BeliefNetwork, Chain) {
    let mut net = BeliefNetwork::default();
    let a = net.add_event("a");
    let b = net.add_event("b");
    let c = net.add_event("c");
    let d = net.add_event("d");
    let e = net.add_event("e");

    net.commit([
        for_event(a).assign(0.3).unwrap(),
        for_event(b).assign(0.6).unwrap(),
        for_event(c)
            .given([a])
            .assign(0.8)
            .unwrap()
            .given([!a])
            .unwrap()
            .assign(0.4)
            .unwrap()
            .build(),
        for_event(d)
            .given([a, b])
            .assign(0.7)
            .unwrap()
            .given([a, !b])
            .unwrap()
            .assign(0.8)
            .unwrap()
            .given([!a, b])
            .unwrap()
            .assign(0.1)
            .unwrap()
            .given([!a, !b])
            .unwrap()
            .assign(0.2)
            .unwrap()
            .build(),
        for_event(e)
            .given([c])
            .assign(0.7)
            .unwrap()
            .given([!c])
            .unwrap()
            .assign(0.2)
            .unwrap()
            .build(),
    ])
    .expect("chain network commits");

    (net, Chain { a, b, c, d, e })
}
