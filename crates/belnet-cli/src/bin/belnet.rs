//! belnet CLI - run exact-inference queries against the classic example
//! networks.
//!
//! Usage:
//!   belnet <network>                        # run the network's default query
//!   belnet <network> -q "cloudy|grass_wet"  # override the query
//!   belnet <network> -o json                # output the result as JSON
//!   belnet --list-networks
//!
//! Query syntax: `targets[|observations]`, comma-separated event labels,
//! `~label` for negation. Example: `burglary|john_calls,~mary_calls`.

use clap::Parser;
use serde::Serialize;
use std::process;

use belnet_core::{for_event, BeliefNetwork, ModelError, Term};

#[derive(Parser)]
#[command(name = "belnet")]
#[command(version)]
#[command(about = "belnet - exact Bayesian network inference CLI")]
#[command(long_about = "Build one of the bundled example networks and answer \
probability queries over it by exact enumeration")]
struct Cli {
    /// Example network to load: sprinkler, alarm, or chain
    #[arg(value_name = "NETWORK", required_unless_present = "list_networks")]
    network: Option<String>,

    /// Query to evaluate, e.g. "cloudy|grass_wet" or "~d,c"
    #[arg(short, long, value_name = "QUERY")]
    query: Option<String>,

    /// Output format: summary or json
    #[arg(short, long, default_value = "summary", value_name = "FORMAT")]
    output: String,

    /// List available example networks
    #[arg(short, long)]
    list_networks: bool,
}

/// Name, builder, and default query of one bundled network.
struct Example {
    name: &'static str,
    build: fn() -> Result<BeliefNetwork, ModelError>,
    default_query: &'static str,
}

const EXAMPLES: &[Example] = &[
    Example {
        name: "sprinkler",
        build: sprinkler_network,
        default_query: "cloudy|grass_wet",
    },
    Example {
        name: "alarm",
        build: alarm_network,
        default_query: "burglary|john_calls,~mary_calls",
    },
    Example {
        name: "chain",
        build: chain_network,
        default_query: "~d,c",
    },
];

#[derive(Serialize)]
struct QueryResult<'a> {
    network: &'a str,
    query: String,
    value: f64,
}

fn main() {
    let cli = Cli::parse();

    if cli.list_networks {
        println!("Available networks:");
        for example in EXAMPLES {
            println!("  - {} (default query: {})", example.name, example.default_query);
        }
        return;
    }

    let name = cli.network.as_deref().unwrap_or_default();
    let example = match EXAMPLES.iter().find(|e| e.name == name) {
        Some(e) => e,
        None => {
            eprintln!(
                "Unknown network '{}'. Run with --list-networks to see the options.",
                name
            );
            process::exit(1);
        }
    };

    let net = match (example.build)() {
        Ok(net) => net,
        Err(e) => {
            eprintln!("Error building network '{}': {}", example.name, e);
            process::exit(1);
        }
    };

    let query_src = cli.query.as_deref().unwrap_or(example.default_query);
    let (targets, observations) = match parse_query(&net, query_src) {
        Ok(parsed) => parsed,
        Err(e) => {
            eprintln!("Invalid query '{}': {}", query_src, e);
            process::exit(1);
        }
    };

    let value = match net.conditional_probability(&targets, &observations) {
        Ok(value) => value,
        Err(e) => {
            eprintln!("Error evaluating query '{}': {}", query_src, e);
            process::exit(1);
        }
    };

    let rendered = render_query(&net, &targets, &observations);
    match cli.output.as_str() {
        "json" => {
            let result = QueryResult {
                network: example.name,
                query: rendered,
                value,
            };
            match serde_json::to_string_pretty(&result) {
                Ok(json) => println!("{}", json),
                Err(e) => {
                    eprintln!("Error serializing to JSON: {}", e);
                    process::exit(1);
                }
            }
        }
        _ => {
            println!("{} = {:.6}", rendered, value);
        }
    }
}

/// Parses `targets[|observations]` into term lists against `net`'s labels.
fn parse_query(net: &BeliefNetwork, src: &str) -> Result<(Vec<Term>, Vec<Term>), String> {
    let (target_src, obs_src) = match src.split_once('|') {
        Some((t, o)) => (t, Some(o)),
        None => (src, None),
    };

    let targets = parse_terms(net, target_src)?;
    if targets.is_empty() {
        return Err("no target events".into());
    }
    let observations = match obs_src {
        Some(o) => parse_terms(net, o)?,
        None => Vec::new(),
    };
    Ok((targets, observations))
}

fn parse_terms(net: &BeliefNetwork, src: &str) -> Result<Vec<Term>, String> {
    let mut terms = Vec::new();
    for token in src.split(',') {
        let token = token.trim();
        if token.is_empty() {
            continue;
        }
        let (label, negated) = match token.strip_prefix('~') {
            Some(rest) => (rest.trim(), true),
            None => (token, false),
        };
        let term = net
            .find_event(label)
            .ok_or_else(|| format!("no event labeled '{}'", label))?;
        terms.push(if negated { !term } else { term });
    }
    Ok(terms)
}

/// Formats the parsed query back as `P(targets | observations)`.
fn render_query(net: &BeliefNetwork, targets: &[Term], observations: &[Term]) -> String {
    let label = |term: &Term| {
        let name = net
            .event(term.event)
            .map(|e| e.label.clone())
            .unwrap_or_else(|| "?".into());
        if term.asserted {
            name
        } else {
            format!("~{}", name)
        }
    };

    let targets: Vec<String> = targets.iter().map(label).collect();
    if observations.is_empty() {
        format!("P({})", targets.join(", "))
    } else {
        let observations: Vec<String> = observations.iter().map(label).collect();
        format!("P({} | {})", targets.join(", "), observations.join(", "))
    }
}

/// cloudy -> {rain, sprinkler} -> grass_wet.
fn sprinkler_network() -> Result<BeliefNetwork, ModelError> {
    let mut net = BeliefNetwork::default();
    let cloudy = net.add_event("cloudy");
    let rain = net.add_event("rain");
    let sprinkler = net.add_event("sprinkler");
    let grass_wet = net.add_event("grass_wet");

    net.commit([
        for_event(cloudy).assign(0.4)?,
        for_event(rain)
            .given([cloudy])
            .assign(0.5)?
            .given([!cloudy])?
            .assign(0.0)?
            .build(),
        for_event(sprinkler)
            .given([cloudy])
            .assign(0.01)?
            .given([!cloudy])?
            .assign(0.4)?
            .build(),
        for_event(grass_wet)
            .given([rain, sprinkler])
            .assign(0.99)?
            .given([rain, !sprinkler])?
            .assign(0.8)?
            .given([!rain, sprinkler])?
            .assign(0.9)?
            .given([!rain, !sprinkler])?
            .assign(0.0)?
            .build(),
    ])?;

    Ok(net)
}

/// {burglary, earthquake} -> alarm -> {john_calls, mary_calls}.
fn alarm_network() -> Result<BeliefNetwork, ModelError> {
    let mut net = BeliefNetwork::default();
    let burglary = net.add_event("burglary");
    let earthquake = net.add_event("earthquake");
    let alarm = net.add_event("alarm");
    let john_calls = net.add_event("john_calls");
    let mary_calls = net.add_event("mary_calls");

    net.commit([
        for_event(burglary).assign(0.001)?,
        for_event(earthquake).assign(0.001)?,
        for_event(alarm)
            .given([burglary, earthquake])
            .assign(0.95)?
            .given([burglary, !earthquake])?
            .assign(0.94)?
            .given([!burglary, earthquake])?
            .assign(0.29)?
            .given([!burglary, !earthquake])?
            .assign(0.001)?
            .build(),
        for_event(john_calls)
            .given([alarm])
            .assign(0.9)?
            .given([!alarm])?
            .assign(0.05)?
            .build(),
        for_event(mary_calls)
            .given([alarm])
            .assign(0.7)?
            .given([!alarm])?
            .assign(0.01)?
            .build(),
    ])?;

    Ok(net)
}

/// {a, b} feed c, d and e.
fn chain_network() -> Result<BeliefNetwork, ModelError> {
    let mut net = BeliefNetwork::default();
    let a = net.add_event("a");
    let b = net.add_event("b");
    let c = net.add_event("c");
    let d = net.add_event("d");
    let e = net.add_event("e");

    net.commit([
        for_event(a).assign(0.3)?,
        for_event(b).assign(0.6)?,
        for_event(c)
            .given([a])
            .assign(0.8)?
            .given([!a])?
            .assign(0.4)?
            .build(),
        for_event(d)
            .given([a, b])
            .assign(0.7)?
            .given([a, !b])?
            .assign(0.8)?
            .given([!a, b])?
            .assign(0.1)?
            .given([!a, !b])?
            .assign(0.2)?
            .build(),
        for_event(e)
            .given([c])
            .assign(0.7)?
            .given([!c])?
            .assign(0.2)?
            .build(),
    ])?;

    Ok(net)
}
