use portico_config::PorticoConfig;
use portico_gate::RoutingPolicy;
use serde::Serialize;

#[derive(Debug, Serialize)]
struct Classification<'a> {
    path: &'a str,
    class: portico_gate::RouteClass,
    static_asset: bool,
    onboarding: bool,
}

pub fn handle(config: &PorticoConfig, path: &str) -> anyhow::Result<()> {
    let policy = RoutingPolicy::from_config(&config.gate);
    let report = Classification {
        path,
        class: policy.classify(path),
        static_asset: policy.is_static_asset(path),
        onboarding: path == config.gate.onboarding_path,
    };
    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
