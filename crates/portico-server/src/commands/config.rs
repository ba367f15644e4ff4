use portico_config::PorticoConfig;

pub fn handle(config: &PorticoConfig) -> anyhow::Result<()> {
    print!("{}", toml::to_string_pretty(&config.redacted())?);
    Ok(())
}
