//! `eddy models`

use crate::config::Cli;

pub fn run(cli: &Cli, key: Option<&str>) -> anyhow::Result<()> {
    let registry = cli.registry()?;

    if let Some(key) = key {
        let model = registry.get(key)?;
        println!("{}", serde_json::to_string_pretty(model.as_ref())?);
        return Ok(());
    }

    for model in registry.list() {
        println!(
            "{:<20} {} ({} parameters)",
            model.key,
            model.name,
            model.parameters.len()
        );
    }
    Ok(())
}
