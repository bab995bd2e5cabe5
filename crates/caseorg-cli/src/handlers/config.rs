use crate::args::ConfigCommand;
use crate::context::Overrides;
use crate::output::{self, Painter};
use crate::types::OutputFormat;
use anyhow::Result;
use caseorg_core::Config;
use std::path::Path;

pub fn handle(
    data_dir: &Path,
    overrides: &Overrides,
    command: ConfigCommand,
    format: OutputFormat,
) -> Result<()> {
    let config_path = Config::path_in(data_dir);
    match command {
        ConfigCommand::Show => {
            let mut config = Config::load_from(&config_path)?;
            overrides.apply(&mut config);
            match format {
                OutputFormat::Json => output::print_json(&config),
                OutputFormat::Plain => {
                    print!("{}", toml::to_string_pretty(&config)?);
                    Ok(())
                }
            }
        }
        ConfigCommand::Init => {
            let painter = Painter::detect();
            if config_path.exists() {
                println!(
                    "{} {}",
                    painter.dim("Config already exists:"),
                    config_path.display()
                );
                return Ok(());
            }
            Config::default().save_to(&config_path)?;
            println!("{} {}", painter.ok("Wrote"), config_path.display());
            Ok(())
        }
    }
}
