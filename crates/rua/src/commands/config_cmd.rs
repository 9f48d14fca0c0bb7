//! `rua config`: inspect and write the profile file. No backend needed.

use rua_config::Config;

use crate::cli::{ConfigArgs, ConfigCommand, GlobalOpts};
use crate::error::CliError;
use crate::output;

pub fn handle(args: ConfigArgs, global: &GlobalOpts) -> Result<(), CliError> {
    match args.command {
        ConfigCommand::Path => {
            output::print_output(&rua_config::config_path().display().to_string());
            Ok(())
        }
        ConfigCommand::Show => {
            let cfg = redacted(rua_config::load_config()?);
            let out = match global.output {
                crate::cli::OutputFormat::Json => output::render_json(&cfg)?,
                _ => toml_string(&cfg)?,
            };
            output::print_output(&out);
            Ok(())
        }
        ConfigCommand::Init {
            name,
            url,
            make_default,
        } => {
            let parsed: url::Url = url.parse().map_err(|_| CliError::Validation {
                field: "url".into(),
                reason: format!("invalid URL: {url}"),
            })?;

            let mut cfg = rua_config::load_config_or_default();
            let profile = cfg.profiles.entry(name.clone()).or_default();
            profile.url = parsed.to_string();
            if make_default || cfg.profiles.len() == 1 {
                cfg.default_profile = Some(name.clone());
            }

            let path = rua_config::save_config(&cfg)?;
            output::print_output(&format!("profile '{name}' written to {}", path.display()));
            Ok(())
        }
    }
}

fn redacted(mut cfg: Config) -> Config {
    for profile in cfg.profiles.values_mut() {
        if profile.token.is_some() {
            profile.token = Some("********".into());
        }
    }
    cfg
}

fn toml_string(cfg: &Config) -> Result<String, CliError> {
    toml::to_string_pretty(cfg).map_err(|e| CliError::Config(e.into()))
}
