//! Command dispatch: bridges CLI args -> gateway calls -> output formatting.

pub mod config_cmd;
pub mod nodes;
pub mod status;
pub mod sync;

use secrecy::SecretString;
use tokio::sync::broadcast::Receiver;

use rua_core::{Gateway, GatewayConfig, Notification};

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;
use crate::output;

/// Dispatch a backend-bound command to its handler, then flush any
/// notifications the gateway raised along the way.
pub async fn dispatch(cmd: Command, gateway: &Gateway, global: &GlobalOpts) -> Result<(), CliError> {
    let mut notes = gateway.notifications();
    let result = match cmd {
        Command::Status => status::handle(gateway, global).await,
        Command::Nodes(args) => nodes::list(gateway, &args, global).await,
        Command::Select { node_id } => nodes::select(gateway, &node_id, global).await,
        Command::Probe { node_id } => nodes::probe(gateway, &node_id, global).await,
        Command::SocksPort { port } => sync::socks_port(gateway, port).await,
        Command::Reload { target } => sync::reload(gateway, target).await,
        Command::Push(args) => sync::push(gateway, args).await,
        Command::Config(args) => config_cmd::handle(args, global),
    };
    flush_notifications(&mut notes, global);
    result
}

fn flush_notifications(notes: &mut Receiver<Notification>, global: &GlobalOpts) {
    let color = output::should_color(global.color);
    while let Ok(note) = notes.try_recv() {
        output::print_notification(&note, color);
    }
}

/// Build a `GatewayConfig` from the config file, profile, and CLI overrides.
pub fn build_gateway_config(global: &GlobalOpts) -> Result<GatewayConfig, CliError> {
    let cfg = rua_config::load_config_or_default();

    let (_, mut profile) =
        rua_config::resolve_profile(&cfg, global.profile.as_deref()).map_err(|e| match e {
            rua_config::ConfigError::UnknownProfile { name } => CliError::ProfileNotFound {
                name,
                available: available_profiles(&cfg),
            },
            other => other.into(),
        })?;

    if let Some(ref url) = global.url {
        profile.url.clone_from(url);
    }

    let mut config = rua_config::profile_to_gateway_config(&profile, &cfg.defaults)?;
    if let Some(ref token) = global.token {
        config.token = Some(SecretString::from(token.clone()));
    }
    Ok(config)
}

fn available_profiles(cfg: &rua_config::Config) -> String {
    if cfg.profiles.is_empty() {
        return "(none)".into();
    }
    cfg.profiles.keys().cloned().collect::<Vec<_>>().join(", ")
}
