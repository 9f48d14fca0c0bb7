//! `rua reload`, `rua push`, `rua socks-port`.

use std::sync::Arc;

use serde::Serialize;

use rua_core::{CoreConfig, DocumentKind, Gateway, RConfig};

use crate::cli::{PushArgs, ReloadTarget};
use crate::error::CliError;
use crate::output;

/// Both documents, shaped the way the backend groups them.
#[derive(Serialize)]
struct Documents {
    rua: Arc<RConfig>,
    core: Option<Arc<CoreConfig>>,
}

pub async fn reload(gateway: &Gateway, target: ReloadTarget) -> Result<(), CliError> {
    let store = gateway.store();
    let out = match target {
        ReloadTarget::Core => {
            gateway.reload(DocumentKind::Core).await?;
            output::render_json(&store.core_config())?
        }
        ReloadTarget::Runtime => {
            gateway.reload(DocumentKind::Runtime).await?;
            output::render_json(&*store.runtime_config())?
        }
        ReloadTarget::All => {
            gateway.reload_all().await?;
            output::render_json(&Documents {
                rua: store.runtime_config(),
                core: store.core_config(),
            })?
        }
    };
    output::print_output(&out);
    Ok(())
}

pub async fn push(gateway: &Gateway, args: PushArgs) -> Result<(), CliError> {
    let kind = DocumentKind::from(args.document);
    match args.file {
        Some(path) => {
            let raw = std::fs::read_to_string(&path)?;
            match kind {
                DocumentKind::Core => {
                    let doc: CoreConfig = serde_json::from_str(&raw)?;
                    gateway.store().replace_core_config(doc);
                }
                DocumentKind::Runtime => {
                    let doc: RConfig = serde_json::from_str(&raw)?;
                    gateway.store().replace_runtime_config(doc);
                }
            }
        }
        None => gateway.reload(kind).await?,
    }

    gateway.push(kind).await?;
    Ok(())
}

pub async fn socks_port(gateway: &Gateway, port: u16) -> Result<(), CliError> {
    if port == 0 {
        return Err(CliError::Validation {
            field: "port".into(),
            reason: "must be between 1 and 65535".into(),
        });
    }

    gateway.reload(DocumentKind::Core).await?;
    gateway.store().mutate_socks_inbound(|inbound| inbound.port = port)?;
    gateway.push(DocumentKind::Core).await?;

    if let Some(proxy) = gateway
        .store()
        .core_config()
        .as_deref()
        .and_then(CoreConfig::socks_inbound)
        .map(rua_core::Inbound::proxy_url)
    {
        output::print_output(&format!("socks inbound now at {proxy}"));
    }
    Ok(())
}
