use super::Action;
use crate::client::Client;
use anyhow::{Context, Result};

/// Execute the action's business logic by delegating to the grabbing client
pub async fn execute(action: Action) -> Result<()> {
    match action {
        Action::Grab {
            host,
            port,
            options,
        } => {
            let client = Client::new(&options)?;
            let response = client
                .connect(&host, &port)
                .await
                .with_context(|| format!("failed to grab {host}:{port}"))?;

            println!("{}", serde_json::to_string_pretty(&response)?);
            Ok(())
        }
    }
}
