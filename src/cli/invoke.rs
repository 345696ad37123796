//! Runs a parsed command against the configured MaxKB instance

use tracing::info;

use super::{Cli, Command};
use crate::api::{knowledge_base_search_prompt, KnowledgeBaseTools};
use crate::config::AppConfig;
use crate::infrastructure::logging;
use crate::infrastructure::maxkb::MaxKbClient;

/// Run one command and print its JSON result to stdout
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let mut config = AppConfig::load()?;
    apply_overrides(&mut config, &cli);
    logging::init_logging(&(&config.logging).into());

    let Some((name, arguments)) = cli.command.tool_call()? else {
        if let Command::Prompt {
            knowledge_base_name,
            query,
        } = &cli.command
        {
            println!("{}", knowledge_base_search_prompt(query, knowledge_base_name));
        }
        return Ok(());
    };

    let client = MaxKbClient::from_config(&config.maxkb)?;
    let output = KnowledgeBaseTools::new(&client).call(&name, arguments).await;
    client.close();
    info!(tool = %name, "Command complete");

    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}

fn apply_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(version) = cli.api_version {
        config.maxkb.api_version = version;
    }
    if let Some(workspace_id) = &cli.workspace_id {
        config.maxkb.workspace_id = workspace_id.clone();
    }
}
