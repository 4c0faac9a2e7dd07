//! Events Command - List ledger events

use clap::Args;
use serde_json::json;
use soulsign_registry::RegistryEvent;

use super::Context;

/// List registration and delegation events
#[derive(Args)]
pub struct EventsCommand {
    /// First sequence number to show
    #[arg(long, default_value_t = 0)]
    from: u64,

    /// Print JSON
    #[arg(long)]
    json: bool,
}

impl EventsCommand {
    pub fn execute(self, ctx: Context) -> anyhow::Result<()> {
        let node = ctx.open_node()?;
        let events = node.events_since(self.from);

        if self.json {
            let output: Vec<_> = events
                .iter()
                .map(|record| {
                    let topics: Vec<String> = record
                        .to_log()
                        .topics
                        .iter()
                        .map(|t| format!("0x{}", hex::encode(t)))
                        .collect();
                    match &record.event {
                        RegistryEvent::BirthRegistered { identity } => json!({
                            "sequence": record.sequence,
                            "event": "BirthRegistered",
                            "identity": identity.to_hex(),
                            "topics": topics,
                        }),
                        RegistryEvent::ViewerAllowed { owner, viewer } => json!({
                            "sequence": record.sequence,
                            "event": "ViewerAllowed",
                            "owner": owner.to_hex(),
                            "viewer": viewer.to_hex(),
                            "topics": topics,
                        }),
                    }
                })
                .collect();
            println!("{}", serde_json::to_string_pretty(&output)?);
            return Ok(());
        }

        if events.is_empty() {
            println!("No events");
        }
        for record in events {
            match record.event {
                RegistryEvent::BirthRegistered { identity } => {
                    println!("#{:<6} BirthRegistered  {}", record.sequence, identity)
                }
                RegistryEvent::ViewerAllowed { owner, viewer } => {
                    println!("#{:<6} ViewerAllowed    {} -> {}", record.sequence, owner, viewer)
                }
            }
        }
        Ok(())
    }
}
