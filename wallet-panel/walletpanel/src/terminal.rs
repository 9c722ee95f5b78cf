use hyperware_process_lib::logging::{error, info};

use crate::structs::{describe_wei, State};

pub fn handle_terminal_debug(body: &[u8], state: &mut State) -> anyhow::Result<()> {
    let bod = String::from_utf8(body.to_vec())?;
    let mut parts = bod.split_whitespace();
    let command_verb = parts.next().unwrap_or_default();
    let args: Vec<&str> = parts.collect();

    match (command_verb, args.as_slice()) {
        ("state", []) => {
            info!("wallet panel state\n{}", serde_json::to_string_pretty(&state.view())?);
        }
        ("config", []) => {
            info!(
                "wallet panel config (hot wallet {})\n{}",
                state.panel.provider().address(),
                serde_json::to_string_pretty(state.panel.config())?
            );
        }
        ("connect", []) => {
            let _ = state.connect();
        }
        ("account", []) => {
            let _ = state.resolve();
        }
        ("refresh", []) => {
            if let Ok(Some(balance)) = state.refresh() {
                info!("balance: {}", describe_wei(balance.wei));
            }
        }
        ("deposit", [amount]) => {
            state.session.intent.amount = amount.to_string();
            let _ = state.deposit(amount);
        }
        ("send", [recipient, amount]) => {
            state.session.intent.recipient = recipient.to_string();
            state.session.intent.amount = amount.to_string();
            let _ = state.send(recipient, amount);
        }
        _ => {
            error!(
                "unknown command {:?}; expected one of: state, config, connect, account, refresh, deposit <amount>, send <recipient> <amount>",
                bod.trim()
            );
        }
    }
    Ok(())
}
