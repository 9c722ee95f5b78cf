mod chain;
mod http_handlers;
mod structs;
mod terminal;

use hyperware_process_lib::homepage::add_to_homepage;
use hyperware_process_lib::http::server::{HttpBindingConfig, HttpServer};
use hyperware_process_lib::logging::{error, info, init_logging, warn, Level};
use hyperware_process_lib::vfs::open_file;
use hyperware_process_lib::{await_message, call_init, Address, Message};
use panelcore::constants::NETWORK_NAME;
use panelcore::PanelConfig;
use structs::*;

const CONFIG_FILE: &str = "config.json";

fn init_http() -> anyhow::Result<HttpServer> {
    let mut http_server = HttpServer::new(5);
    let http_config_authenticated = HttpBindingConfig::default().authenticated(true);

    for path in [
        "/api/state",
        "/api/connect",
        "/api/account",
        "/api/refresh",
        "/api/intent",
        "/api/send",
        "/api/deposit",
    ] {
        http_server.bind_http_path(path, http_config_authenticated.clone())?;
    }

    add_to_homepage("Wallet Panel", None, Some("/"), None);
    http_server.serve_ui("ui", vec!["/"], http_config_authenticated)?;

    Ok(http_server)
}

/// Defaults from the compiled-in constants, overridden by
/// `pkg/config.json` when the package ships one.
fn load_config(our: &Address) -> PanelConfig {
    let path = format!("/{}/pkg/{}", our.package_id(), CONFIG_FILE);
    let bytes = match open_file(&path, false, None).and_then(|file| file.read()) {
        Ok(bytes) => bytes,
        Err(e) => {
            info!("No config override at {} ({:?}), using defaults", path, e);
            return PanelConfig::default();
        }
    };
    let parsed = String::from_utf8(bytes)
        .map_err(|e| e.to_string())
        .and_then(|json| PanelConfig::from_json(&json).map_err(|e| e.to_string()));
    match parsed {
        Ok(config) => {
            info!("Loaded config override from {}", path);
            config
        }
        Err(e) => {
            warn!("Ignoring invalid config override at {}: {}", path, e);
            PanelConfig::default()
        }
    }
}

call_init!(init);
fn init(our: Address) {
    init_logging(Level::DEBUG, Level::INFO, None, None, None).unwrap();
    info!("begin wallet panel for node: {} on {}", our.node, NETWORK_NAME);

    let config = load_config(&our);
    info!(
        "factory {} entry point {} chain {} ({:?}, {:?})",
        config.factory_address,
        config.entry_point_address,
        config.chain_id,
        config.balance_source,
        config.transfer_strategy
    );

    let store = match WalletStore::load_or_create(config.chain_id) {
        Ok(store) => store,
        Err(e) => {
            error!("FATAL: no hot wallet available: {:?}", e);
            panic!("Hot wallet initialization failed");
        }
    };
    let mut state = State::new(config, store.signer);
    info!("Hot wallet address: {}", state.panel.provider().address());

    match init_http() {
        Ok(_http_server) => info!("Successfully initialized and bound HTTP server."),
        Err(e) => error!("FATAL: Failed to initialize HTTP server: {:?}", e),
    }

    info!("Entering main message loop...");
    loop {
        if let Err(e) = main(&mut state) {
            error!("Error in main loop: {:?}", e);
        }
    }
}

fn main(state: &mut State) -> anyhow::Result<()> {
    let message = await_message()?;
    match message {
        Message::Request { source, body, .. } => handle_request(&source, &body, state),
        Message::Response { source, .. } => {
            info!("Ignoring response from: {}", source);
            Ok(())
        }
    }
}

fn handle_request(source: &Address, body: &[u8], state: &mut State) -> anyhow::Result<()> {
    let process = source.process.to_string();
    let pkg = source.package_id().to_string();

    if pkg == "terminal:sys" {
        return terminal::handle_terminal_debug(body, state);
    }
    match process.as_str() {
        "http-server:distro:sys" => http_handlers::handle_frontend(body, state),
        _ => {
            info!("Ignoring unexpected direct request from: {}", source);
            Ok(())
        }
    }
}
