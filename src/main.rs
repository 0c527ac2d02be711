use tracing_subscriber::EnvFilter;

use cell_clash::config::{DEFAULT_ADDR, MAX_PATTERN_DIFFICULTY, MIN_PATTERN_DIFFICULTY};
use cell_clash::game::patterns;
use cell_clash::net::dispatcher::DispatcherHandle;
use cell_clash::net::ws::WsServer;
use cell_clash::state::hub::GameHub;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let mut args = std::env::args().skip(1);
    let addr = args.next().unwrap_or_else(|| DEFAULT_ADDR.to_owned());

    let pattern = patterns::random_pattern(MIN_PATTERN_DIFFICULTY, MAX_PATTERN_DIFFICULTY)
        .expect("the built-in catalogue covers the default difficulty band");
    let hub = GameHub::new(pattern);
    let dispatcher = DispatcherHandle::new(hub);

    let rt = tokio::runtime::Runtime::new().expect("tokio runtime");
    if let Err(err) = rt.block_on(WsServer::serve(&addr, dispatcher)) {
        tracing::error!(%err, "server stopped");
        std::process::exit(1);
    }
}
