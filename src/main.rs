use mimalloc::MiMalloc;
use modules::{
    common::signal::SignalManager,
    context::{AppContext, Initialize},
    error::ReachBookResult,
    logger,
    rest::start_http_server,
    tasks::PeriodicTasks,
};
use tracing::info;

mod modules;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

static LOGO: &str = r#"
  ____                 _     ____              _
 |  _ \ ___  __ _  ___| |__ | __ )  ___   ___ | | __
 | |_) / _ \/ _` |/ __| '_ \|  _ \ / _ \ / _ \| |/ /
 |  _ <  __/ (_| | (__| | | | |_) | (_) | (_) |   <
 |_| \_\___|\__,_|\___|_| |_|____/ \___/ \___/|_|\_\

"#;

#[tokio::main]
async fn main() -> ReachBookResult<()> {
    logger::initialize_logging();
    info!("{}", LOGO);
    info!("Starting reachbook-server");
    info!("Version:  {}", reachbook_version!());
    info!("Git:      [{}]", env!("GIT_HASH"));

    if let Err(error) = initialize().await {
        eprintln!("{:?}", error);
        return Err(error);
    }

    start_http_server().await
}

/// Initialize the system by validating settings and starting necessary tasks.
async fn initialize() -> ReachBookResult<()> {
    SignalManager::initialize().await?;
    AppContext::initialize().await?;
    PeriodicTasks::start_background_tasks();
    Ok(())
}
