use crate::events::AppEvent;
use async_channel::Sender;
use std::thread;
use tokio::runtime::Builder;

/// Runs the control socket and config watcher on a dedicated tokio runtime.
/// Both only talk to the UI through `tx`.
pub fn start_background_services(tx: Sender<AppEvent>) {
    let spawned = thread::Builder::new()
        .name("milestone-services".into())
        .spawn(move || {
            let rt = match Builder::new_multi_thread().enable_all().build() {
                Ok(rt) => rt,
                Err(e) => {
                    log::error!("Failed to create Tokio runtime: {}", e);
                    return;
                }
            };

            rt.block_on(async {
                tokio::spawn(crate::sys::server::run_server(tx.clone()));
                tokio::spawn(crate::config::run_async_watcher(tx));

                std::future::pending::<()>().await;
            });
        });

    if let Err(e) = spawned {
        log::error!("Failed to start background services: {}", e);
    }
}
