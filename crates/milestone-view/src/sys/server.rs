use crate::events::AppEvent;
use async_channel::Sender;
use milestone::control::{Command, SOCKET_PATH};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::net::UnixListener;

pub async fn run_server(tx: Sender<AppEvent>) {
    // Cleanup old socket if it exists
    if fs_err::metadata(SOCKET_PATH).is_ok() {
        let _ = fs_err::remove_file(SOCKET_PATH);
    }

    let listener = match UnixListener::bind(SOCKET_PATH) {
        Ok(l) => l,
        Err(e) => {
            log::error!("Failed to bind unix socket: {}", e);
            return;
        }
    };

    loop {
        match listener.accept().await {
            Ok((mut stream, _)) => {
                let tx = tx.clone();
                tokio::spawn(async move {
                    let reader = BufReader::new(&mut stream);
                    let mut lines = reader.lines();

                    while let Ok(Some(line)) = lines.next_line().await {
                        if line.trim().is_empty() {
                            continue;
                        }
                        match line.parse::<Command>() {
                            Ok(cmd) => {
                                if tx.send(AppEvent::from(cmd)).await.is_err() {
                                    break;
                                }
                            }
                            Err(e) => log::warn!("Ignoring control line: {}", e),
                        }
                    }
                });
            }
            Err(e) => {
                log::error!("Failed to accept connection: {}", e);
            }
        }
    }
}
