use crossbeam_channel::Sender;
use relgraph_loader::{load_scene, HttpSource, Loaded, LoaderConfig};

use crate::net::Incoming;

/// Run one load attempt on its own thread and report the outcome on `tx`.
pub fn spawn_loader(cfg: LoaderConfig, attempt: u64, tx: Sender<Incoming>) {
    std::thread::spawn(move || {
        let rt = match tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
        {
            Ok(rt) => rt,
            Err(e) => {
                let _ = tx.send(Incoming::failed(attempt, format!("tokio runtime: {e}")));
                return;
            }
        };

        let result: anyhow::Result<Loaded> = rt.block_on(async {
            let source = HttpSource::new(&cfg.base_url)?;
            load_scene(&source, &cfg).await
        });

        let msg = match result {
            Ok(loaded) => Incoming::loaded(attempt, loaded),
            Err(e) => Incoming::failed(attempt, format!("{e:#}")),
        };
        let _ = tx.send(msg);
    });
}
