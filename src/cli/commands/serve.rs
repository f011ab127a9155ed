use crate::cli::parser::Commands;
use crate::config::Config;
use crate::db::pool::DbPool;
use crate::errors::AppResult;
use crate::logging::init_logging;
use crate::web::{AppState, Server};
use std::sync::Arc;

/// Migrate the database and start the worker connections. Blocking, so it
/// runs before any runtime thread exists.
fn open_pool(cfg: &Config) -> AppResult<Arc<DbPool>> {
    Ok(Arc::new(DbPool::open(
        &cfg.database,
        cfg.db_workers,
        cfg.queue_capacity,
    )?))
}

/// Handle the `serve` command: build the runtime, the pool and the server.
pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Serve { host, port } = cmd {
        let mut cfg = cfg.clone();
        if let Some(h) = host {
            cfg.host = h.clone();
        }
        if let Some(p) = port {
            cfg.port = *p;
        }

        init_logging(&cfg);
        let addr = Server::addr_from(&cfg)?;

        // The pool is released after the runtime.
        let pool = open_pool(&cfg)?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("entrybook-http")
            .build()?;

        let result = runtime.block_on(async {
            let state = AppState::new(Arc::clone(&pool), cfg.page_size).await?;
            Server::new(addr, state).run().await
        });
        drop(runtime);
        drop(pool);
        result?;
    }

    Ok(())
}
