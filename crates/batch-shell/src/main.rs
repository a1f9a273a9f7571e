//! `batch-shell NCPU TSLICE`: an interactive shell that is also a
//! pre-emptive round-robin batch scheduler. Jobs submitted with `submit`
//! are dispatched onto `NCPU` simulated CPUs in `TSLICE`-millisecond
//! quanta by a background task; the shell itself keeps running commands
//! in the foreground, exactly as spec.md §1 describes the two concerns
//! sharing one process.
//!
//! Grounded on `original_source/scheduler.c`'s `main` (argument parsing,
//! startup banner) and the teacher's exercise binaries for the
//! `clap` + `tracing-subscriber` startup shape.

mod history;
mod repl;

use clap::Parser;
use history::History;

/// Positional CLI matching the original source's `argv[1]`/`argv[2]`
/// (`NCPU`, `TSLICE`); validated against `scheduler_core::context::MAX_NCPU`
/// once parsed, not by `clap` alone, so the diagnostic matches spec.md §6.
#[derive(Parser)]
#[command(name = "batch-shell", about = "Interactive round-robin batch scheduler shell")]
struct Cli {
    ncpu: usize,
    tslice_ms: u64,
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(_) => {
            eprintln!("Usage: batch-shell <NCPU> <TSLICE>");
            std::process::exit(1);
        }
    };

    let ctx = match scheduler_core::SchedulerContext::new(cli.ncpu, cli.tslice_ms) {
        Ok(ctx) => ctx,
        Err(err) => {
            eprintln!("batch-shell: {err}");
            eprintln!("Usage: batch-shell <NCPU> <TSLICE>");
            std::process::exit(1);
        }
    };

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .expect("failed to start tokio runtime");

    runtime.block_on(async_main(ctx));
}

async fn async_main(ctx: scheduler_core::SchedulerContext) {
    tracing::info!(ncpu = ctx.ncpu, tslice_ms = ctx.tslice_ms, "starting scheduler");

    let scheduler_ctx = ctx.clone();
    tokio::spawn(async move {
        scheduler_core::scheduler::run(scheduler_ctx).await;
    });

    let mut history = History::new();
    if let Err(err) = repl::run(&ctx, &mut history).await {
        eprintln!("batch-shell: {err}");
        std::process::exit(1);
    }
}
