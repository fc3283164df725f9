use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use rand::Rng;
use soloq_core::{QueueConfig, TaskQueue, sink};

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();
}

fn main() {
    init_tracing();

    // optional JSON config file as the first argument
    let config = match std::env::args().nth(1) {
        Some(path) => QueueConfig::from_json_file(&path).unwrap_or_else(|e| {
            tracing::warn!(error = %e, "could not load config, using defaults");
            QueueConfig::default()
        }),
        None => QueueConfig::default(),
    };
    tracing::info!(?config, "starting queue");

    let queue = TaskQueue::new(config);
    queue.activate().expect("failed to start worker thread");
    sink::install(&queue).expect("failed to install task sink");

    let (done_tx, done_rx) = mpsc::channel();
    let mut rng = rand::thread_rng();
    for i in 0..8u32 {
        let delay = Duration::from_millis(rng.gen_range(5..40));
        let done = done_tx.clone();
        let id = sink::submit(move || {
            thread::sleep(delay);
            println!("task {i} finished after {delay:?}");
            let _ = done.send(());
        })
        .expect("submit");
        tracing::info!(task_id = %id, ?delay, "task submitted");
    }

    drop(done_tx);
    while done_rx.recv().is_ok() {}

    let status = queue.status();
    println!(
        "{}",
        serde_json::to_string_pretty(&status).expect("status serializes")
    );
    queue.deactivate();
}
