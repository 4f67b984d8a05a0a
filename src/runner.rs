use crate::client::{FailurePolicy, SmsClient};
use crate::config::{EnvConfig, Endpoint, RunConfig, Target};
use crate::corpus::MessagePool;
use crate::payload::SmsPayload;
use crate::signal::StopSignal;
use std::future::Future;

/// What a single worker got through before it finished.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerSummary {
    pub target: Target,
    pub slot: usize,
    /// Requests sent, whatever their outcome
    pub attempted: u64,
    /// The worker saw the stop signal before finishing its iterations
    pub stopped: bool,
}

#[derive(Debug, Clone, Default)]
pub struct RunReport {
    pub workers: Vec<WorkerSummary>,
}

impl RunReport {
    pub fn total_attempted(&self) -> u64 {
        self.workers.iter().map(|w| w.attempted).sum()
    }

    pub fn attempted_for(&self, target: Target) -> u64 {
        self.workers
            .iter()
            .filter(|w| w.target == target)
            .map(|w| w.attempted)
            .sum()
    }

    pub fn any_stopped(&self) -> bool {
        self.workers.iter().any(|w| w.stopped)
    }
}

/// Owns a run: the message pool, the selected endpoints and the worker tasks hitting them.
pub struct LoadRun {
    config: RunConfig,
    endpoints: Vec<Endpoint>,
    pool: MessagePool,
    client: SmsClient,
    policy: FailurePolicy,
    stop: StopSignal,
}

impl LoadRun {
    pub fn new(config: RunConfig, env: &EnvConfig, pool: MessagePool, client: SmsClient) -> Self {
        let endpoints = config.endpoints(env);

        Self {
            config,
            endpoints,
            pool,
            client,
            policy: FailurePolicy::Ignore,
            stop: StopSignal::new(),
        }
    }

    pub fn endpoints(&self) -> &[Endpoint] {
        &self.endpoints
    }

    /// Handle on the run's stop signal. Raising it drains the workers.
    pub fn stop_signal(&self) -> StopSignal {
        self.stop.clone()
    }

    /// Spam every selected endpoint until the workers finish or `interrupt` resolves.
    ///
    /// On interrupt no new request is started, in-flight ones run to completion or
    /// timeout, and this returns once every worker has exited.
    pub async fn run<F>(&self, interrupt: F) -> RunReport
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let deployments: Vec<&str> = self.endpoints.iter().map(|e| e.target.as_str()).collect();
        tracing::info!(
            ?deployments,
            workers_per_target = self.config.workers_per_target,
            iterations_per_worker = self.config.iterations_per_worker,
            pool_size = self.pool.len(),
            "Starting load run"
        );
        if self.pool.is_empty() && !self.endpoints.is_empty() {
            tracing::warn!("Message pool is empty, workers have nothing to send");
        }

        println!("Spamming services");

        // Setup Ctrl+C handler
        let stop = self.stop.clone();
        let watcher = tokio::spawn(async move {
            interrupt.await;
            if stop.trigger() {
                println!("\nStopping...");
            }
        });

        // Spawn worker tasks
        let mut handles = Vec::with_capacity(self.config.total_workers());
        for endpoint in &self.endpoints {
            for slot in 0..self.config.workers_per_target {
                let worker = Worker {
                    slot,
                    endpoint: endpoint.clone(),
                    iterations: self.config.iterations_per_worker,
                    pool: self.pool.clone(),
                    client: self.client.clone(),
                    policy: self.policy,
                    stop: self.stop.clone(),
                };
                handles.push(tokio::spawn(worker.run()));
            }
        }

        // Wait for all workers to complete
        let mut report = RunReport::default();
        for handle in handles {
            match handle.await {
                Ok(summary) => {
                    tracing::debug!(
                        deployment = %summary.target,
                        slot = summary.slot,
                        attempted = summary.attempted,
                        stopped = summary.stopped,
                        "Worker finished"
                    );
                    report.workers.push(summary);
                }
                Err(e) => tracing::error!(error = %e, "Worker task failed"),
            }
        }

        watcher.abort();

        println!("Finished spamming!");

        report
    }
}

struct Worker {
    slot: usize,
    endpoint: Endpoint,
    iterations: u64,
    pool: MessagePool,
    client: SmsClient,
    policy: FailurePolicy,
    stop: StopSignal,
}

impl Worker {
    async fn run(self) -> WorkerSummary {
        let mut attempted = 0;
        let mut stopped = false;

        for _ in 0..self.iterations {
            if self.stop.is_stopped() {
                stopped = true;
                break;
            }

            // ThreadRng is !Send, keep it out of the await below
            let payload = {
                let mut rng = rand::thread_rng();
                SmsPayload::random(&self.pool, &mut rng)
            };
            let Some(payload) = payload else {
                break;
            };

            self.policy
                .absorb(self.client.post_sms(&self.endpoint.url, &payload).await);
            attempted += 1;
        }

        WorkerSummary {
            target: self.endpoint.target,
            slot: self.slot,
            attempted,
            stopped,
        }
    }
}
