//! Drive link establishment from the source network to every other network.

use crate::link::{Config, Error, Invoker, LinkTask, Request, Runner};
use tracing::{error, info};

/// Links established by a successful propagation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Summary {
    pub source: String,
    pub links: usize,
}

/// Establishes links from the configured source network to all other networks.
pub struct Propagator<R: Runner> {
    config: Config,
    invoker: Invoker<R>,
}

impl<R: Runner> Propagator<R> {
    /// Creates a [Propagator], rejecting a [Config] with an empty or duplicated [NetworkSet].
    ///
    /// [NetworkSet]: crate::link::NetworkSet
    pub fn new(config: Config, invoker: Invoker<R>) -> Result<Self, Error> {
        config.validate()?;
        Ok(Self { config, invoker })
    }

    /// Resolves the source network and the [LinkTask]s for `request`.
    fn resolve(&self, request: &Request) -> Result<(String, Vec<LinkTask>), Error> {
        let contracts = request.contracts()?;
        let networks = self.config.networks(request.mode);
        let source = networks.source(self.config.source_index)?;
        let tasks = networks
            .iter()
            .filter(|target| *target != source)
            .map(|target| LinkTask {
                source: source.to_string(),
                target: target.to_string(),
                contracts: contracts.clone(),
            })
            .collect();
        Ok((source.to_string(), tasks))
    }

    /// Resolves the [LinkTask]s for `request` in registry order, without running them.
    pub fn plan(&self, request: &Request) -> Result<Vec<LinkTask>, Error> {
        self.resolve(request).map(|(_, tasks)| tasks)
    }

    /// Establishes every link for `request`, one at a time.
    ///
    /// Links are attempted strictly in order and the run stops at the first link that fails,
    /// returning [Error::LinkFailed] for that pair. No link is retried.
    pub async fn propagate(&mut self, request: &Request) -> Result<Summary, Error> {
        let (source, tasks) = self.resolve(request)?;
        info!(
            mode = %request.mode,
            source = source.as_str(),
            links = tasks.len(),
            "propagating trusted remotes"
        );

        for task in &tasks {
            let command = self.invoker.command(task);
            info!(
                source = task.source.as_str(),
                target = task.target.as_str(),
                %command,
                "setting trusted remote"
            );
            let result = self.invoker.establish_link(task).await;
            if !result.succeeded {
                error!(
                    source = task.source.as_str(),
                    target = task.target.as_str(),
                    exit_code = ?result.exit_code,
                    "failed to set trusted remote"
                );
                return Err(Error::LinkFailed {
                    src: task.source.clone(),
                    dst: task.target.clone(),
                    exit_code: result.exit_code,
                });
            }
        }

        info!(source = source.as_str(), links = tasks.len(), "propagated trusted remotes");
        Ok(Summary {
            source,
            links: tasks.len(),
        })
    }

    /// Returns the [Invoker] used for each link.
    pub fn invoker(&self) -> &Invoker<R> {
        &self.invoker
    }
}
