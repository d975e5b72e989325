mod component;
mod error;
mod sequence;

pub use self::component::{Component, ComponentContext};
pub use self::error::Error;
pub use self::sequence::Sequencer;

pub type Result<T = ()> = std::result::Result<T, error::Error>;

use crate::kernel::Routine;

/// Routine runtime.
///
/// The runtime is the external driver of the control cycle: it ticks the
/// routine at a fixed interval and carries the shutdown event bus. All
/// executor state lives in the component context; the runtime itself only
/// schedules.
pub struct Runtime {
    /// Runtime event bus.
    shutdown: (
        tokio::sync::broadcast::Sender<()>,
        tokio::sync::broadcast::Receiver<()>,
    ),
}

impl Runtime {
    pub fn new() -> Self {
        Self {
            shutdown: tokio::sync::broadcast::channel(1),
        }
    }

    /// Listen for shutdown signal.
    pub fn shutdown_signal(&self) -> tokio::sync::broadcast::Receiver<()> {
        self.shutdown.0.subscribe()
    }

    /// Trip the shutdown event bus on termination signals.
    pub fn enable_term_shutdown(&self) {
        debug!("Enable signals shutdown");

        let sender = self.shutdown.0.clone();

        tokio::spawn(async move {
            tokio::signal::ctrl_c().await.ok();

            info!("Termination requested");

            sender.send(()).ok();
        });
    }

    /// Drive the routine at a fixed control cycle.
    ///
    /// Ticks every executor once per interval until the routine reports
    /// completion or the shutdown event bus trips. All motion is stopped
    /// before this method returns.
    pub async fn run_interval(
        &mut self,
        routine: &mut Routine,
        ctx: &mut ComponentContext,
        interval: std::time::Duration,
    ) {
        let mut shutdown = self.shutdown_signal();
        let mut tick = tokio::time::interval(interval);

        loop {
            tokio::select! {
                _ = tick.tick() => {
                    routine.tick(ctx);

                    if routine.is_complete(ctx) {
                        info!("Routine completed in {} cycles", ctx.iteration());
                        break;
                    }
                }
                _ = shutdown.recv() => {
                    warn!("Routine terminated by external signal");
                    break;
                }
            }
        }

        // Stop all motion for safety.
        ctx.stop_all();
    }
}

impl Default for Runtime {
    fn default() -> Self {
        Self::new()
    }
}
