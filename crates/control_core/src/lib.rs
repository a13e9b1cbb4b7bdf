use std::sync::Arc;

use async_trait::async_trait;
use shared::{domain::SurfaceEvent, protocol::WriteCommand};
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

pub mod bands;
pub mod cache;
pub mod error;
pub mod layout;
pub mod resolvers;
pub mod router;
pub mod transport;

pub use bands::BandTable;
pub use cache::ParameterCache;
pub use error::ControlError;
pub use layout::Layout;
pub use resolvers::{Action, Resolver};
pub use router::{KnobPlane, Route, Router, Selection};
pub use transport::TciClient;

#[async_trait]
pub trait CommandSender: Send + Sync {
    async fn send(&self, command: &WriteCommand) -> anyhow::Result<()>;
}

pub struct Bridge {
    cache: Arc<ParameterCache>,
    bands: BandTable,
    router: Router,
    sender: Arc<dyn CommandSender>,
}

impl Bridge {
    pub fn new(cache: Arc<ParameterCache>, router: Router, sender: Arc<dyn CommandSender>) -> Self {
        Self {
            cache,
            bands: BandTable::default(),
            router,
            sender,
        }
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Returns how many commands went out. Each send is awaited before the next.
    pub async fn handle_event(&mut self, event: SurfaceEvent) -> Result<usize, ControlError> {
        let action = match self.router.route(event) {
            Route::Plane(plane) => {
                debug!(?plane, "surface: plane changed");
                return Ok(0);
            }
            Route::Selection(selection) => {
                debug!(
                    receiver = selection.receiver.0,
                    sub_receiver = selection.sub_receiver.0,
                    "surface: selection changed"
                );
                return Ok(0);
            }
            Route::Unmapped => return Ok(0),
            Route::Action(action) => action,
        };

        let commands = Resolver::new(&self.cache, &self.bands, self.router.selection())
            .resolve(&action, event.value)?;
        for command in &commands {
            debug!(%command, "tci: send");
            self.sender
                .send(command)
                .await
                .map_err(ControlError::Send)?;
        }
        Ok(commands.len())
    }

    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<SurfaceEvent>) {
        while let Some(event) = events.recv().await {
            debug!(control = event.control, value = event.value.raw(), "surface: event");
            match self.handle_event(event).await {
                Ok(_) => {}
                Err(err @ ControlError::Send(_)) => {
                    error!(control = event.control, error = %err, "surface: event dropped");
                }
                Err(err) => {
                    warn!(control = event.control, error = %err, "surface: event dropped");
                }
            }
        }
        debug!("surface: event channel closed");
    }
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
