use crate::{NetworkError, RoadNetwork, UnknownLocationPolicy};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

/// process-wide handle to a [`RoadNetwork`].
///
/// writers (traffic updates, location registration) are serialized behind the
/// write lock and each one replaces an edge's state as a unit, so readers never
/// observe a partially applied update. searches share the read lock.
#[derive(Debug, Clone, Default)]
pub struct SharedRoadNetwork(Arc<RwLock<RoadNetwork>>);

impl SharedRoadNetwork {
    pub fn new(network: RoadNetwork) -> SharedRoadNetwork {
        SharedRoadNetwork(Arc::new(RwLock::new(network)))
    }

    pub fn read(&self) -> Result<RwLockReadGuard<'_, RoadNetwork>, NetworkError> {
        self.0
            .read()
            .map_err(|e| NetworkError::InternalError(format!("road network lock poisoned: {e}")))
    }

    pub fn write(&self) -> Result<RwLockWriteGuard<'_, RoadNetwork>, NetworkError> {
        self.0
            .write()
            .map_err(|e| NetworkError::InternalError(format!("road network lock poisoned: {e}")))
    }

    pub fn update_traffic(&self, a: &str, b: &str, delay_factor: f64) -> Result<(), NetworkError> {
        self.write()?.update_traffic(a, b, delay_factor)
    }

    /// makes sure the given locations exist under `policy`. the write lock is
    /// only taken when a location actually has to be registered.
    pub fn ensure_locations(
        &self,
        names: &[&str],
        policy: UnknownLocationPolicy,
    ) -> Result<(), NetworkError> {
        let missing = {
            let network = self.read()?;
            names
                .iter()
                .filter(|name| !network.has_location(name))
                .map(|name| name.to_string())
                .collect::<Vec<_>>()
        };
        if missing.is_empty() {
            return Ok(());
        }
        let mut network = self.write()?;
        for name in missing.iter() {
            network.resolve(name, policy)?;
        }
        Ok(())
    }
}
