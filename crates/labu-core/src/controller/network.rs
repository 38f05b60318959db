//! Overlay network operations. `create`/`remove` are idempotent against the
//! Controller's own active-network set; the rest are adapter pass-throughs.

use super::Controller;
use crate::Result;
use labu_runtime::ContainerId;

impl Controller {
    /// Idempotent: a name already in the active set is accepted without
    /// re-invoking the adapter.
    pub async fn create_network(&self, name: &str) -> Result<()> {
        let already_known = self.state.lock().unwrap().networks.contains(name);
        if already_known {
            return Ok(());
        }
        self.runtime.create_network(name).await?;
        self.state.lock().unwrap().networks.insert(name.to_string());
        Ok(())
    }

    /// Removal of an already-absent network is not an error.
    pub async fn remove_network(&self, name: &str) -> Result<()> {
        let was_known = self.state.lock().unwrap().networks.remove(name);
        if !was_known {
            return Ok(());
        }
        self.runtime.remove_network(name).await?;
        Ok(())
    }

    pub async fn connect_network(&self, name: &str, container_id: &str) -> Result<()> {
        self.runtime
            .connect_network(name, &ContainerId::new(container_id))
            .await?;
        Ok(())
    }

    pub async fn disconnect_network(&self, name: &str, container_id: &str) -> Result<()> {
        self.runtime
            .disconnect_network(name, &ContainerId::new(container_id))
            .await?;
        Ok(())
    }

    pub async fn network_ip(&self, name: &str, container_id: &str) -> Result<String> {
        let ip = self
            .runtime
            .container_ip(name, &ContainerId::new(container_id))
            .await?;
        Ok(ip)
    }
}

#[cfg(test)]
mod tests {
    use crate::test_support::{test_controller, test_controller_with_runtime};

    #[tokio::test]
    async fn create_network_is_idempotent_at_the_controller_level() {
        let controller = test_controller(&["geth"]);
        controller.create_network("devnet").await.unwrap();
        controller.create_network("devnet").await.unwrap();
        assert_eq!(controller.state.lock().unwrap().networks.len(), 1);
    }

    #[tokio::test]
    async fn create_network_invokes_the_adapter_at_most_once_per_name() {
        let (controller, runtime) = test_controller_with_runtime(&["geth"]);
        controller.create_network("devnet").await.unwrap();
        controller.create_network("devnet").await.unwrap();
        controller.create_network("devnet").await.unwrap();
        assert_eq!(runtime.network_create_calls.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn remove_unknown_network_is_not_an_error() {
        let controller = test_controller(&["geth"]);
        controller.remove_network("never-created").await.unwrap();
    }
}
