use super::traits::{check_flavor, MysqlFlavor};
use crate::error::{FlavorError, Result};
use crate::network::ServerConnection;
use crate::replication::ReplicationPosition;
use std::future::Future;
use std::time::Duration;
use tokio::time::{sleep, timeout};
use tracing::debug;

/// Run `fut`, turning an elapsed deadline into `FlavorError::Timeout`.
pub async fn with_deadline<T, F>(
    flavor: &str,
    target: &ReplicationPosition,
    wait_timeout: Duration,
    fut: F,
) -> Result<T>
where
    F: Future<Output = Result<T>>,
{
    timeout(wait_timeout, fut).await.unwrap_or_else(|_| {
        Err(FlavorError::Timeout {
            flavor: flavor.to_string(),
            target: target.to_string(),
            timeout: wait_timeout,
        })
    })
}

/// Poll `slave_status` until the replica reaches `target`.
///
/// Building block for flavors without a server-side wait primitive.
pub async fn poll_until_position(
    flavor: &dyn MysqlFlavor,
    server: &mut dyn ServerConnection,
    target: &ReplicationPosition,
    wait_timeout: Duration,
    poll_interval: Duration,
) -> Result<()> {
    check_flavor(flavor.name(), "wait_master_pos", target.flavor())?;

    with_deadline(flavor.name(), target, wait_timeout, async {
        loop {
            let status = flavor.slave_status(server).await?.ok_or_else(|| {
                FlavorError::Communication {
                    flavor: flavor.name().to_string(),
                    operation: "wait_master_pos",
                    message: "server is not replicating".to_string(),
                }
            })?;

            if status.position.at_least(target)? {
                return Ok(());
            }

            debug!(
                "Replica at {} has not reached {} yet, polling again in {:?}",
                status.position, target, poll_interval
            );
            sleep(poll_interval).await;
        }
    })
    .await
}
