use std::time::Duration;

use mongodb::{Client, Database, bson::doc, options::ClientOptions};
use tokio::time::sleep;
use tracing::debug;

use super::error::{MongoDaoError, MongoResult};

/// Bounded retry for the first ping; the storage supervisor retries whole connections.
struct RetryPolicy;

impl RetryPolicy {
    const MAX_ATTEMPTS: u32 = 5;
    const INITIAL_DELAY_MS: u64 = 250;

    fn initial_delay() -> Duration {
        Duration::from_millis(Self::INITIAL_DELAY_MS)
    }

    fn next_delay(current: Duration) -> Duration {
        (current * 2).min(Duration::from_secs(2))
    }
}

/// Build a client for `database_name` and wait until the server answers a ping.
pub async fn establish_connection(
    options: &ClientOptions,
    database_name: &str,
) -> MongoResult<(Client, Database)> {
    let client = Client::with_options(options.clone())
        .map_err(|source| MongoDaoError::ClientConstruction { source })?;
    let database = client.database(database_name);

    let mut attempts = 0;
    let mut delay = RetryPolicy::initial_delay();

    while let Err(err) = database.run_command(doc! { "ping": 1 }).await {
        attempts += 1;
        if attempts >= RetryPolicy::MAX_ATTEMPTS {
            return Err(MongoDaoError::InitialPing {
                attempts,
                source: err,
            });
        }
        debug!(attempts, database = database_name, error = %err, "MongoDB ping failed; retrying");
        sleep(delay).await;
        delay = RetryPolicy::next_delay(delay);
    }

    Ok((client, database))
}
