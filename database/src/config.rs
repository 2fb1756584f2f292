use std::time::Duration;

#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    pub url: String,
    pub pool_size: u32,
    pub acquire_timeout: Duration,
}

impl DatabaseConfig {
    pub fn from_cli_or_env_or_yaml(cli_arg: Option<String>, yaml_config: Option<String>) -> Self {
        let url = if let Some(arg) = cli_arg {
            arg
        } else if let Ok(env) = std::env::var("DATABASE_URL") {
            env
        } else if let Some(yaml) = yaml_config {
            yaml
        } else {
            ":memory:".to_string()
        };

        Self {
            url,
            pool_size: 20,
            acquire_timeout: Duration::from_secs(5),
        }
    }

    pub async fn create_pool(&self) -> Result<sqlx::SqlitePool, sqlx::Error> {
        let options = sqlx::sqlite::SqliteConnectOptions::new()
            .filename(&self.url)
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(self.acquire_timeout);

        sqlx::sqlite::SqlitePoolOptions::new()
            .max_connections(self.pool_size)
            .acquire_timeout(self.acquire_timeout)
            .connect_with(options)
            .await
    }
}
