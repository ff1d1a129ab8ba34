use std::path::PathBuf;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{debug, info, warn};

use crate::api::HealthResponse;
use crate::config::BootstrapConfig;

/// Polls a health endpoint until it answers or the attempt budget runs out.
#[derive(Clone)]
pub struct HealthProbe {
    url: String,
    attempts: u32,
    interval: Duration,
    client: reqwest::Client,
}

impl HealthProbe {
    pub fn from_config(config: &BootstrapConfig) -> Result<Self, String> {
        Self::new(
            config.health_url.clone(),
            config.attempts,
            Duration::from_millis(config.interval_ms),
            Duration::from_millis(config.request_timeout_ms),
        )
    }

    pub fn new(
        url: String,
        attempts: u32,
        interval: Duration,
        request_timeout: Duration,
    ) -> Result<Self, String> {
        let client = reqwest::Client::builder()
            .timeout(request_timeout)
            .build()
            .map_err(|err| format!("failed to build health client: {}", err))?;
        Ok(Self {
            url,
            attempts: attempts.max(1),
            interval,
            client,
        })
    }

    pub async fn check(&self) -> Result<HealthResponse, String> {
        let response = self
            .client
            .get(&self.url)
            .send()
            .await
            .map_err(|err| format!("health request failed: {}", err))?;

        if !response.status().is_success() {
            return Err(format!("health check returned {}", response.status()));
        }

        response
            .json::<HealthResponse>()
            .await
            .map_err(|err| format!("health response parse failed: {}", err))
    }

    pub async fn wait(&self) -> Result<HealthResponse, String> {
        let mut last_error = String::new();
        for attempt in 1..=self.attempts {
            match self.check().await {
                Ok(health) => {
                    info!(attempt, model_loaded = health.model_loaded, "service is healthy");
                    return Ok(health);
                }
                Err(err) => {
                    debug!(attempt, error = %err, "service not ready yet");
                    last_error = err;
                }
            }
            if attempt < self.attempts {
                tokio::time::sleep(self.interval).await;
            }
        }
        Err(format!(
            "service at {} not healthy after {} attempts: {}",
            self.url, self.attempts, last_error
        ))
    }
}

/// Starts `program serve ...` as a child process and waits for it to report
/// healthy. The child is killed if it never does.
pub async fn launch(program: PathBuf, serve_args: Vec<String>, probe: &HealthProbe) -> Result<Child, String> {
    let mut child = Command::new(&program)
        .arg("serve")
        .args(&serve_args)
        .kill_on_drop(false)
        .spawn()
        .map_err(|err| format!("failed to start {}: {}", program.display(), err))?;
    info!(pid = child.id(), program = %program.display(), "spawned server process");

    match probe.wait().await {
        Ok(_) => Ok(child),
        Err(err) => {
            warn!(error = %err, "server failed to start, terminating child");
            if let Err(kill_err) = child.kill().await {
                warn!(error = %kill_err, "failed to terminate server process");
            }
            Err(err)
        }
    }
}
