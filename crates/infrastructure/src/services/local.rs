use super::{ManagedService, ReadinessProbe, ServiceError};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use std::time::Duration;
use tokio::process::{Child, Command};
use tracing::{info, warn};

const POLL_INTERVAL: Duration = Duration::from_millis(200);

#[derive(Debug, Clone)]
pub struct LocalServiceConfig {
    pub name: String,
    pub program: String,
    /// `{PORT}` in an argument is replaced with the chosen port.
    pub args: Vec<String>,
    pub scheme: String,
    pub host: String,
    /// 0 picks a free port before spawning
    pub port: u16,
    pub probe: ReadinessProbe,
    pub startup_timeout: Duration,
    pub shutdown_timeout: Duration,
    pub env: Vec<(String, String)>,
    pub working_dir: Option<PathBuf>,
}

impl LocalServiceConfig {
    pub fn new(name: impl Into<String>, program: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            program: program.into(),
            args: Vec::new(),
            scheme: "http".to_string(),
            host: "127.0.0.1".to_string(),
            port: 0,
            probe: ReadinessProbe::Tcp {
                allow_refused: false,
            },
            startup_timeout: Duration::from_secs(30),
            shutdown_timeout: Duration::from_secs(10),
            env: Vec::new(),
            working_dir: None,
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    pub fn with_scheme(mut self, scheme: impl Into<String>) -> Self {
        self.scheme = scheme.into();
        self
    }

    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    pub fn with_probe(mut self, probe: ReadinessProbe) -> Self {
        self.probe = probe;
        self
    }

    pub fn with_startup_timeout(mut self, timeout: Duration) -> Self {
        self.startup_timeout = timeout;
        self
    }

    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }
}

/// Service spawned as a child process with `PORT` in its environment.
pub struct LocalProcessService {
    config: LocalServiceConfig,
    child: Option<Child>,
}

impl LocalProcessService {
    pub fn new(config: LocalServiceConfig) -> Self {
        Self {
            config,
            child: None,
        }
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }

    pub fn port(&self) -> u16 {
        self.config.port
    }

    fn free_port(&self) -> Result<u16, ServiceError> {
        let port = match self.config.probe {
            ReadinessProbe::Dns { .. } => std::net::UdpSocket::bind((self.config.host.as_str(), 0))
                .and_then(|s| s.local_addr())
                .map(|a| a.port()),
            _ => std::net::TcpListener::bind((self.config.host.as_str(), 0))
                .and_then(|l| l.local_addr())
                .map(|a| a.port()),
        };
        port.map_err(ServiceError::NoFreePort)
    }
}

#[async_trait]
impl ManagedService for LocalProcessService {
    fn endpoint(&self) -> String {
        format!(
            "{}://{}:{}",
            self.config.scheme, self.config.host, self.config.port
        )
    }

    fn is_running(&mut self) -> bool {
        match self.child.as_mut() {
            Some(child) => matches!(child.try_wait(), Ok(None)),
            None => false,
        }
    }

    async fn start(&mut self) -> Result<(), ServiceError> {
        if self.config.port == 0 {
            self.config.port = self.free_port()?;
        }
        let port = self.config.port.to_string();
        let args: Vec<String> = self
            .config
            .args
            .iter()
            .map(|a| a.replace("{PORT}", &port))
            .collect();

        info!(
            service = %self.config.name,
            port = self.config.port,
            command = %format!("{} {}", self.config.program, args.join(" ")),
            "Starting service"
        );

        let mut command = Command::new(&self.config.program);
        command
            .args(&args)
            .env("PORT", &port)
            .envs(self.config.env.iter().map(|(k, v)| (k.as_str(), v.as_str())))
            .stdin(Stdio::null())
            .kill_on_drop(true);
        if let Some(dir) = &self.config.working_dir {
            command.current_dir(dir);
        }

        let child = command.spawn().map_err(|source| ServiceError::Spawn {
            name: self.config.name.clone(),
            source,
        })?;
        self.child = Some(child);

        if !self.wait_ready(self.config.startup_timeout).await {
            self.stop().await?;
            return Err(ServiceError::NotReady {
                name: self.config.name.clone(),
                timeout_secs: self.config.startup_timeout.as_secs(),
            });
        }

        info!(service = %self.config.name, endpoint = %self.endpoint(), "Service started");
        Ok(())
    }

    /// Kills the child and waits up to the shutdown timeout for it to exit.
    async fn stop(&mut self) -> Result<(), ServiceError> {
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        info!(service = %self.config.name, "Stopping service");

        if let Err(e) = child.start_kill() {
            // Already exited
            if matches!(child.try_wait(), Ok(Some(_))) {
                return Ok(());
            }
            return Err(ServiceError::Stop {
                name: self.config.name.clone(),
                reason: e.to_string(),
            });
        }

        match tokio::time::timeout(self.config.shutdown_timeout, child.wait()).await {
            Ok(Ok(_)) => Ok(()),
            Ok(Err(e)) => Err(ServiceError::Stop {
                name: self.config.name.clone(),
                reason: e.to_string(),
            }),
            Err(_) => {
                warn!(service = %self.config.name, "Service did not exit after kill");
                Err(ServiceError::Stop {
                    name: self.config.name.clone(),
                    reason: "timed out waiting for exit".to_string(),
                })
            }
        }
    }

    async fn wait_ready(&self, timeout: Duration) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self
                .config
                .probe
                .check(&self.config.host, self.config.port)
                .await
            {
                return true;
            }
            if tokio::time::Instant::now() + POLL_INTERVAL > deadline {
                return false;
            }
            tokio::time::sleep(POLL_INTERVAL).await;
        }
    }
}
