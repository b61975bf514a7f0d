use anyhow::{Context, Result};
use clap::Parser;
use std::env;

/// Centralized application configuration.
/// Combines environment variables and CLI arguments.
///
/// AWS credentials are deliberately absent: they come from the ambient
/// provider chain (env, profile, instance role), never from this struct.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub bucket: String,
    pub region: String,
    pub endpoint_url: Option<String>,
    pub request_timeout_secs: u64,
}

/// Command-line configuration. Only the bind address is settable here;
/// everything else comes from the environment.
#[derive(Parser, Debug)]
#[command(author, version, about = "Read-only S3 file gateway")]
pub struct Args {
    /// Host to bind to (overrides FILE_GATEWAY_HOST)
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind to (overrides PORT)
    #[arg(long)]
    pub port: Option<u16>,
}

impl AppConfig {
    /// Parse environment variables + CLI args into AppConfig.
    pub fn from_env_and_args() -> Result<Self> {
        Self::from_env(Args::parse())
    }

    /// Resolve configuration from the environment, letting `args` override
    /// the bind address. Split out so tests can drive it without a CLI.
    fn from_env(args: Args) -> Result<Self> {
        // --- Environment fallback ---
        let env_host = env::var("FILE_GATEWAY_HOST").unwrap_or_else(|_| "0.0.0.0".into());
        let env_port = match env::var("PORT") {
            Ok(value) => value
                .parse::<u16>()
                .with_context(|| format!("parsing PORT value `{}`", value))?,
            Err(env::VarError::NotPresent) => 8000,
            Err(err) => return Err(err).context("reading PORT"),
        };

        let bucket = env::var("S3_BUCKET_NAME")
            .context("S3_BUCKET_NAME must be set to the bucket this gateway serves")?;
        if bucket.trim().is_empty() {
            anyhow::bail!("S3_BUCKET_NAME must not be empty");
        }

        let region = env::var("AWS_REGION").unwrap_or_else(|_| "eu-west-1".into());
        let endpoint_url = env::var("AWS_ENDPOINT_URL").ok();

        let request_timeout_secs = match env::var("FILE_GATEWAY_TIMEOUT_SECS") {
            Ok(value) => value.parse::<u64>().with_context(|| {
                format!("parsing FILE_GATEWAY_TIMEOUT_SECS value `{}`", value)
            })?,
            Err(env::VarError::NotPresent) => 120,
            Err(err) => return Err(err).context("reading FILE_GATEWAY_TIMEOUT_SECS"),
        };

        // --- Merge ---
        Ok(Self {
            host: args.host.unwrap_or(env_host),
            port: args.port.unwrap_or(env_port),
            bucket,
            region,
            endpoint_url,
            request_timeout_secs,
        })
    }

    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Environment variables are process-global and the test harness runs
    // tests concurrently, so every env-dependent assertion lives in this one
    // test.
    #[test]
    fn resolves_env_with_defaults_and_overrides() {
        // SAFETY: no other test in this binary reads or writes these
        // variables.
        unsafe {
            env::set_var("S3_BUCKET_NAME", "unit-bucket");
            env::remove_var("FILE_GATEWAY_HOST");
            env::remove_var("PORT");
            env::remove_var("AWS_REGION");
            env::remove_var("AWS_ENDPOINT_URL");
            env::remove_var("FILE_GATEWAY_TIMEOUT_SECS");
        }

        let cfg = AppConfig::from_env(Args {
            host: None,
            port: None,
        })
        .unwrap();
        assert_eq!(cfg.host, "0.0.0.0");
        assert_eq!(cfg.port, 8000);
        assert_eq!(cfg.bucket, "unit-bucket");
        assert_eq!(cfg.region, "eu-west-1");
        assert_eq!(cfg.endpoint_url, None);
        assert_eq!(cfg.request_timeout_secs, 120);
        assert_eq!(cfg.addr(), "0.0.0.0:8000");

        // SAFETY: as above.
        unsafe {
            env::set_var("PORT", "9000");
            env::set_var("AWS_REGION", "us-east-1");
            env::set_var("AWS_ENDPOINT_URL", "http://localhost:9000");
            env::set_var("FILE_GATEWAY_TIMEOUT_SECS", "30");
        }

        let cfg = AppConfig::from_env(Args {
            host: Some("127.0.0.1".into()),
            port: Some(4000),
        })
        .unwrap();
        assert_eq!(cfg.host, "127.0.0.1");
        assert_eq!(cfg.port, 4000);
        assert_eq!(cfg.region, "us-east-1");
        assert_eq!(cfg.endpoint_url.as_deref(), Some("http://localhost:9000"));
        assert_eq!(cfg.request_timeout_secs, 30);

        // SAFETY: as above.
        unsafe {
            env::set_var("PORT", "not-a-port");
        }
        let err = AppConfig::from_env(Args {
            host: None,
            port: None,
        })
        .unwrap_err();
        assert!(err.to_string().contains("PORT"));

        // SAFETY: as above.
        unsafe {
            env::remove_var("PORT");
            env::set_var("S3_BUCKET_NAME", "  ");
        }
        assert!(
            AppConfig::from_env(Args {
                host: None,
                port: None,
            })
            .is_err()
        );

        // SAFETY: as above.
        unsafe {
            env::remove_var("S3_BUCKET_NAME");
        }
        assert!(
            AppConfig::from_env(Args {
                host: None,
                port: None,
            })
            .is_err()
        );

        // SAFETY: leave the environment clean for the rest of the binary.
        unsafe {
            env::remove_var("AWS_REGION");
            env::remove_var("AWS_ENDPOINT_URL");
            env::remove_var("FILE_GATEWAY_TIMEOUT_SECS");
        }
    }
}
