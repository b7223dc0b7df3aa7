//! Clock settings loaded from files and the environment.
//!
//! Two keys are understood: `tick_ns`, the tick length in nanoseconds, and
//! `framerate`, in frames per second. `tick_ns` wins when both are set;
//! without either the clock runs at [`DEFAULT_FRAMERATE`].
//!
//! Environment variables use the `TICKTOCK_` prefix, e.g.
//! `TICKTOCK_FRAMERATE=30`, and override values read from files.
use std::path::Path;

use ::config::{Config, ConfigError, Environment, File};
use log::{debug, info};

use crate::{
    clock::Clock,
    error::{Error, ErrorKind},
    time::{Duration, Instant},
    util,
};

/// Framerate used when no other timing is configured.
pub const DEFAULT_FRAMERATE: f64 = 60.0;

/// Prefix for environment overrides.
pub const ENV_PREFIX: &str = "TICKTOCK";

const KEY_FRAMERATE: &str = "framerate";
const KEY_TICK_NS: &str = "tick_ns";

/// Validated clock settings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClockConfig {
    /// Length of a single tick
    pub tick_len: Duration,
}

impl ClockConfig {
    /// Settings for a given framerate.
    pub fn framerate(fps: f64) -> Result<ClockConfig, Error> {
        Ok(ClockConfig {
            tick_len: util::frame_duration(fps)?,
        })
    }

    /// Read settings from an already built `config::Config`.
    pub fn from_config(cfg: &Config) -> Result<ClockConfig, Error> {
        match cfg.get_int(KEY_TICK_NS) {
            Ok(ns) => {
                let ns = u64::try_from(ns).map_err(|_| {
                    Error::new(ErrorKind::Config(format!(
                        "{} must not be negative, got {}",
                        KEY_TICK_NS, ns
                    )))
                })?;
                debug!("Configured tick length {}ns", ns);
                return Ok(ClockConfig {
                    tick_len: util::non_zero(Duration::from_nanos(ns))?,
                });
            }
            Err(ConfigError::NotFound(_)) => {}
            Err(e) => return Err(e.into()),
        }

        let fps = match cfg.get_float(KEY_FRAMERATE) {
            Ok(fps) => fps,
            Err(ConfigError::NotFound(_)) => DEFAULT_FRAMERATE,
            Err(e) => return Err(e.into()),
        };
        debug!("Configured framerate {}", fps);
        ClockConfig::framerate(fps)
    }

    /// Read settings from `TICKTOCK_*` environment variables.
    pub fn from_env() -> Result<ClockConfig, Error> {
        ClockConfig::load(None, Environment::with_prefix(ENV_PREFIX))
    }

    /// Read settings from a file, with environment overrides.
    ///
    /// The format is picked from the file extension.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<ClockConfig, Error> {
        ClockConfig::load(Some(path.as_ref()), Environment::with_prefix(ENV_PREFIX))
    }

    fn load(path: Option<&Path>, env: Environment) -> Result<ClockConfig, Error> {
        let mut builder = Config::builder();
        if let Some(path) = path {
            info!("Loading clock configuration from {}", path.display());
            builder = builder.add_source(File::from(path));
        }

        let cfg = builder.add_source(env).build()?;
        ClockConfig::from_config(&cfg)
    }

    /// A clock with these settings, starting now.
    pub fn clock(&self) -> Clock {
        self.clock_with_start_time(Instant::now())
    }

    /// A clock with these settings, starting at `start`.
    pub fn clock_with_start_time(&self, start: Instant) -> Clock {
        Clock::new_with_start_time(self.tick_len, start)
    }
}

impl Default for ClockConfig {
    fn default() -> ClockConfig {
        ClockConfig {
            tick_len: Duration::from_secs_f64(1.0 / DEFAULT_FRAMERATE),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ::config::{FileFormat, Map};
    use std::io::Write;

    fn from_toml(s: &str) -> Result<ClockConfig, Error> {
        let cfg = Config::builder()
            .add_source(File::from_str(s, FileFormat::Toml))
            .build()?;
        ClockConfig::from_config(&cfg)
    }

    #[test]
    fn defaults_to_sixty_fps() {
        let cfg = from_toml("").unwrap();
        assert_eq!(cfg, ClockConfig::default());
        assert_eq!(cfg.tick_len.as_micros(), 16_666);
    }

    #[test]
    fn framerate_key() {
        let cfg = from_toml("framerate = 50.0").unwrap();
        assert_eq!(cfg.tick_len, Duration::from_millis(20));

        let start = Instant::now();
        let clock = cfg.clock_with_start_time(start);
        assert_eq!(clock.started_at(), start);
        assert_eq!(clock.tick_len(), Duration::from_millis(20));
    }

    #[test]
    fn tick_ns_wins() {
        let cfg = from_toml("framerate = 50.0\ntick_ns = 1000").unwrap();
        assert_eq!(cfg.tick_len, Duration::from_micros(1));
    }

    #[test]
    fn invalid_values() {
        let err = from_toml("framerate = -5.0").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::InvalidFramerate(-5.0));

        let err = from_toml("tick_ns = 0").unwrap_err();
        assert_eq!(err.kind(), &ErrorKind::ZeroInterval);

        let err = from_toml("framerate = \"fast\"").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Config(_)));
    }

    fn env(vars: &[(&str, &str)]) -> Environment {
        let vars: Map<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Environment::with_prefix(ENV_PREFIX).source(Some(vars))
    }

    fn toml_file(contents: &str) -> tempfile::NamedTempFile {
        let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file
    }

    #[test]
    fn negative_tick_ns() {
        let err = from_toml("tick_ns = -5").unwrap_err();
        match err.kind() {
            ErrorKind::Config(message) => assert!(message.contains("tick_ns")),
            other => panic!("unexpected kind: {}", other),
        }
    }

    #[test]
    fn framerate_from_env() {
        let cfg = ClockConfig::load(None, env(&[("TICKTOCK_FRAMERATE", "30")])).unwrap();
        assert_eq!(cfg, ClockConfig::framerate(30.0).unwrap());

        let cfg = ClockConfig::load(None, env(&[])).unwrap();
        assert_eq!(cfg, ClockConfig::default());
    }

    #[test]
    fn settings_from_file() {
        let file = toml_file("framerate = 50.0\n");

        let cfg = ClockConfig::load(Some(file.path()), env(&[])).unwrap();
        assert_eq!(cfg.tick_len, Duration::from_millis(20));
    }

    #[test]
    fn env_overrides_file() {
        let file = toml_file("framerate = 50.0\n");

        let cfg = ClockConfig::load(Some(file.path()), env(&[("TICKTOCK_TICK_NS", "2000")])).unwrap();
        assert_eq!(cfg.tick_len, Duration::from_micros(2));

        let cfg = ClockConfig::load(Some(file.path()), env(&[("TICKTOCK_FRAMERATE", "25")])).unwrap();
        assert_eq!(cfg.tick_len, Duration::from_millis(40));
    }

    #[test]
    fn missing_file() {
        let err = ClockConfig::from_file("/nonexistent/ticktock.toml").unwrap_err();
        assert!(matches!(err.kind(), ErrorKind::Config(_)));
    }
}
