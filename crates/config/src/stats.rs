use serde::{Deserialize, Serialize};

/// Performance overlay panel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatsMode {
    Fps,
    Ms,
    Mb,
}

impl StatsMode {
    /// Numeric panel index used by overlay backends.
    pub const fn code(self) -> u8 {
        match self {
            Self::Fps => 0,
            Self::Ms => 1,
            Self::Mb => 2,
        }
    }
}

/// The `stats` setting: `false`, `true`, or a panel name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum StatsSetting {
    Toggle(bool),
    Mode(String),
}

impl Default for StatsSetting {
    fn default() -> Self {
        Self::Toggle(false)
    }
}

impl StatsSetting {
    /// Resolve to a panel, or `None` when the overlay is off.
    ///
    /// Anything other than `fps`, `ms` or `mb` (including a bare `true`)
    /// falls back to the fps panel and logs a warning.
    pub fn resolve(&self) -> Option<StatsMode> {
        match self {
            Self::Toggle(false) => None,
            Self::Mode(m) if m == "fps" => Some(StatsMode::Fps),
            Self::Mode(m) if m == "ms" => Some(StatsMode::Ms),
            Self::Mode(m) if m == "mb" => Some(StatsMode::Mb),
            other => {
                tracing::warn!(setting = ?other, "unknown stats mode, expected one of [fps, ms, mb]; using fps");
                Some(StatsMode::Fps)
            }
        }
    }

    pub fn is_enabled(&self) -> bool {
        !matches!(self, Self::Toggle(false))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};

    use super::*;

    #[test]
    fn named_modes() {
        assert_eq!(StatsSetting::Mode("fps".into()).resolve(), Some(StatsMode::Fps));
        assert_eq!(StatsSetting::Mode("ms".into()).resolve(), Some(StatsMode::Ms));
        assert_eq!(StatsSetting::Mode("mb".into()).resolve(), Some(StatsMode::Mb));
        assert_eq!(StatsMode::Fps.code(), 0);
        assert_eq!(StatsMode::Mb.code(), 2);
    }

    #[test]
    fn unknown_mode_falls_back_to_fps() {
        assert_eq!(StatsSetting::Mode("xyz".into()).resolve(), Some(StatsMode::Fps));
        assert_eq!(StatsSetting::Toggle(true).resolve(), Some(StatsMode::Fps));
    }

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for Captured {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn resolve_logged(setting: StatsSetting) -> (Option<StatsMode>, String) {
        let out = Captured::default();
        let writer = out.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let mode = tracing::subscriber::with_default(subscriber, || setting.resolve());
        let log = String::from_utf8(out.0.lock().unwrap().clone()).unwrap();
        (mode, log)
    }

    #[test]
    fn unknown_mode_logs_a_warning() {
        let (mode, log) = resolve_logged(StatsSetting::Mode("xyz".into()));
        assert_eq!(mode, Some(StatsMode::Fps));
        assert!(log.contains("WARN"), "log was {log:?}");
        assert!(log.contains("unknown stats mode"));
    }

    #[test]
    fn known_mode_logs_nothing() {
        let (mode, log) = resolve_logged(StatsSetting::Mode("fps".into()));
        assert_eq!(mode, Some(StatsMode::Fps));
        assert!(!log.contains("WARN"), "log was {log:?}");
    }

    #[test]
    fn disabled() {
        assert_eq!(StatsSetting::Toggle(false).resolve(), None);
        assert!(!StatsSetting::default().is_enabled());
        assert!(StatsSetting::Mode("xyz".into()).is_enabled());
    }

    #[test]
    fn deserializes_bool_or_string() {
        let s: StatsSetting = serde_json::from_str("true").unwrap();
        assert_eq!(s, StatsSetting::Toggle(true));
        let s: StatsSetting = serde_json::from_str("\"mb\"").unwrap();
        assert_eq!(s, StatsSetting::Mode("mb".into()));
    }
}
