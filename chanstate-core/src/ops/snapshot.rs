//! Save and recall every live channel of an engine to and from a file.
//!
//! The document is fully built (save) or fully parsed (recall) before any
//! side effect, so a call either transfers every channel it can or changes
//! nothing. File I/O is synchronous, see [`crate::ops::text`].

use std::collections::HashMap;
use std::path::Path;

use chanstate_types::{ChannelKind, ChannelValue, ErrorKind, Phase, StateError, Value};

use super::text::{read_text, write_text};
use super::{fail, soft, OpResult};
use crate::channels::ChannelHost;
use crate::config::Config;
use crate::document::StateDocument;

/// What `recall` did with each key of the snapshot file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecallReport {
    pub applied: Vec<String>,
    pub ignored: Vec<String>,
    /// Keys with no live channel of the matching kind.
    pub skipped: Vec<String>,
}

pub struct ChannelSnapshot<'a, H: ChannelHost> {
    host: &'a mut H,
    config: &'a Config,
    phase: Phase,
}

impl<'a, H: ChannelHost> ChannelSnapshot<'a, H> {
    pub fn new(host: &'a mut H, config: &'a Config, phase: Phase) -> Self {
        Self {
            host,
            config,
            phase,
        }
    }

    /// Capture every control and string channel into a document.
    ///
    /// A control channel holding NaN or an infinity has no JSON form, so the
    /// whole capture fails with `InvalidNumber` rather than leaving it out.
    pub fn capture(&self) -> Result<StateDocument, StateError> {
        let mut doc = StateDocument::new();
        for info in self.host.list_channels() {
            match self.host.read_channel(&info.name, info.kind) {
                Some(ChannelValue::Control(v)) if v.is_finite() => {
                    doc.merge(info.name, Value::Number(v));
                }
                Some(ChannelValue::Control(v)) => {
                    return Err(StateError::new(
                        ErrorKind::InvalidNumber,
                        format!("channel {} holds {}, which cannot be saved", info.name, v),
                    ));
                }
                Some(ChannelValue::Text(s)) => {
                    let s = if self.config.normalize_separators() {
                        s.replace('\\', "/")
                    } else {
                        s
                    };
                    doc.merge(info.name, Value::String(s));
                }
                None => {}
            }
        }
        Ok(doc)
    }

    /// Write all channel values to `path`. Returns how many channels were saved.
    pub fn save(&self, path: &Path) -> OpResult<usize> {
        if path.as_os_str().is_empty() {
            return Err(soft("snapshot", "save", self.phase, StateError::empty_payload("filename")));
        }
        let doc = self.capture().map_err(|e| soft("snapshot", "save", self.phase, e))?;
        let text = doc.serialize_pretty(self.config.snapshot_indent());
        write_text(&text, path, false).map_err(|e| soft("snapshot", "save", self.phase, e))?;
        log::debug!(target: "snapshot", "saved {} channels to {}", doc.len(), path.display());
        Ok(doc.len())
    }

    /// Load `path` and push its values into matching channels, except those
    /// named in `ignore`.
    pub fn recall<S: AsRef<str>>(&mut self, path: &Path, ignore: &[S]) -> OpResult<RecallReport> {
        if path.as_os_str().is_empty() {
            return Err(soft("snapshot", "recall", self.phase, StateError::empty_payload("filename")));
        }
        let text = read_text(path).map_err(|e| soft("snapshot", "recall", self.phase, e))?;
        if text.trim().is_empty() {
            let e = StateError::parse(format!("snapshot file {} is empty", path.display()));
            return Err(fail("snapshot", "recall", self.phase, e));
        }
        let doc = StateDocument::parse(&text).map_err(|e| {
            let e = StateError::parse(format!("found invalid JSON data in {}: {}", path.display(), e.detail));
            fail("snapshot", "recall", self.phase, e)
        })?;

        let kinds: HashMap<String, ChannelKind> = self
            .host
            .list_channels()
            .into_iter()
            .map(|c| (c.name, c.kind))
            .collect();

        let mut report = RecallReport::default();
        for (name, value) in doc.iter() {
            if ignore.iter().any(|i| i.as_ref() == name) {
                report.ignored.push(name.to_string());
                continue;
            }
            let target = match (value, kinds.get(name)) {
                (Value::Number(v), Some(ChannelKind::Control)) => Some(ChannelValue::Control(*v)),
                (Value::String(s), Some(ChannelKind::String)) => Some(ChannelValue::Text(s.clone())),
                _ => None,
            };
            let written = match target {
                Some(v) => self.host.write_channel(name, v),
                None => false,
            };
            if written {
                report.applied.push(name.to_string());
            } else {
                report.skipped.push(name.to_string());
            }
        }
        log::debug!(
            target: "snapshot",
            "recalled {} channels from {} ({} ignored, {} skipped)",
            report.applied.len(),
            path.display(),
            report.ignored.len(),
            report.skipped.len()
        );
        Ok(report)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::MemoryChannels;

    fn channels() -> MemoryChannels {
        let mut channels = MemoryChannels::new();
        channels.declare_control("gain", 0.5);
        channels.declare_string("label", "hi");
        channels
    }

    #[test]
    fn capture_normalizes_text_separators_only() {
        let mut host = channels();
        host.declare_string("file", "C:\\samples\\kick.wav");
        let config = Config::embedded();
        let doc = ChannelSnapshot::new(&mut host, &config, Phase::Init).capture().unwrap();
        assert_eq!(doc.get("file"), Some(&Value::from("C:/samples/kick.wav")));
        assert_eq!(doc.get("gain"), Some(&Value::Number(0.5)));
    }

    #[test]
    fn capture_can_keep_separators() {
        let mut host = MemoryChannels::new();
        host.declare_string("file", "a\\b");
        let mut config = Config::embedded();
        config.apply_overrides("[snapshot]\nnormalize_separators = false\n").unwrap();
        let doc = ChannelSnapshot::new(&mut host, &config, Phase::Init).capture().unwrap();
        assert_eq!(doc.get("file"), Some(&Value::from("a\\b")));
    }

    #[test]
    fn save_writes_indented_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        let mut host = channels();
        let config = Config::embedded();
        let saved = ChannelSnapshot::new(&mut host, &config, Phase::Init).save(&path).unwrap();
        assert_eq!(saved, 2);
        assert_eq!(
            std::fs::read_to_string(&path).unwrap(),
            "{\n    \"gain\": 0.5,\n    \"label\": \"hi\"\n}\n"
        );
    }

    #[test]
    fn recall_skips_unknown_and_mismatched_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        std::fs::write(
            &path,
            r#"{"gain": "loud", "label": "x", "ghost": 1, "steps": [1, 2]}"#,
        )
        .unwrap();

        let mut host = channels();
        let config = Config::embedded();
        let report = ChannelSnapshot::new(&mut host, &config, Phase::Perf)
            .recall(&path, &["steps"])
            .unwrap();
        assert_eq!(report.applied, vec!["label"]);
        assert_eq!(report.ignored, vec!["steps"]);
        assert_eq!(report.skipped, vec!["gain", "ghost"]);
        assert_eq!(host.control("gain"), Some(0.5));
        assert_eq!(host.text("label"), Some("x"));
    }

    #[test]
    fn recall_of_bad_content_changes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        std::fs::write(&path, r#"{"gain": 0.9, "label": "#).unwrap();

        let mut host = channels();
        let config = Config::embedded();
        let err = ChannelSnapshot::new(&mut host, &config, Phase::Init)
            .recall::<&str>(&path, &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(err.aborts_init());
        assert_eq!(host.control("gain"), Some(0.5));
    }

    #[test]
    fn save_refuses_non_finite_control_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        let mut host = channels();
        host.declare_control("broken", f64::NAN);
        let config = Config::embedded();
        let snapshot = ChannelSnapshot::new(&mut host, &config, Phase::Init);

        assert_eq!(snapshot.capture().unwrap_err().kind, ErrorKind::InvalidNumber);
        let err = snapshot.save(&path).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::InvalidNumber);
        assert!(!err.aborts_init());
        assert!(!path.exists());
    }

    #[test]
    fn recall_of_empty_file_fails_by_phase() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("f.json");
        std::fs::write(&path, " \n").unwrap();

        let mut host = channels();
        let config = Config::embedded();
        let err = ChannelSnapshot::new(&mut host, &config, Phase::Init)
            .recall::<&str>(&path, &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(err.aborts_init());

        let err = ChannelSnapshot::new(&mut host, &config, Phase::Perf)
            .recall::<&str>(&path, &[])
            .unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ParseFailure);
        assert!(!err.aborts_init());
        assert_eq!(host.control("gain"), Some(0.5));
        assert_eq!(host.text("label"), Some("hi"));
    }

    #[test]
    fn file_failures_are_soft_in_init_phase() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("missing").join("f.json");
        let mut host = channels();
        let config = Config::embedded();
        let mut snapshot = ChannelSnapshot::new(&mut host, &config, Phase::Init);

        let err = snapshot.recall::<&str>(&missing, &[]).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileUnavailable);
        assert!(!err.aborts_init());

        let err = snapshot.save(&missing).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::FileUnavailable);
        assert!(!err.aborts_init());

        let err = snapshot.save(Path::new("")).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::EmptyPayload);
        assert!(!err.aborts_init());
    }
}
