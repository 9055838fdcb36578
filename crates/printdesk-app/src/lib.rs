//! PrintDesk Application
//!
//! Command-line shell that replays a scripted editing session against an
//! in-memory surface and optionally persists the result.

mod script;
mod session;

pub use script::{Step, parse_combo, parse_script};
pub use session::{Session, SessionStats};

use printdesk_canvas::ShortcutRegistry;
use printdesk_core::{
    ConfigError, DesignError, DesignState, EditorConfig, EditorError, FileStorage, StorageError,
};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    Usage(String),
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("Invalid design: {0}")]
    Design(#[from] DesignError),
    #[error(transparent)]
    Storage(#[from] StorageError),
    #[error(transparent)]
    Editor(#[from] EditorError),
}

pub const USAGE: &str = "usage: printdesk <script.json> [--config <file>] \
     [--load <design.json>] [--save <key>] [--store <dir>]";

/// Command-line arguments.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    pub script: PathBuf,
    pub config: Option<PathBuf>,
    pub load: Option<PathBuf>,
    pub save: Option<String>,
    pub store: Option<PathBuf>,
}

impl Args {
    /// Parse arguments, excluding the program name.
    pub fn parse<I: IntoIterator<Item = String>>(args: I) -> Result<Self, AppError> {
        let mut script = None;
        let mut parsed = Args::default();
        let mut args = args.into_iter();

        while let Some(arg) = args.next() {
            let mut value = |flag: &str| {
                args.next()
                    .ok_or_else(|| AppError::Usage(format!("{} needs a value\n{}", flag, USAGE)))
            };
            match arg.as_str() {
                "--config" => parsed.config = Some(value("--config")?.into()),
                "--load" => parsed.load = Some(value("--load")?.into()),
                "--save" => parsed.save = Some(value("--save")?),
                "--store" => parsed.store = Some(value("--store")?.into()),
                flag if flag.starts_with("--") => {
                    return Err(AppError::Usage(format!("unknown option {}\n{}", flag, USAGE)));
                }
                _ if script.is_some() => {
                    return Err(AppError::Usage(format!("unexpected argument {}\n{}", arg, USAGE)));
                }
                _ => script = Some(PathBuf::from(&arg)),
            }
        }

        parsed.script = script.ok_or_else(|| AppError::Usage(USAGE.to_string()))?;
        Ok(parsed)
    }
}

fn read(path: &Path) -> Result<String, AppError> {
    std::fs::read_to_string(path).map_err(|source| AppError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn storage_for(args: &Args) -> Result<FileStorage, AppError> {
    Ok(match &args.store {
        Some(dir) => FileStorage::new(dir.clone())?,
        None => FileStorage::default_location()?,
    })
}

/// Replay the session described by `args`.
pub async fn run(args: &Args) -> Result<Session, AppError> {
    let config = match &args.config {
        Some(path) => EditorConfig::load(path)?,
        None => EditorConfig::default(),
    };

    let json = read(&args.script)?;
    let steps = parse_script(&json).map_err(|source| AppError::Json {
        path: args.script.clone(),
        source,
    })?;

    let mut session = Session::new(config);
    if let Some(path) = &args.load {
        let state = DesignState::from_json(&read(path)?).map_err(|source| AppError::Json {
            path: path.clone(),
            source,
        })?;
        session.editor_mut().load_design(state)?;
        session.resync();
        log::info!("Loaded design from {}", path.display());
    }

    log::info!("Replaying {} steps from {}", steps.len(), args.script.display());
    ShortcutRegistry::log_all();
    session.run(&steps);

    if let Some(key) = &args.save {
        let storage = storage_for(args)?;
        session.editor().save_to(&storage, key).await?;
        log::info!("Saved {} under {}", key, storage.base_path().display());
    }

    Ok(session)
}

#[cfg(test)]
mod tests {
    use super::*;
    use printdesk_core::Storage;

    fn args(list: &[&str]) -> Result<Args, AppError> {
        Args::parse(list.iter().map(|s| s.to_string()))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args(&["session.json", "--save", "shirt", "--store", "/tmp/designs"]).unwrap();
        assert_eq!(parsed.script, PathBuf::from("session.json"));
        assert_eq!(parsed.save.as_deref(), Some("shirt"));
        assert_eq!(parsed.store, Some(PathBuf::from("/tmp/designs")));
        assert!(parsed.config.is_none());
    }

    #[test]
    fn test_parse_args_errors() {
        assert!(matches!(args(&[]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.json", "--save"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.json", "--bogus"]), Err(AppError::Usage(_))));
        assert!(matches!(args(&["a.json", "b.json"]), Err(AppError::Usage(_))));
    }

    #[test]
    fn test_run_script_and_save() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("session.json");
        std::fs::write(
            &script,
            r#"[
                {"op": "dispatch", "action": {"type": "setName", "value": "Club tee"}},
                {"op": "dispatch", "action": {"type": "setProductColor", "value": "navy"}},
                {"op": "undo"}
            ]"#,
        )
        .unwrap();

        let parsed = Args {
            script,
            save: Some("club".into()),
            store: Some(dir.path().join("store")),
            ..Args::default()
        };
        let session = pollster::block_on(run(&parsed)).unwrap();
        assert_eq!(session.editor().present().name, "Club tee");
        assert_eq!(session.editor().present().product_color, "white");

        let storage = FileStorage::new(dir.path().join("store")).unwrap();
        let saved = pollster::block_on(storage.load("club")).unwrap();
        assert_eq!(&saved, session.editor().present());
    }

    #[test]
    fn test_run_rejects_invalid_design() {
        let dir = tempfile::tempdir().unwrap();
        let script = dir.path().join("session.json");
        std::fs::write(&script, "[]").unwrap();
        let design = dir.path().join("design.json");
        let mut state = DesignState::default();
        state.width = 0.0;
        std::fs::write(&design, state.to_json().unwrap()).unwrap();

        let parsed = Args {
            script,
            load: Some(design),
            ..Args::default()
        };
        assert!(matches!(
            pollster::block_on(run(&parsed)),
            Err(AppError::Design(DesignError::InvalidCanvasSize { .. }))
        ));
    }

    #[test]
    fn test_missing_script() {
        let parsed = Args {
            script: PathBuf::from("/no/such/script.json"),
            ..Args::default()
        };
        assert!(matches!(pollster::block_on(run(&parsed)), Err(AppError::Io { .. })));
    }
}
