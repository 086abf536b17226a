use crate::commands::{Change, CmdMessage, CmdResult};
use crate::error::Result;
use crate::settings::{ExportSettings, SETTING_KEYS};
use crate::store::BlobStore;
use tracing::debug;

#[derive(Debug, Clone)]
pub enum SettingsAction {
    ShowAll,
    ShowKey(String),
    Set(String, String),
    Reset,
}

pub fn run<S: BlobStore + ?Sized>(
    store: &mut S,
    settings: &mut ExportSettings,
    action: SettingsAction,
) -> Result<CmdResult> {
    match action {
        SettingsAction::ShowAll => Ok(CmdResult::default().with_settings(settings.clone())),
        SettingsAction::ShowKey(key) => {
            let mut result = CmdResult::default();
            match settings.get(&key) {
                Some(value) => result.add_message(CmdMessage::info(value)),
                None => result.add_message(CmdMessage::error(format!(
                    "Unknown setting: {} (known: {})",
                    key,
                    SETTING_KEYS.join(", ")
                ))),
            }
            Ok(result)
        }
        SettingsAction::Set(key, value) => {
            let mut draft = settings.clone();
            if let Err(e) = draft.set(&key, &value) {
                return Ok(CmdResult::default().with_message(CmdMessage::error(e)));
            }
            draft.save(store)?;
            *settings = draft;
            debug!(key = %key, "export setting changed");

            let display = settings.get(&key).unwrap_or(value);
            Ok(CmdResult::default()
                .with_message(CmdMessage::success(format!("{} set to {}", key, display)))
                .with_changes(&[Change::Settings])
                .with_settings(settings.clone()))
        }
        SettingsAction::Reset => {
            let defaults = ExportSettings::default();
            defaults.save(store)?;
            *settings = defaults;
            debug!("export settings reset");
            Ok(CmdResult::default()
                .with_message(CmdMessage::success("Export settings reset to defaults"))
                .with_changes(&[Change::Settings])
                .with_settings(settings.clone()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::store::memory::InMemoryStore;

    #[test]
    fn set_persists_and_shows() {
        let mut store = InMemoryStore::new();
        let mut settings = ExportSettings::load(&store).unwrap();

        let result = run(
            &mut store,
            &mut settings,
            SettingsAction::Set("font-size".into(), "14".into()),
        )
        .unwrap();
        assert_eq!(result.changes, vec![Change::Settings]);
        assert_eq!(settings.font_size, 14.0);
        assert_eq!(ExportSettings::load(&store).unwrap().font_size, 14.0);

        let action = SettingsAction::ShowKey("font-size".into());
        let shown = run(&mut store, &mut settings, action).unwrap();
        assert_eq!(shown.messages[0].content, "14");
    }

    #[test]
    fn invalid_value_is_reported_not_saved() {
        let mut store = InMemoryStore::new();
        let mut settings = ExportSettings::load(&store).unwrap();

        let result = run(
            &mut store,
            &mut settings,
            SettingsAction::Set("title-color".into(), "groen".into()),
        )
        .unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
        assert!(!result.changed());
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn reset_restores_defaults() {
        let mut store = InMemoryStore::new();
        let mut settings = ExportSettings::load(&store).unwrap();
        let action = SettingsAction::Set("title".into(), "Najaar".into());
        run(&mut store, &mut settings, action).unwrap();

        run(&mut store, &mut settings, SettingsAction::Reset).unwrap();
        assert_eq!(settings.title, "Mijn Plantenlijst");
        assert_eq!(ExportSettings::load(&store).unwrap().title, "Mijn Plantenlijst");
    }

    #[test]
    fn unknown_key_is_an_error_message() {
        let mut store = InMemoryStore::new();
        let mut settings = ExportSettings::default();
        let action = SettingsAction::ShowKey("kleur".into());
        let result = run(&mut store, &mut settings, action).unwrap();
        assert_eq!(result.messages[0].level, MessageLevel::Error);
    }
}
