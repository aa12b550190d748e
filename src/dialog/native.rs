//! Native dialog implementation of the prompt capability, plus the file
//! pickers used by open/save flows.

use std::path::PathBuf;

use rfd::{FileDialog, MessageButtons, MessageDialog, MessageDialogResult, MessageLevel};

use crate::constants::MAP_FILE_EXTENSIONS;

use super::{BasePathChoice, MapPrompts, TypeMismatchChoice};

/// Answers loader questions with blocking native message boxes.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeDialogs;

impl MapPrompts for NativeDialogs {
    fn confirm_unexpected_type(&self, found: &str) -> TypeMismatchChoice {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Warning)
            .set_title("Type \"map\" not specified in configuration file")
            .set_description(format!(
                "The type specified in the configuration is: {found}\n\
                 Trying to add this map could result in an error.\n\n\
                 Yes: set the type to \"map\" and continue\n\
                 No: add anyway"
            ))
            .set_buttons(MessageButtons::YesNoCancel)
            .show();
        match result {
            MessageDialogResult::Yes => TypeMismatchChoice::ForceMapType,
            MessageDialogResult::No => TypeMismatchChoice::AddAnyway,
            _ => TypeMismatchChoice::Cancel,
        }
    }

    fn choose_base_path(&self, existing: &str, file_directory: &str) -> BasePathChoice {
        let result = MessageDialog::new()
            .set_level(MessageLevel::Info)
            .set_title("Base path")
            .set_description(format!(
                "Redefine the base path?\n\
                 Current base path: {existing}\n\
                 If redefined it will point to the local directory {file_directory}"
            ))
            .set_buttons(MessageButtons::YesNo)
            .show();
        match result {
            MessageDialogResult::Yes => BasePathChoice::UseFileDirectory,
            _ => BasePathChoice::KeepExisting,
        }
    }
}

/// Open-file picker with the map-configuration extension conventions.
pub fn pick_map_file() -> Option<PathBuf> {
    FileDialog::new()
        .set_title("Select a configuration file")
        .add_filter("Configuration file", MAP_FILE_EXTENSIONS)
        .pick_file()
}

/// Save-file picker for exporting `map_name`.
pub fn pick_export_target(map_name: &str) -> Option<PathBuf> {
    FileDialog::new()
        .set_title(format!("Save {map_name} map"))
        .add_filter("JSON", &["map.json", "json"])
        .add_filter("mapconfig", &["mapconfig"])
        .set_file_name(format!("{map_name}.map.json"))
        .save_file()
}
