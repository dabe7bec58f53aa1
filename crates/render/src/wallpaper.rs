//! Current desktop wallpaper lookup (GNOME settings)

use gtk4::gio;
use gtk4::gio::prelude::*;
use log::debug;
use std::path::PathBuf;

const BACKGROUND_SCHEMA: &str = "org.gnome.desktop.background";
const INTERFACE_SCHEMA: &str = "org.gnome.desktop.interface";

/// Open a settings schema only if it is installed; `gio::Settings::new`
/// aborts the process on unknown schemas
fn settings_for(schema_id: &str) -> Option<(gio::Settings, gio::SettingsSchema)> {
    let source = gio::SettingsSchemaSource::default()?;
    let schema = source.lookup(schema_id, true)?;
    Some((gio::Settings::new(schema_id), schema))
}

fn prefers_dark() -> bool {
    settings_for(INTERFACE_SCHEMA)
        .filter(|(_, schema)| schema.has_key("color-scheme"))
        .map(|(settings, _)| settings.string("color-scheme").as_str() == "prefer-dark")
        .unwrap_or(false)
}

/// Path of the wallpaper the desktop is showing, if it can be determined
pub fn current_wallpaper() -> Option<PathBuf> {
    let (settings, schema) = settings_for(BACKGROUND_SCHEMA)?;

    let key = if prefers_dark() && schema.has_key("picture-uri-dark") {
        "picture-uri-dark"
    } else {
        "picture-uri"
    };
    let uri = settings.string(key);
    debug!("Wallpaper setting {} = {:?}", key, uri);

    uri_to_path(&uri)
}

/// Convert a `file://` URI (or bare path) from the settings into a path
pub fn uri_to_path(uri: &str) -> Option<PathBuf> {
    let uri = uri.trim();
    if uri.is_empty() {
        return None;
    }
    if uri.contains("://") {
        gio::File::for_uri(uri).path()
    } else {
        Some(PathBuf::from(uri))
    }
}
