//! `Info.plist` generation.
//!
//! The descriptor is rendered from a fixed XML template. Values go through
//! handlebars' default escaping, which covers the characters XML reserves.

use crate::bundler::{Result, error::ErrorExt, settings::BundleSettings};
use handlebars::Handlebars;
use serde::Serialize;
use std::path::Path;

const TEMPLATE_NAME: &str = "info_plist";

const INFO_PLIST_TEMPLATE: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<!DOCTYPE plist PUBLIC "-//Apple//DTD PLIST 1.0//EN" "http://www.apple.com/DTDs/PropertyList-1.0.dtd">
<plist version="1.0">
<dict>
    <key>CFBundleExecutable</key>
    <string>{{executable}}</string>
    <key>CFBundleIdentifier</key>
    <string>{{identifier}}</string>
    <key>CFBundleDisplayName</key>
    <string>{{display_name}}</string>
    <key>CFBundleName</key>
    <string>{{name}}</string>
</dict>
</plist>
"#;

#[derive(Serialize)]
struct InfoPlistData<'a> {
    executable: &'a str,
    identifier: &'a str,
    display_name: &'a str,
    name: &'a str,
}

/// Renders the `Info.plist` document for `settings`.
pub fn render(settings: &BundleSettings) -> Result<String> {
    let mut handlebars = Handlebars::new();
    handlebars.set_strict_mode(true);
    handlebars.register_template_string(TEMPLATE_NAME, INFO_PLIST_TEMPLATE)?;

    let identifier = settings.bundle_identifier();
    let data = InfoPlistData {
        executable: settings.executable_name(),
        identifier: &identifier,
        display_name: settings.executable_name(),
        name: settings.executable_name(),
    };
    Ok(handlebars.render(TEMPLATE_NAME, &data)?)
}

/// Renders the descriptor and writes it to `path`, replacing any existing file.
pub async fn write(settings: &BundleSettings, path: &Path) -> Result<()> {
    let contents = render(settings)?;
    tokio::fs::write(path, contents)
        .await
        .fs_context("failed to write Info.plist", path)
}
