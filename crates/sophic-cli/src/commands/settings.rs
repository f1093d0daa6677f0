use std::ops::RangeInclusive;

use sophic_core::settings::{
    AppSettings, AUTO_SAVE_INTERVAL_RANGE, BACKUP_FREQUENCY_RANGE, DEFAULT_CATEGORY_MAX_CHARS,
    TEXT_SIZE_RANGE,
};

use crate::app::{AppContext, PASSPHRASE_ENV};
use crate::cli::SettingField;
use crate::errors::CliError;

pub fn handle_show(ctx: &AppContext, json: bool) -> anyhow::Result<()> {
    let settings = ctx.open_settings()?.load();
    if json {
        println!("{}", serde_json::to_string_pretty(&settings)?);
    } else {
        print_settings(&settings);
    }
    Ok(())
}

pub fn handle_set(ctx: &AppContext, field: SettingField, value: &str) -> anyhow::Result<()> {
    let store = ctx.open_settings()?;

    let accepted = match field {
        SettingField::TextSize => store.update_text_size(parse_number(field, value)?),
        SettingField::AutoSaveInterval => {
            store.update_auto_save_interval(parse_number(field, value)?)
        }
        SettingField::BackupFrequency => {
            store.update_backup_frequency(parse_number(field, value)?)
        }
        SettingField::Theme => store.update_theme(value),
        SettingField::DefaultCategory => store.update_default_category(value),
    };

    if !accepted && !store.is_writable() {
        return Err(CliError::auth_failed_with_hint(
            "Stored settings could not be decrypted; nothing was changed",
            format!(
                "Hint: Check {}, or run `sophic settings reset` to replace them.",
                PASSPHRASE_ENV
            ),
        )
        .into());
    }

    if !accepted {
        return Err(CliError::rejected(rejection_message(field, value)).into());
    }

    if !ctx.quiet() {
        let settings = store.load();
        println!("{} = {}", field_name(field), current_value(&settings, field));
    }
    Ok(())
}

pub fn handle_reset(ctx: &AppContext) -> anyhow::Result<()> {
    let defaults = ctx.open_settings()?.reset()?;
    if !ctx.quiet() {
        println!("Settings reset to defaults");
        print_settings(&defaults);
    }
    Ok(())
}

fn print_settings(settings: &AppSettings) {
    println!("text_size:          {}", settings.text_size());
    println!("auto_save_interval: {}s", settings.auto_save_interval());
    println!("backup_frequency:   {}h", settings.backup_frequency());
    println!("theme:              {}", settings.theme());
    println!("default_category:   {}", settings.default_category());
}

fn parse_number(field: SettingField, value: &str) -> anyhow::Result<i32> {
    value.trim().parse::<i32>().map_err(|_| {
        CliError::invalid_input(format!(
            "{} expects a whole number, got \"{}\"",
            field_name(field),
            value
        ))
        .into()
    })
}

fn field_name(field: SettingField) -> &'static str {
    match field {
        SettingField::TextSize => "text_size",
        SettingField::AutoSaveInterval => "auto_save_interval",
        SettingField::BackupFrequency => "backup_frequency",
        SettingField::Theme => "theme",
        SettingField::DefaultCategory => "default_category",
    }
}

fn current_value(settings: &AppSettings, field: SettingField) -> String {
    match field {
        SettingField::TextSize => settings.text_size().to_string(),
        SettingField::AutoSaveInterval => settings.auto_save_interval().to_string(),
        SettingField::BackupFrequency => settings.backup_frequency().to_string(),
        SettingField::Theme => settings.theme().to_string(),
        SettingField::DefaultCategory => settings.default_category().to_string(),
    }
}

fn range_hint(range: &RangeInclusive<i32>) -> String {
    format!("must be between {} and {}", range.start(), range.end())
}

fn rejection_message(field: SettingField, value: &str) -> String {
    let reason = match field {
        SettingField::TextSize => range_hint(&TEXT_SIZE_RANGE),
        SettingField::AutoSaveInterval => range_hint(&AUTO_SAVE_INTERVAL_RANGE),
        SettingField::BackupFrequency => range_hint(&BACKUP_FREQUENCY_RANGE),
        SettingField::DefaultCategory => format!(
            "must be at most {} characters after cleanup",
            DEFAULT_CATEGORY_MAX_CHARS
        ),
        SettingField::Theme => "could not be saved".to_string(),
    };
    format!(
        "Rejected {} \"{}\": {}",
        field_name(field),
        value.trim(),
        reason
    )
}
