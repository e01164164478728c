//! Storage commands: mount, unmount, release, slots, label, mediatype, storage.

use consel_core::SelectError;
use consel_core::config::ConsoleSettings;
use consel_core::console::Console;
use consel_core::select::{
    get_media_type, get_pool_dbr, get_storage_dbr, get_storage_drive, get_storage_resource,
    get_storage_slot,
};
use consel_core::slots::get_user_slot_list;
use consel_core::types::{RecordKind, StorageResource};
use consel_core::validation::validate_name;
use serde_json::json;

use super::{CommandResult, reject};
use crate::output::{Outcome, named};

fn slot_text(slot: Option<u32>) -> String {
    slot.map_or_else(String::new, |s| format!(" slot {s}"))
}

/// `mount [storage] [drive=N] [slot=N]`
pub fn mount(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let store = get_storage_resource(console, true, false)?;
    let drive = get_storage_drive(console, store)?;
    let slot = get_storage_slot(console, store)?;

    Ok(Outcome::new(
        format!("Mount requested on Storage \"{}\" drive {drive}{}.", store.name, slot_text(slot)),
        json!({ "storage": store.name, "drive": drive, "slot": slot }),
    ))
}

pub fn unmount(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    drive_action(console, "Unmount")
}

pub fn release(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    drive_action(console, "Release")
}

fn drive_action(console: &mut Console<'_>, action: &str) -> CommandResult {
    let store = get_storage_resource(console, true, false)?;
    let drive = get_storage_drive(console, store)?;
    Ok(Outcome::new(
        format!("{action} requested on Storage \"{}\" drive {drive}.", store.name),
        json!({ "storage": store.name, "drive": drive }),
    ))
}

fn require_changer(console: &mut Console<'_>, store: &StorageResource) -> Result<(), SelectError> {
    if store.autochanger {
        return Ok(());
    }
    Err(reject(
        console,
        &format!("Storage \"{}\" is not an autochanger.", store.name),
        &store.name,
    ))
}

/// `slots [storage=..] [slots=LIST]`, autochangers only.
pub fn slots(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let store = get_storage_resource(console, false, true)?;
    require_changer(console, store)?;
    let selected = get_user_slot_list(console, "slots", store.slots)?;

    let list: Vec<u32> = selected.iter_set().collect();
    let text = list.iter().map(u32::to_string).collect::<Vec<_>>().join(",");
    Ok(Outcome::new(
        format!("{} slots selected on Storage \"{}\": {text}", list.len(), store.name),
        json!({ "storage": store.name, "slots": list }),
    ))
}

/// `label [storage=..] [pool=..] [volume=NAME] [drive=N] [slot=N]`
pub fn label(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let store = get_storage_resource(console, false, false)?;

    let args = console.args;
    let volume = match args.find_arg_with_value("volume").and_then(|i| args.value(i)) {
        Some(name) => name.to_owned(),
        None => console.read_answer("Enter new Volume name: ")?.trim().to_owned(),
    };
    if let Err(err) = validate_name(&volume) {
        return Err(reject(console, &err.to_string(), &volume));
    }
    match console.catalog.lookup_by_name(RecordKind::Media, &volume) {
        Ok(None) => {},
        Ok(Some(_)) => {
            let msg = format!("Media record for new Volume \"{volume}\" already exists.");
            return Err(reject(console, &msg, &volume));
        },
        Err(err) => {
            console.error(&err.to_string());
            return Err(err.into());
        },
    }

    let pool = get_pool_dbr(console, None, "pool")?;
    let drive = get_storage_drive(console, store)?;
    let slot = get_storage_slot(console, store)?;

    Ok(Outcome::new(
        format!(
            "Label Volume \"{volume}\" in Pool \"{}\" on Storage \"{}\" drive {drive}{}.",
            pool.name,
            store.name,
            slot_text(slot)
        ),
        json!({
            "volume": volume,
            "pool": pool.name,
            "storage": store.name,
            "drive": drive,
            "slot": slot,
        }),
    ))
}

pub fn mediatype(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let media_type = get_media_type(console)?;
    Ok(Outcome::new(format!("Media Type: {media_type}"), json!({ "media_type": media_type })))
}

/// Storage catalog record; the `recyclestorage` menu also offers `*None*`.
pub fn storage(console: &mut Console<'_>, _: &ConsoleSettings) -> CommandResult {
    let keyword = if console.args.find_arg("recyclestorage").is_some() {
        "recyclestorage"
    } else {
        "storage"
    };
    let record = get_storage_dbr(console, None, keyword)?;
    let message = if record.is_none_sentinel() {
        "No Storage selected.".to_owned()
    } else {
        format!("Storage \"{}\" (StorageId {}).", record.name, record.id)
    };
    let mut data = named("storage", &record.name);
    data["id"] = json!(record.id);
    Ok(Outcome::new(message, data))
}
