//! CLI commands for dialog files

use indexmap::IndexMap;
use std::path::Path;

use crate::config::EditorConfig;
use crate::dialog::{
    DecodedDialog, LocalizationTable, children_of, read_dialog, write_dialog, write_new_handles,
};

/// Load the localization table given on the command line, falling back to
/// the configured reference. An explicit path must exist.
fn load_localization(explicit: Option<&Path>) -> anyhow::Result<Option<LocalizationTable>> {
    if let Some(path) = explicit {
        return Ok(Some(LocalizationTable::read(path)?));
    }
    match configured_localization() {
        Some(path) => Ok(LocalizationTable::load_optional(path)?),
        None => Ok(None),
    }
}

fn configured_localization() -> Option<std::path::PathBuf> {
    match EditorConfig::load() {
        Ok(config) => config.resolved_localization_path(),
        Err(e) => {
            tracing::warn!("Ignoring config: {e}");
            None
        }
    }
}

fn remember_recent(path: &Path) {
    let result = EditorConfig::load().and_then(|mut config| {
        config.add_recent_file(&path.to_string_lossy());
        config.save()
    });
    if let Err(e) = result {
        tracing::debug!("Could not update recent files: {e}");
    }
}

fn print_warnings(decoded: &DecodedDialog) {
    if decoded.warnings.is_empty() {
        return;
    }
    println!("Warnings ({}):", decoded.warnings.len());
    for warning in &decoded.warnings {
        println!("  {warning}");
    }
}

pub fn inspect(source: &Path, localization: Option<&Path>, json: bool) -> anyhow::Result<()> {
    let table = load_localization(localization)?;
    let decoded = read_dialog(source, table.as_ref())?;
    remember_recent(source);

    if json {
        println!("{}", serde_json::to_string_pretty(&decoded.dialog)?);
        return Ok(());
    }

    let dialog = &decoded.dialog;
    println!("Dialog: {}", dialog.uuid);
    println!("Category: {}", dialog.category);
    if !dialog.timeline_id.is_empty() {
        println!("Timeline: {}", dialog.timeline_id);
    }
    println!("Speakers: {}", dialog.speakers.len());
    println!("Nodes: {}", dialog.node_count());

    let mut per_kind: IndexMap<&str, usize> = IndexMap::new();
    for node in dialog.nodes.values() {
        *per_kind.entry(node.kind.display_name()).or_default() += 1;
    }
    for (kind, count) in &per_kind {
        println!("  {kind:<14} {count}");
    }
    println!("Edges: {}", dialog.edges.len());

    let roots = dialog.root_nodes();
    if !roots.is_empty() {
        println!("Root nodes:");
        for node in roots {
            match node.kind.tagged_texts().and_then(|t| t.first()) {
                Some(text) if !text.text.is_empty() => println!("  {} {:?}", node.uuid, text.text),
                _ => println!("  {}", node.uuid),
            }
        }
    }

    print_warnings(&decoded);
    Ok(())
}

pub fn reencode(source: &Path, destination: &Path, localization: Option<&Path>) -> anyhow::Result<()> {
    let table = load_localization(localization)?;
    let decoded = read_dialog(source, table.as_ref())?;
    write_dialog(&decoded.dialog, destination)?;
    remember_recent(source);

    println!(
        "Re-encoded {} nodes to {}",
        decoded.dialog.node_count(),
        destination.display()
    );
    print_warnings(&decoded);
    Ok(())
}

pub fn export_loca(
    source: &Path,
    destination: &Path,
    reference: Option<&Path>,
    modification: bool,
) -> anyhow::Result<()> {
    let reference = match reference {
        Some(path) => LocalizationTable::load_optional(path)?,
        None => match configured_localization() {
            Some(path) => LocalizationTable::load_optional(path)?,
            None => None,
        },
    };
    let mut decoded = read_dialog(source, reference.as_ref())?;

    let default_modification = EditorConfig::load()
        .map(|c| c.is_modification_default)
        .unwrap_or(false);
    decoded.dialog.is_modification = modification || default_modification;

    let written = write_new_handles(&decoded.dialog, reference.as_ref(), destination)?;
    if written == 0 {
        println!("No new handles to export");
    } else {
        println!("Exported {written} handle(s) to {}", destination.display());
    }
    Ok(())
}

pub fn children(source: &Path, uuid: &str) -> anyhow::Result<()> {
    let decoded = read_dialog(source, None)?;
    let dialog = &decoded.dialog;
    let Some(node) = dialog.find_node(uuid) else {
        anyhow::bail!("No node with UUID {uuid} in {}", source.display());
    };

    println!("{} ({})", node.uuid, node.kind.display_name());
    for child in children_of(dialog, uuid) {
        let kind = dialog
            .node(&child)
            .map_or("?", |n| n.kind.display_name());
        println!("  -> {child} ({kind})");
    }
    Ok(())
}
