//! Integration test: row packing through the public registry.

use graft::engine::rows::row_name;
use graft::engine::section::section_name;
use graft::shared::constants::{SLOT_FULL, SLOT_LEFT, SLOT_RIGHT};
use graft::shared::Vec2;
use graft::tree::{FixtureOptions, HostFixture, NodeId, UiTree};
use graft::{
    ControlSpec, EngineConfig, LabelSpec, Language, LocalText, NativeSettings, SettingsTab,
};

const HALF: Vec2 = Vec2::new(300.0, 60.0);
const FULL: Vec2 = Vec2::new(2000.0, 80.0);

struct Panel {
    settings: NativeSettings,
    tab: SettingsTab,
    section: NodeId,
}

fn panel() -> Panel {
    let mut tree = UiTree::new();
    let host = HostFixture::build(&mut tree, &FixtureOptions::default());
    let settings = NativeSettings::init(
        tree.into_shared(),
        graft::prefs::shared(graft::prefs::MemoryStore::new()),
        EngineConfig::default(),
        Language::English,
    );
    settings.inject(host.settings, false).unwrap();
    let tab = settings.register_tab("pack", LocalText::new("pack", "", "Pack"), true);
    let section = settings
        .tree()
        .lock()
        .find_child(host.sections, &section_name("pack"))
        .unwrap();
    Panel {
        settings,
        tab,
        section,
    }
}

fn add(panel: &Panel, id: &str, size: Option<Vec2>) {
    let mut spec = LabelSpec::new(id, LocalText::new(id, "", id));
    if let Some(size) = size {
        spec = spec.preferred_size(size);
    }
    panel.tab.create_label(spec).unwrap();
}

/// Active rows as lists of the control names in their active slots.
fn layout(panel: &Panel) -> Vec<Vec<String>> {
    let tree = panel.settings.tree().lock();
    let mut rows = Vec::new();
    for index in 0.. {
        let Some(row) = tree.find_child(panel.section, &row_name(index)) else {
            break;
        };
        if !tree.is_active_self(row) {
            break;
        }
        let mut names = Vec::new();
        for slot in [SLOT_LEFT, SLOT_RIGHT, SLOT_FULL] {
            let Some(slot) = tree.find_child(row, slot) else {
                continue;
            };
            if !tree.is_active_self(slot) {
                continue;
            }
            names.extend(
                tree.children(slot)
                    .iter()
                    .filter(|&&child| tree.is_active_self(child))
                    .filter_map(|&child| tree.name(child))
                    .map(str::to_string),
            );
        }
        rows.push(names);
    }
    rows
}

fn row_height(panel: &Panel, index: usize) -> f32 {
    let tree = panel.settings.tree().lock();
    let row = tree.find_child(panel.section, &row_name(index)).unwrap();
    tree.rect(row).unwrap().size_delta.y
}

#[test]
fn test_no_preferred_size_keeps_host_layout() {
    let panel = panel();
    for id in ["one", "two", "three", "four"] {
        add(&panel, id, None);
    }

    let tree = panel.settings.tree().lock();
    let names: Vec<&str> = tree
        .children(panel.section)
        .iter()
        .filter_map(|&child| tree.name(child))
        .collect();
    assert_eq!(names, vec!["one", "two", "three", "four"]);
}

#[test]
fn test_half_width_rows() {
    for count in 1..=7usize {
        let panel = panel();
        for i in 0..count {
            add(&panel, &format!("c{i}"), Some(HALF));
        }

        let rows = layout(&panel);
        assert_eq!(rows.len(), count.div_ceil(2), "{count} controls");
        for (index, row) in rows.iter().enumerate() {
            let last = index + 1 == rows.len();
            if !last || count % 2 == 0 {
                assert_eq!(row.len(), 2, "row {index} of {count}");
            }
        }
    }
}

#[test]
fn test_four_halves_then_full() {
    let panel = panel();
    for id in ["a", "b", "c", "d"] {
        add(&panel, id, Some(HALF));
    }
    add(&panel, "wide", Some(FULL));

    assert_eq!(layout(&panel), vec![vec!["a", "b"], vec!["c", "d"], vec!["wide"]]);
    assert_eq!(row_height(&panel, 0), 64.0);
    assert_eq!(row_height(&panel, 2), 80.0);
}

#[test]
fn test_full_width_waits_for_open_right_slot() {
    let panel = panel();
    add(&panel, "a", Some(HALF));
    add(&panel, "wide", Some(FULL));
    add(&panel, "b", Some(HALF));

    assert_eq!(layout(&panel), vec![vec!["a", "b"], vec!["wide"]]);
}

#[test]
fn test_deferred_keep_relative_order() {
    let panel = panel();
    add(&panel, "a", Some(HALF));
    add(&panel, "first", Some(FULL));
    add(&panel, "second", Some(FULL));
    add(&panel, "b", Some(HALF));
    add(&panel, "c", Some(HALF));

    assert_eq!(
        layout(&panel),
        vec![vec!["a", "b"], vec!["first"], vec!["second"], vec!["c"]]
    );
}

#[test]
fn test_row_height_follows_tallest_occupant() {
    let panel = panel();
    add(&panel, "short", Some(Vec2::new(300.0, 40.0)));
    add(&panel, "tall", Some(Vec2::new(300.0, 120.0)));

    assert_eq!(row_height(&panel, 0), 120.0);
}

#[test]
fn test_repacking_is_stable() {
    let panel = panel();
    for id in ["a", "b", "c"] {
        add(&panel, id, Some(HALF));
    }
    let before = layout(&panel);
    let nodes = panel.settings.tree().lock().len();

    // Re-registering an existing id triggers a full re-pack.
    add(&panel, "b", Some(HALF));
    add(&panel, "b", Some(HALF));

    assert_eq!(layout(&panel), before);
    assert_eq!(panel.settings.tree().lock().len(), nodes);
}
