//! Integration test: synthesized sections in host tab switching.

use graft::engine::section::{section_name, tab_name};
use graft::prefs::{shared, MemoryStore};
use graft::tree::{Fader, FixtureOptions, HostFixture, SettingsPanel, UiTree};
use graft::{EngineConfig, LabelSpec, Language, LocalText, NativeSettings};

fn injected(options: &FixtureOptions) -> (NativeSettings, HostFixture) {
    let mut tree = UiTree::new();
    let host = HostFixture::build(&mut tree, options);
    let settings = NativeSettings::init(
        tree.into_shared(),
        shared(MemoryStore::new()),
        EngineConfig::default(),
        Language::English,
    );
    settings.inject(host.settings, false).unwrap();
    (settings, host)
}

fn text(value: &str) -> LocalText {
    LocalText::new(value, "", value)
}

#[test]
fn test_registered_once_across_rebuilds() {
    let (settings, host) = injected(&FixtureOptions::default());
    let tab = settings.register_tab("mod", text("Mod"), true);
    for i in 0..5 {
        tab.create_label(LabelSpec::new(format!("l{i}"), text("x"))).unwrap();
    }

    let tree = settings.tree().lock();
    let panel = tree.get::<SettingsPanel>(host.settings).unwrap();
    assert_eq!(panel.sections().len(), 3);
    // Built once by the fixture, once on registration.
    assert_eq!(panel.init_count(), 2);
}

#[test]
fn test_fixed_bookkeeping_grows_by_exactly_one() {
    let options = FixtureOptions {
        fixed_sections: true,
        ..FixtureOptions::default()
    };
    let (settings, host) = injected(&options);
    let tab = settings.register_tab("mod", text("Mod"), true);
    tab.create_label(LabelSpec::new("a", text("a"))).unwrap();
    tab.create_label(LabelSpec::new("b", text("b"))).unwrap();

    let tree = settings.tree().lock();
    let panel = tree.get::<SettingsPanel>(host.settings).unwrap();
    assert!(panel.sections().is_fixed());
    assert_eq!(panel.sections().len(), 3);
}

#[test]
fn test_host_switches_to_synthesized_section() {
    let (settings, host) = injected(&FixtureOptions::default());
    settings.register_tab("mod", text("Mod"), true);
    settings.register_tab("other", text("Other"), true);

    let mut tree = settings.tree().lock();
    let tab = tree.find_child(host.tabs, &tab_name("mod")).unwrap();
    let section = tree.find_child(host.sections, &section_name("mod")).unwrap();
    let other = tree.find_child(host.sections, &section_name("other")).unwrap();

    assert!(tree.select_section(host.settings, tab));
    assert!(tree.is_active_self(section));
    assert!(!tree.is_active_self(other));
    assert!(!tree.is_active_self(host.sec_general));

    let indicator = tree.find_in_children::<Fader>(tab).unwrap();
    assert!(tree.get::<Fader>(indicator).unwrap().visible);

    assert!(tree.select_section(host.settings, host.tab_general));
    assert!(!tree.is_active_self(section));
    assert!(!tree.get::<Fader>(indicator).unwrap().visible);
}

#[test]
fn test_tabs_append_in_registration_order() {
    let (settings, host) = injected(&FixtureOptions::default());
    for id in ["first", "second", "third"] {
        settings.register_tab(id, text(id), true);
    }

    let tree = settings.tree().lock();
    let names: Vec<&str> = tree
        .children(host.tabs)
        .iter()
        .filter_map(|&child| tree.name(child))
        .collect();
    assert_eq!(
        names,
        vec!["Tab_General", "Tab_Audio", "Tab_first", "Tab_second", "Tab_third"]
    );
}
