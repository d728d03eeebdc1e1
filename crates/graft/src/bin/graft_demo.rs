//! # Graft Demo
//!
//! Builds a simulated host settings panel, lets its controller appear a few
//! frames after the scene loads, and walks through the demo tab:
//!
//! Scene load → Attach → Inject → Click / Change → Language switch
//!
//! Run with: `cargo run --bin graft_demo [prefs.toml] [config.toml]`

use std::path::PathBuf;

use graft::demo;
use graft::prefs::{shared, FileStoreConfig, MemoryStore, SharedStore, TomlFileStore};
use graft::tree::{
    ControllerKind, FixtureOptions, HostFixture, LocalisationManager, NodeId, UiTree,
};
use graft::{EngineConfig, GraftResult, Language, NativeSettings, Runtime, SceneId};

/// Frames the host takes to create its menu controller.
const CONTROLLER_DELAY: u32 = 5;

fn main() {
    if let Err(err) = run() {
        eprintln!("graft_demo failed: {err}");
        std::process::exit(1);
    }
}

fn open_store() -> GraftResult<SharedStore> {
    match std::env::args().nth(1).map(PathBuf::from) {
        Some(path) => {
            let store = TomlFileStore::open(&path, FileStoreConfig::default())?;
            println!("  Prefs:    {}", path.display());
            Ok(shared(store))
        }
        None => {
            println!("  Prefs:    in memory");
            Ok(shared(MemoryStore::new()))
        }
    }
}

fn load_config() -> GraftResult<EngineConfig> {
    match std::env::args().nth(2).map(PathBuf::from) {
        Some(path) => {
            let config = EngineConfig::load(&path)?;
            println!("  Config:   {}", path.display());
            Ok(config)
        }
        None => Ok(EngineConfig::default()),
    }
}

fn run() -> GraftResult<()> {
    println!("═══════════════════════════════════════════════════════════════");
    println!("                     GRAFT NATIVE SETTINGS DEMO");
    println!("═══════════════════════════════════════════════════════════════");

    let mut tree = UiTree::new();
    let options = FixtureOptions {
        controller: None,
        ..FixtureOptions::default()
    };
    let host = HostFixture::build(&mut tree, &options);

    let settings = NativeSettings::init(
        tree.into_shared(),
        open_store()?,
        load_config()?,
        Language::English,
    );
    let controls = demo::register(&settings)?;
    let mut runtime = Runtime::with_tree_probe(settings.clone());

    // =========================================================================
    // ATTACH
    // =========================================================================
    runtime.on_scene_loaded(SceneId(1));
    runtime.run(CONTROLLER_DELAY);
    {
        let mut tree = settings.tree().lock();
        HostFixture::attach_controller(&mut tree, host.root, host.settings, ControllerKind::Menu);
    }
    let report = runtime.tick();
    for injection in &report.injected {
        println!(
            "  Injected: {} {:?} after {} frames -> {:?}",
            injection.scene, injection.kind, CONTROLLER_DELAY, injection.outcome
        );
    }
    if let Some(err) = report.failures.into_iter().next() {
        return Err(err);
    }

    print_section(&settings, host.sections);

    // =========================================================================
    // INTERACT
    // =========================================================================
    println!();
    if let Some(ping) = controls.ping.get() {
        println!("  Click:    {}", ping.click());
    }
    if let Some(enabled) = controls.enabled.get() {
        enabled.set(false);
        println!("  Toggle:   {:?}", enabled.value());
    }
    if let Some(mode) = controls.mode.get() {
        mode.select("C");
        println!("  Dropdown: {:?} of {:?}", mode.value(), mode.options());
    }
    if let Some(power) = controls.power.get() {
        power.set(250);
        println!("  Slider:   {:?} in {:?}", power.value(), power.range());
    }
    if let Some(text) = controls.text.get() {
        text.submit("Graft");
        println!("  Input:    {:?}", text.text());
    }

    // =========================================================================
    // LANGUAGE
    // =========================================================================
    {
        let mut tree = settings.tree().lock();
        if let Some(manager) = tree.get_mut::<LocalisationManager>(host.root) {
            manager.current = Some(Language::ChineseSimplified);
        }
    }
    let interval = settings.config().attach.language_poll_interval;
    let report = runtime.run(interval + 1);
    println!();
    println!("  Language: {:?}", report.language);
    if let Some(intro) = controls.intro.get() {
        println!("  Intro:    {:?}", intro.text());
    }

    settings.shutdown()?;
    println!();
    println!("  Stats:    {:?}", runtime.stats());
    Ok(())
}

fn print_section(settings: &NativeSettings, sections: NodeId) {
    let tree = settings.tree().lock();
    let name = graft::engine::section::section_name(demo::DEMO_TAB_ID);
    let Some(section) = tree.find_child(sections, &name) else {
        println!("  Section {name} missing");
        return;
    };

    println!();
    println!("  {name}");
    for &child in tree.children(section) {
        let state = if tree.is_active_self(child) { "on " } else { "off" };
        println!("    [{state}] {}", tree.name(child).unwrap_or("?"));
    }
}
