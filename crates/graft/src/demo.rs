//! A tab that shows one control of every kind.

use graft_engine::{
    ButtonHandle, ButtonSpec, DropdownHandle, DropdownSpec, GraftResult, InputHandle, InputSpec,
    LabelHandle, LabelSpec, NativeSettings, SettingsTab, SliderHandle, SliderSpec, ToggleHandle,
    ToggleSpec, UiRef,
};
use graft_shared::LocalText;

/// Id of the demo tab.
pub const DEMO_TAB_ID: &str = "NSUI_DEMO";

/// Preference keys written by the demo controls.
pub mod keys {
    /// Toggle value.
    pub const ENABLED: &str = "Settings_NSUI_Demo_Enabled";
    /// Dropdown value.
    pub const MODE: &str = "Settings_NSUI_Demo_Mode";
    /// Slider value.
    pub const POWER: &str = "Settings_NSUI_Demo_Power";
    /// Input value.
    pub const TEXT: &str = "Settings_NSUI_Demo_Text";
}

/// References to the demo controls.
#[derive(Debug, Clone)]
pub struct DemoTab {
    /// The tab.
    pub tab: SettingsTab,
    /// Intro label.
    pub intro: UiRef<LabelHandle>,
    /// Logging button.
    pub ping: UiRef<ButtonHandle>,
    /// Boolean setting.
    pub enabled: UiRef<ToggleHandle>,
    /// Mode choice.
    pub mode: UiRef<DropdownHandle>,
    /// Integer setting.
    pub power: UiRef<SliderHandle>,
    /// Free text.
    pub text: UiRef<InputHandle>,
}

/// Registers the demo tab. Callbacks log at `info`.
///
/// # Errors
///
/// Returns a binding error if a control cannot be built into a live panel.
pub fn register(settings: &NativeSettings) -> GraftResult<DemoTab> {
    let tab = settings.register_tab(
        DEMO_TAB_ID,
        LocalText::new("NSUI_DEMO_TITLE", "UI 组件示例", "UI Component Demo"),
        true,
    );

    let intro = tab.create_label(LabelSpec::new(
        "label_intro",
        LocalText::new("NSUI_DEMO_LABEL_INTRO", "下面是所有组件的演示", "All controls demo below"),
    ))?;

    let ping = tab.create_button(
        ButtonSpec::new(
            "btn_ping",
            LocalText::new("NSUI_DEMO_BTN_PING", "点我输出日志", "Click to log"),
        )
        .on_click(|| tracing::info!("Demo button clicked")),
    )?;

    let enabled = tab.create_toggle(
        ToggleSpec::new(
            "toggle_enabled",
            keys::ENABLED,
            LocalText::new("NSUI_DEMO_TOGGLE_ENABLED", "启用示例开关", "Enable demo toggle"),
            true,
        )
        .on_changed(|value| tracing::info!(value, "Demo toggle changed")),
    )?;

    let mode = tab.create_dropdown(
        DropdownSpec::new(
            "dropdown_mode",
            keys::MODE,
            LocalText::new("NSUI_DEMO_DROPDOWN_MODE", "示例下拉", "Demo dropdown"),
            ["A", "B", "C"],
            "A",
        )
        .on_changed(|value| tracing::info!(%value, "Demo dropdown changed")),
    )?;

    let power = tab.create_slider_int(
        SliderSpec::new(
            "slider_power",
            keys::POWER,
            LocalText::new("NSUI_DEMO_SLIDER_POWER", "示例滑条(整数)", "Demo slider (int)"),
            0,
            100,
            50,
        )
        .on_changed(|value| tracing::info!(value, "Demo slider changed")),
    )?;

    let text = tab.create_input_string(
        InputSpec::new(
            "input_text",
            keys::TEXT,
            LocalText::new("NSUI_DEMO_INPUT_TEXT", "示例输入框", "Demo input"),
            "Hello",
        )
        .on_changed(|value| tracing::info!(%value, "Demo input changed")),
    )?;

    Ok(DemoTab {
        tab,
        intro,
        ping,
        enabled,
        mode,
        power,
        text,
    })
}
