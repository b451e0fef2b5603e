use ocrpanel_types::MacroStatus;

/// Enablement of the three control buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ButtonStates {
    pub start: bool,
    pub pause: bool,
    pub stop: bool,
}

/// Which control buttons can be pressed in a given macro state
pub fn button_states(status: MacroStatus) -> ButtonStates {
    match status {
        MacroStatus::Stopped => ButtonStates {
            start: true,
            pause: false,
            stop: false,
        },
        MacroStatus::Running => ButtonStates {
            start: false,
            pause: true,
            stop: true,
        },
        MacroStatus::Paused => ButtonStates {
            start: true,
            pause: false,
            stop: true,
        },
    }
}

/// `Status: Running` style label
pub fn status_label(status: MacroStatus) -> String {
    let name = status.as_str();
    let mut chars = name.chars();
    let capitalized = match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect::<String>(),
        None => String::new(),
    };
    format!("Status: {capitalized}")
}
