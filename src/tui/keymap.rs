use crossterm::event::{KeyCode, KeyModifiers};

// ── Actions ──────────────────────────────────────────────────────────

/// Every discrete list-mode action. `App` decides what each one means for
/// the current selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    // Global
    Quit,
    ShowHelp,
    Reload,

    // Navigation
    FocusInput,
    MoveUp,
    MoveDown,

    // Filters
    NextFilter,
    FilterAll,
    FilterDone,
    FilterTodo,

    // Row actions
    Toggle,
    Rename,
    Delete,

    // Bulk actions
    DeleteDone,
    DeleteAll,
}

/// Groupings shown in the help overlay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HelpCategory {
    General,
    Navigation,
    Tasks,
}

impl HelpCategory {
    fn label(self) -> &'static str {
        match self {
            Self::General => "General",
            Self::Navigation => "Navigation & Filters",
            Self::Tasks => "Tasks",
        }
    }

    const ORDERED: &[Self] = &[Self::General, Self::Navigation, Self::Tasks];
}

// ── Keybinding ───────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct KeyBinding {
    pub code: KeyCode,
    pub modifiers: KeyModifiers,
    pub action: Action,
    /// Key label shown in help (e.g. `"Ctrl+C"`). Empty for aliases.
    pub label: &'static str,
    pub description: &'static str,
    pub category: HelpCategory,
}

#[derive(Debug, Clone)]
pub struct HelpEntry {
    pub label: &'static str,
    pub description: &'static str,
}

/// Key bindings for the task list. The add input and the dialog handle
/// their own keys (text editing, Enter, Esc).
pub struct KeyMap {
    pub bindings: Vec<KeyBinding>,
}

impl KeyMap {
    pub fn default_keymap() -> Self {
        Self {
            bindings: default_bindings(),
        }
    }

    pub fn lookup(&self, code: KeyCode, modifiers: KeyModifiers) -> Option<Action> {
        // Shift is already folded into the character itself ('D', '?').
        let modifiers = if matches!(code, KeyCode::Char(_)) {
            modifiers.difference(KeyModifiers::SHIFT)
        } else {
            modifiers
        };
        self.bindings
            .iter()
            .find(|kb| kb.code == code && kb.modifiers == modifiers)
            .map(|kb| kb.action)
    }

    /// Grouped help entries in display order.
    pub fn help_entries(&self) -> Vec<(&'static str, Vec<HelpEntry>)> {
        HelpCategory::ORDERED
            .iter()
            .map(|&cat| {
                let entries = self
                    .bindings
                    .iter()
                    .filter(|kb| kb.category == cat && !kb.label.is_empty())
                    .map(|kb| HelpEntry {
                        label: kb.label,
                        description: kb.description,
                    })
                    .collect();
                (cat.label(), entries)
            })
            .collect()
    }

    /// One-line hint bar for the footer.
    pub fn footer_hints() -> &'static [(&'static str, &'static str)] {
        &[
            (" a", ":add "),
            (" space", ":done "),
            (" e", ":rename "),
            (" d", ":delete "),
            (" tab", ":filter "),
            (" ?", ":help "),
            (" q", ":quit"),
        ]
    }
}

fn bind(
    code: KeyCode,
    modifiers: KeyModifiers,
    action: Action,
    label: &'static str,
    description: &'static str,
    category: HelpCategory,
) -> KeyBinding {
    KeyBinding {
        code,
        modifiers,
        action,
        label,
        description,
        category,
    }
}

fn default_bindings() -> Vec<KeyBinding> {
    use Action as A;
    use HelpCategory as C;
    use KeyCode as K;
    let none = KeyModifiers::NONE;

    vec![
        bind(K::Char('c'), KeyModifiers::CONTROL, A::Quit, "Ctrl+C", "Quit", C::General),
        bind(K::Char('q'), none, A::Quit, "q", "Quit", C::General),
        bind(K::Char('?'), none, A::ShowHelp, "?", "Toggle this help", C::General),
        bind(K::Char('r'), none, A::Reload, "r", "Reload from store", C::General),
        bind(K::Char('a'), none, A::FocusInput, "a / i", "Focus the add input", C::Navigation),
        bind(K::Char('i'), none, A::FocusInput, "", "", C::Navigation),
        bind(K::Char('k'), none, A::MoveUp, "k / Up", "Move up", C::Navigation),
        bind(K::Up, none, A::MoveUp, "", "", C::Navigation),
        bind(K::Char('j'), none, A::MoveDown, "j / Down", "Move down", C::Navigation),
        bind(K::Down, none, A::MoveDown, "", "", C::Navigation),
        bind(K::Tab, none, A::NextFilter, "Tab", "Cycle filter", C::Navigation),
        bind(K::Char('1'), none, A::FilterAll, "1", "Show all", C::Navigation),
        bind(K::Char('2'), none, A::FilterDone, "2", "Show done", C::Navigation),
        bind(K::Char('3'), none, A::FilterTodo, "3", "Show todo", C::Navigation),
        bind(K::Char(' '), none, A::Toggle, "Space", "Toggle done", C::Tasks),
        bind(K::Char('x'), none, A::Toggle, "", "", C::Tasks),
        bind(K::Char('e'), none, A::Rename, "e", "Rename task", C::Tasks),
        bind(K::Char('d'), none, A::Delete, "d", "Delete task", C::Tasks),
        bind(K::Char('D'), none, A::DeleteDone, "D", "Delete done tasks", C::Tasks),
        bind(K::Char('X'), none, A::DeleteAll, "X", "Delete all tasks", C::Tasks),
    ]
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_quit_variants() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(KeyCode::Char('q'), KeyModifiers::NONE),
            Some(Action::Quit)
        );
        assert_eq!(
            km.lookup(KeyCode::Char('c'), KeyModifiers::CONTROL),
            Some(Action::Quit)
        );
    }

    #[test]
    fn shifted_letters_match_with_shift_modifier() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(KeyCode::Char('D'), KeyModifiers::SHIFT),
            Some(Action::DeleteDone)
        );
        assert_eq!(
            km.lookup(KeyCode::Char('X'), KeyModifiers::SHIFT),
            Some(Action::DeleteAll)
        );
    }

    #[test]
    fn plain_c_is_not_quit() {
        let km = KeyMap::default_keymap();
        assert_eq!(km.lookup(KeyCode::Char('c'), KeyModifiers::NONE), None);
    }

    #[test]
    fn aliases_share_actions() {
        let km = KeyMap::default_keymap();
        assert_eq!(
            km.lookup(KeyCode::Down, KeyModifiers::NONE),
            km.lookup(KeyCode::Char('j'), KeyModifiers::NONE)
        );
        assert_eq!(
            km.lookup(KeyCode::Char('x'), KeyModifiers::NONE),
            Some(Action::Toggle)
        );
    }

    #[test]
    fn help_hides_aliases_and_covers_categories() {
        let km = KeyMap::default_keymap();
        let entries = km.help_entries();
        let labels: Vec<&str> = entries.iter().map(|(l, _)| *l).collect();
        assert_eq!(labels, ["General", "Navigation & Filters", "Tasks"]);
        for (_, group) in &entries {
            assert!(group.iter().all(|e| !e.label.is_empty()));
        }
    }
}
