use crate::utils::error::{ColetorError, Result};
use std::collections::HashMap;

/// One selectable entry in a selector: `value` is the machine value that gets
/// submitted, `label` is what the user sees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OptionItem {
    pub value: String,
    pub label: String,
}

impl OptionItem {
    pub fn new(value: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            label: label.into(),
        }
    }

    /// Option whose value and label are the same string.
    pub fn same(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            value: text.clone(),
            label: text,
        }
    }
}

/// Where a level gets its options from.
#[derive(Debug, Clone)]
pub enum LevelSource {
    /// Fetched from the geography catalog, keyed by the parent selection.
    Remote,
    /// Looked up in a local static table, keyed by the parent selection.
    Static(HashMap<String, Vec<String>>),
    /// Typed by the user; the level accepts any non-empty value.
    FreeText,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LevelState {
    /// No parent selection yet ("select the previous level first").
    AwaitingParent,
    /// A remote fetch keyed by `parent` is outstanding.
    Loading { parent: String },
    /// Options are available. Nothing is selected by default.
    Ready { options: Vec<OptionItem> },
    /// The fetch failed; shown as a disabled error placeholder. Reselecting
    /// the parent retries.
    Failed,
}

#[derive(Debug)]
struct Level {
    name: &'static str,
    source: LevelSource,
    state: LevelState,
    selected: Option<OptionItem>,
}

impl Level {
    fn new(name: &'static str, source: LevelSource, state: LevelState) -> Self {
        Self {
            name,
            source,
            state,
            selected: None,
        }
    }
}

/// Handle for an outstanding remote fetch. It remembers which parent
/// selection the fetch was issued for; by the time the response arrives the
/// user may have selected something else, in which case the completion is
/// discarded instead of overwriting the newer state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    pub level: usize,
    pub parent: String,
}

/// Outcome of handing a fetch result back to the cascade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    /// The response arrived for a selection that is no longer current.
    Discarded,
}

/// Generalized N-level dependent-selector state machine. Selecting at level k
/// invalidates every deeper level; remote levels go through
/// `Loading -> Ready | Failed`, static and free-text levels resolve locally.
#[derive(Debug)]
pub struct Cascade {
    levels: Vec<Level>,
}

impl Cascade {
    /// Region and city from the remote catalog, neighborhood as free text.
    /// This is the production configuration.
    pub fn remote_two_level() -> Self {
        Self {
            levels: vec![
                Level::new(
                    "region",
                    LevelSource::Remote,
                    LevelState::Ready { options: Vec::new() },
                ),
                Level::new("city", LevelSource::Remote, LevelState::AwaitingParent),
                Level::new(
                    "neighborhood",
                    LevelSource::FreeText,
                    LevelState::AwaitingParent,
                ),
            ],
        }
    }

    /// Region and city from the remote catalog, neighborhood from a local
    /// static table keyed by city name.
    pub fn static_three_level(neighborhoods: HashMap<String, Vec<String>>) -> Self {
        Self {
            levels: vec![
                Level::new(
                    "region",
                    LevelSource::Remote,
                    LevelState::Ready { options: Vec::new() },
                ),
                Level::new("city", LevelSource::Remote, LevelState::AwaitingParent),
                Level::new(
                    "neighborhood",
                    LevelSource::Static(neighborhoods),
                    LevelState::AwaitingParent,
                ),
            ],
        }
    }

    pub fn len(&self) -> usize {
        self.levels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.levels.is_empty()
    }

    pub fn level_name(&self, level: usize) -> &'static str {
        self.levels[level].name
    }

    pub fn state(&self, level: usize) -> &LevelState {
        &self.levels[level].state
    }

    pub fn options(&self, level: usize) -> &[OptionItem] {
        match &self.levels[level].state {
            LevelState::Ready { options } => options,
            _ => &[],
        }
    }

    pub fn selected_value(&self, level: usize) -> Option<&str> {
        self.levels[level].selected.as_ref().map(|o| o.value.as_str())
    }

    pub fn selected_label(&self, level: usize) -> Option<&str> {
        self.levels[level].selected.as_ref().map(|o| o.label.as_str())
    }

    /// Starts (re)loading the root level. Any existing selection is
    /// invalidated, the whole cascade resets.
    pub fn begin_root_load(&mut self) -> FetchTicket {
        self.levels[0].selected = None;
        self.levels[0].state = LevelState::Loading {
            parent: String::new(),
        };
        self.reset_below(0);
        FetchTicket {
            level: 0,
            parent: String::new(),
        }
    }

    /// Selects `value` at `level`. All deeper levels are invalidated. If the
    /// child level is remote-sourced, it enters `Loading` and a ticket is
    /// returned; the caller performs the fetch and reports back through
    /// `complete_options`/`complete_failed`.
    pub fn select(&mut self, level: usize, value: &str) -> Result<Option<FetchTicket>> {
        let chosen = match &self.levels[level].source {
            LevelSource::FreeText => {
                let text = value.trim();
                if text.is_empty() {
                    return Err(ColetorError::Validation {
                        message: format!("{} cannot be blank", self.levels[level].name),
                    });
                }
                OptionItem::same(text)
            }
            _ => self.find_option(level, value)?,
        };

        self.levels[level].selected = Some(chosen);
        self.reset_below(level);

        let parent_value = match self.levels[level].selected.as_ref() {
            Some(option) => option.value.clone(),
            None => return Ok(None),
        };

        let child = level + 1;
        if child >= self.levels.len() {
            return Ok(None);
        }

        // Resolve the child's new state before touching it; borrows of the
        // static table and mutation of the level cannot overlap.
        let resolved = match &self.levels[child].source {
            LevelSource::Remote => None,
            LevelSource::Static(table) => Some(
                table
                    .get(&parent_value)
                    .map(|names| names.iter().map(OptionItem::same).collect())
                    .unwrap_or_default(),
            ),
            LevelSource::FreeText => Some(Vec::new()),
        };

        match resolved {
            Some(options) => {
                self.levels[child].state = LevelState::Ready { options };
                Ok(None)
            }
            None => {
                self.levels[child].state = LevelState::Loading {
                    parent: parent_value.clone(),
                };
                Ok(Some(FetchTicket {
                    level: child,
                    parent: parent_value,
                }))
            }
        }
    }

    /// Applies a successful fetch, unless the selection it was issued for is
    /// no longer current.
    pub fn complete_options(
        &mut self,
        ticket: &FetchTicket,
        options: Vec<OptionItem>,
    ) -> Completion {
        if self.is_stale(ticket) {
            return Completion::Discarded;
        }
        self.levels[ticket.level].selected = None;
        self.levels[ticket.level].state = LevelState::Ready { options };
        Completion::Applied
    }

    /// Applies a failed fetch. The root level falls back to its default empty
    /// state (prior state preserved); dependent levels show the error
    /// placeholder.
    pub fn complete_failed(&mut self, ticket: &FetchTicket) -> Completion {
        if self.is_stale(ticket) {
            return Completion::Discarded;
        }
        self.levels[ticket.level].selected = None;
        self.levels[ticket.level].state = if ticket.level == 0 {
            LevelState::Ready { options: Vec::new() }
        } else {
            LevelState::Failed
        };
        Completion::Applied
    }

    /// Drops the selection at `level` without touching its options. Used by
    /// the post-submit input reset.
    pub fn clear_selection(&mut self, level: usize) {
        self.levels[level].selected = None;
        self.reset_below(level);
    }

    fn is_stale(&self, ticket: &FetchTicket) -> bool {
        if ticket.level == 0 {
            return false;
        }
        self.selected_value(ticket.level - 1) != Some(ticket.parent.as_str())
    }

    fn find_option(&self, level: usize, value: &str) -> Result<OptionItem> {
        let options = match &self.levels[level].state {
            LevelState::Ready { options } => options,
            LevelState::AwaitingParent => {
                return Err(ColetorError::Validation {
                    message: format!(
                        "select the level above {} first",
                        self.levels[level].name
                    ),
                })
            }
            LevelState::Loading { .. } => {
                return Err(ColetorError::Validation {
                    message: format!("{} options are still loading", self.levels[level].name),
                })
            }
            LevelState::Failed => {
                return Err(ColetorError::Validation {
                    message: format!(
                        "{} options failed to load, reselect to retry",
                        self.levels[level].name
                    ),
                })
            }
        };

        options
            .iter()
            .find(|o| o.value.eq_ignore_ascii_case(value) || o.label == value)
            .cloned()
            .ok_or_else(|| ColetorError::Validation {
                message: format!("unknown {}: {}", self.levels[level].name, value),
            })
    }

    /// Clears selection and state of every level below `level`. Stale
    /// downstream options must never remain selectable.
    fn reset_below(&mut self, level: usize) {
        for deeper in self.levels.iter_mut().skip(level + 1) {
            deeper.selected = None;
            deeper.state = LevelState::AwaitingParent;
        }
    }
}
