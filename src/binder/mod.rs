//! Edit binder: which action each control event triggers, and when

pub(crate) mod debounce;

use std::collections::HashMap;

use tracing::trace;

use crate::controls::{ControlKey, ControlTree, Trigger};
use crate::model::Orientation;
use crate::render::theme::Theme;
pub(crate) use debounce::Debouncer;

/// When the deferred part of an action runs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Timing {
    /// Apply and render inside the event
    Immediate,
    /// Do the cheap write now; apply and render after the debounce window
    Debounced,
}

/// What an event on a control does to the dashboard
#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) enum Action {
    /// Read every control into the model, optionally rebuild series controls, render
    CommitSettings { rebuild: bool },
    /// Write one series' fill and stroke from its color input and render
    CommitColor(usize),
    /// Write one series' axis binding from its toggle
    SetAxisBinding(usize),
    /// Recompute visibility and the mix panel for the new type
    ChartTypeChanged,
    SetOrientation(Orientation),
    /// No immediate write beyond the control value itself
    Refresh,
    AddSeries,
    RemoveSeries,
    ApplyPalette,
    SwapAxisTitles,
    SetTheme(Theme),
    Reset,
    Export,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub(crate) struct Listener {
    pub(crate) action: Action,
    pub(crate) timing: Timing,
}

impl Listener {
    fn immediate(action: Action) -> Self {
        Self {
            action,
            timing: Timing::Immediate,
        }
    }

    fn debounced(action: Action) -> Self {
        Self {
            action,
            timing: Timing::Debounced,
        }
    }
}

/// Listener table for the current control tree
#[derive(Debug, Default)]
pub(crate) struct Binder {
    listeners: HashMap<(ControlKey, Trigger), Listener>,
    bound_generation: Option<u64>,
}

impl Binder {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Drop every listener and install fresh ones for each live control in `tree`
    pub(crate) fn bind(&mut self, tree: &ControlTree) {
        self.listeners.clear();
        for key in tree.keys() {
            for (trigger, listener) in listeners_for(key) {
                self.listeners.insert((key, trigger), listener);
            }
        }
        self.bound_generation = Some(tree.generation);
        trace!(
            listeners = self.len(),
            generation = tree.generation,
            "bound controls"
        );
    }

    /// Whether `tree` has been resynthesized since the last bind
    pub(crate) fn is_stale(&self, tree: &ControlTree) -> bool {
        self.bound_generation != Some(tree.generation)
    }

    pub(crate) fn listener(&self, key: ControlKey, trigger: Trigger) -> Option<Listener> {
        self.listeners.get(&(key, trigger)).copied()
    }

    pub(crate) fn len(&self) -> usize {
        self.listeners.len()
    }
}

/// Listeners a control gets when bound
fn listeners_for(key: ControlKey) -> Vec<(Trigger, Listener)> {
    use Trigger::{Blur, Change, Click, Input};

    match key {
        ControlKey::SeriesName(_) | ControlKey::SeriesData(_) => {
            vec![(Blur, Listener::immediate(Action::CommitSettings { rebuild: true }))]
        }
        ControlKey::SeriesNameDone(_) => {
            vec![(Click, Listener::immediate(Action::CommitSettings { rebuild: true }))]
        }
        ControlKey::SeriesColor(i) => vec![(Input, Listener::immediate(Action::CommitColor(i)))],
        ControlKey::SeriesRightAxis(i) => {
            vec![(Change, Listener::debounced(Action::SetAxisBinding(i)))]
        }
        ControlKey::MixedType(_) | ControlKey::MixedMarker(_) | ControlKey::MixedFill(_) => {
            vec![(Change, Listener::debounced(Action::Refresh))]
        }
        ControlKey::MixedWidth(_)
        | ControlKey::DonutCutout
        | ControlKey::PieRadius
        | ControlKey::AreaOpacity
        | ControlKey::HistBins => vec![
            (Input, Listener::debounced(Action::Refresh)),
            (Change, Listener::debounced(Action::Refresh)),
        ],
        ControlKey::LabelsInput
        | ControlKey::ChartTitle
        | ControlKey::XAxisTitle
        | ControlKey::YAxisLeftTitle
        | ControlKey::YAxisRightTitle => {
            vec![(Blur, Listener::immediate(Action::CommitSettings { rebuild: false }))]
        }
        ControlKey::ChartType => vec![(Change, Listener::debounced(Action::ChartTypeChanged))],
        ControlKey::OrientationVertical => vec![(
            Click,
            Listener::debounced(Action::SetOrientation(Orientation::Vertical)),
        )],
        ControlKey::OrientationHorizontal => vec![(
            Click,
            Listener::debounced(Action::SetOrientation(Orientation::Horizontal)),
        )],
        ControlKey::PaletteSelect | ControlKey::SingleSeries => {
            vec![(Change, Listener::debounced(Action::Refresh))]
        }
        ControlKey::AxisSwap => vec![(Click, Listener::immediate(Action::SwapAxisTitles))],
        ControlKey::ApplyPalette => vec![(Click, Listener::immediate(Action::ApplyPalette))],
        ControlKey::AddDataset => vec![(Click, Listener::immediate(Action::AddSeries))],
        ControlKey::RemoveDataset => vec![(Click, Listener::immediate(Action::RemoveSeries))],
        ControlKey::ThemeLight => vec![(Click, Listener::immediate(Action::SetTheme(Theme::Light)))],
        ControlKey::ThemeDark => vec![(Click, Listener::immediate(Action::SetTheme(Theme::Dark)))],
        ControlKey::Reset => vec![(Click, Listener::immediate(Action::Reset))],
        ControlKey::ExportImage => vec![(Click, Listener::immediate(Action::Export))],
        // read at export time
        ControlKey::ExportType | ControlKey::ExportScale | ControlKey::ExportBackground => {
            Vec::new()
        }
    }
}
