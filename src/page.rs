//! Host page abstraction: viewport, display surface, scroll container and UI affordances.

use std::collections::{BTreeSet, HashMap};

use crate::render::surface::Surface;
use crate::scroll::ContainerMetrics;
use crate::viewport::Viewport;

/// A style mutation applied to an affordance element.
#[derive(Clone, Debug, PartialEq)]
pub enum StyleChange {
    /// Set the element width as a percentage of its parent.
    WidthPercent(f64),
    /// Set the element opacity in `[0, 1]`.
    Opacity(f64),
    /// Add a class.
    AddClass(&'static str),
    /// Remove a class.
    RemoveClass(&'static str),
    /// Remove the element from layout (`display: none`).
    Hide,
}

/// The document the player is mounted in.
///
/// Every lookup may fail; a missing element never aborts the player.
pub trait Page {
    /// Display surface type provided by this page.
    type Surface: Surface;

    /// Current logical viewport and device pixel ratio.
    fn viewport(&self) -> Viewport;

    /// Hand over the display surface with identifier `id`, if the page has one.
    fn take_surface(&mut self, id: &str) -> Option<Self::Surface>;

    /// Position and height of the element matching `selector`.
    fn container_metrics(&self, selector: &str) -> Option<ContainerMetrics>;

    /// Apply `change` to the element matching `selector`. Returns `false` when it is absent.
    fn apply(&mut self, selector: &str, change: StyleChange) -> bool;
}

/// Style state of an element in a [`MemoryPage`].
#[derive(Clone, Debug, PartialEq)]
pub struct ElementState {
    /// Last width set, in percent.
    pub width_percent: Option<f64>,
    /// Last opacity set.
    pub opacity: Option<f64>,
    /// Current classes.
    pub classes: BTreeSet<String>,
    /// Whether the element still takes part in layout.
    pub displayed: bool,
}

impl Default for ElementState {
    fn default() -> Self {
        Self {
            width_percent: None,
            opacity: None,
            classes: BTreeSet::new(),
            displayed: true,
        }
    }
}

impl ElementState {
    /// Whether the element carries `class`.
    pub fn has_class(&self, class: &str) -> bool {
        self.classes.contains(class)
    }
}

/// In-memory [`Page`] used by the command-line tool and tests.
#[derive(Debug)]
pub struct MemoryPage<S> {
    viewport: Viewport,
    surfaces: HashMap<String, S>,
    containers: HashMap<String, ContainerMetrics>,
    elements: HashMap<String, ElementState>,
}

impl<S> MemoryPage<S> {
    /// Empty page with the given viewport.
    pub fn new(viewport: Viewport) -> Self {
        Self {
            viewport,
            surfaces: HashMap::new(),
            containers: HashMap::new(),
            elements: HashMap::new(),
        }
    }

    /// Add a display surface under `id`.
    pub fn with_surface(mut self, id: impl Into<String>, surface: S) -> Self {
        self.surfaces.insert(id.into(), surface);
        self
    }

    /// Add a scroll-tracking container under `selector`.
    pub fn with_container(mut self, selector: impl Into<String>, metrics: ContainerMetrics) -> Self {
        self.containers.insert(selector.into(), metrics);
        self
    }

    /// Add an affordance element under `selector`.
    pub fn with_element(mut self, selector: impl Into<String>) -> Self {
        self.elements.insert(selector.into(), ElementState::default());
        self
    }

    /// Change the viewport, as a window resize would.
    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    /// Move or resize a container; `None` removes it.
    pub fn set_container(&mut self, selector: &str, metrics: Option<ContainerMetrics>) {
        match metrics {
            Some(m) => {
                self.containers.insert(selector.to_string(), m);
            }
            None => {
                self.containers.remove(selector);
            }
        }
    }

    /// Style state of the element under `selector`.
    pub fn element(&self, selector: &str) -> Option<&ElementState> {
        self.elements.get(selector)
    }
}

impl<S: Surface> Page for MemoryPage<S> {
    type Surface = S;

    fn viewport(&self) -> Viewport {
        self.viewport
    }

    fn take_surface(&mut self, id: &str) -> Option<S> {
        self.surfaces.remove(id)
    }

    fn container_metrics(&self, selector: &str) -> Option<ContainerMetrics> {
        self.containers.get(selector).copied()
    }

    fn apply(&mut self, selector: &str, change: StyleChange) -> bool {
        let Some(el) = self.elements.get_mut(selector) else {
            return false;
        };
        match change {
            StyleChange::WidthPercent(w) => el.width_percent = Some(w),
            StyleChange::Opacity(o) => el.opacity = Some(o),
            StyleChange::AddClass(c) => {
                el.classes.insert(c.to_string());
            }
            StyleChange::RemoveClass(c) => {
                el.classes.remove(c);
            }
            StyleChange::Hide => el.displayed = false,
        }
        true
    }
}
