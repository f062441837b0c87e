#![deny(
    unsafe_code,
    missing_docs,
    dead_code,
    unused_results,
    non_snake_case,
    unreachable_pub
)]

//! Authoritative world state for the gridpaint simulation.
//!
//! A [`World`] owns exactly one [`Grid`], picked at construction from a
//! description, a readable resource or an empty square of a given size. The
//! grid is shared with painters through [`SharedGrid`]; painters hold the
//! handle, never a copy, so every painter sees every other painter's paint.

use std::{cell::RefCell, fmt, io, path::PathBuf, rc::Rc};

use gridpaint_core::{Event, PainterId, PainterObserver, Result};
use tracing::warn;

mod grid;
pub mod loader;

pub use grid::{Grid, Tile};

/// Handle to a grid shared by the world and its painters.
///
/// One painter action holds a single mutable borrow for its whole
/// read-decide-mutate sequence. Callers must drop any `borrow()` or
/// `borrow_mut()` they hold before invoking a painter action; a borrow that
/// is still alive makes the action panic with `BorrowMutError`.
pub type SharedGrid = Rc<RefCell<Grid>>;

/// Strategy used to obtain the world's grid.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum WorldSource {
    /// Inline grid description text.
    Description(String),
    /// Path of a file holding a grid description.
    Path(PathBuf),
    /// Empty open grid with the given size.
    Empty(u32),
}

/// Hands out painter identifiers in increasing order.
#[derive(Clone, Debug, Default)]
pub struct PainterIds {
    next: u32,
}

impl PainterIds {
    /// Returns the next unused identifier.
    pub fn allocate(&mut self) -> PainterId {
        let id = PainterId::new(self.next);
        self.next = self.next.saturating_add(1);
        id
    }
}

/// Shared list of observers notified after painter actions.
#[derive(Clone, Default)]
pub struct ObserverRegistry {
    observers: Rc<RefCell<Vec<Box<dyn PainterObserver>>>>,
}

impl ObserverRegistry {
    /// Adds an observer; it sees every event raised afterwards.
    pub fn register(&self, observer: Box<dyn PainterObserver>) {
        match self.observers.try_borrow_mut() {
            Ok(mut observers) => observers.push(observer),
            Err(_) => warn!("observer registration from inside a notification was dropped"),
        }
    }

    /// Forwards `event` to every registered observer in registration order.
    pub fn notify(&self, event: &Event) {
        match self.observers.try_borrow_mut() {
            Ok(mut observers) => {
                for observer in observers.iter_mut() {
                    observer.notify(event);
                }
            }
            Err(_) => warn!(?event, "event raised from inside a notification was dropped"),
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.observers.try_borrow().map_or(0, |list| list.len())
    }

    /// Whether no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl fmt::Debug for ObserverRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverRegistry")
            .field("observers", &self.observers.try_borrow().map(|list| list.len()).ok())
            .finish()
    }
}

/// Represents the authoritative simulation world.
#[derive(Debug)]
pub struct World {
    grid: SharedGrid,
    painter_ids: PainterIds,
    observers: ObserverRegistry,
}

impl World {
    /// Creates a world from inline description text.
    pub fn from_description(description: &str) -> Result<Self> {
        loader::from_description(description).map(Self::with_grid)
    }

    /// Creates a world from a description obtained through `read`.
    pub fn from_resource<R>(locator: &str, read: R) -> Result<Self>
    where
        R: FnOnce(&str) -> io::Result<String>,
    {
        loader::from_resource(locator, read).map(Self::with_grid)
    }

    /// Creates a world from a description file.
    pub fn from_path(path: impl Into<PathBuf>) -> Result<Self> {
        loader::from_path(path.into()).map(Self::with_grid)
    }

    /// Creates a world around an empty open grid.
    pub fn empty(size: u32) -> Result<Self> {
        loader::empty(size).map(Self::with_grid)
    }

    /// Creates a world using whichever strategy `source` names.
    pub fn load(source: WorldSource) -> Result<Self> {
        match source {
            WorldSource::Description(description) => Self::from_description(&description),
            WorldSource::Path(path) => Self::from_path(path),
            WorldSource::Empty(size) => Self::empty(size),
        }
    }

    fn with_grid(grid: Grid) -> Self {
        Self {
            grid: Rc::new(RefCell::new(grid)),
            painter_ids: PainterIds::default(),
            observers: ObserverRegistry::default(),
        }
    }

    /// Shared handle to the world's grid.
    #[must_use]
    pub fn grid(&self) -> SharedGrid {
        Rc::clone(&self.grid)
    }

    /// Size of the world's grid.
    #[must_use]
    pub fn size(&self) -> u32 {
        self.grid.borrow().size()
    }

    /// Allocates the identifier for a new painter.
    pub fn next_painter_id(&mut self) -> PainterId {
        self.painter_ids.allocate()
    }

    /// Registers an observer for every painter created by this world.
    pub fn register_observer(&mut self, observer: impl PainterObserver + 'static) {
        self.observers.register(Box::new(observer));
    }

    /// Registry shared with painters created by this world.
    #[must_use]
    pub fn observers(&self) -> ObserverRegistry {
        self.observers.clone()
    }
}
