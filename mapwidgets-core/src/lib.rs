pub mod command;
pub mod completion;
pub mod container;
pub mod cursor;
pub mod error;
pub mod search;

pub use command::{
    parse_line, Arity, Command, CommandController, CommandRegistry, CommandSurface, Confirmation,
    EditOptions, EditSession, KeyDisposition, Submit, DEFAULT_CAPTION,
};
pub use completion::{complete, Completion, CompletionCycle};
pub use container::{Constraint, Container, ContainerEvent, Selectable, Transition};
pub use cursor::ScrollCursor;
pub use error::{CommandError, Result};
pub use search::{cyclic_order, cyclic_search, find_match, Direction, Predicate, SearchState};
