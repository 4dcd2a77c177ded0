//! The location engine: one canonical implementation of path flattening,
//! suggestion search, and the cascading editor, shared by every portal
//! surface that needs location dropdowns.

pub mod editor;
pub mod flatten;
pub mod path;
pub mod suggest;

pub use editor::{CascadingEditor, CascadingForm, EditorError, EditorState, PrimarySelection};
pub use flatten::{FlattenedOption, flatten};
pub use suggest::{suggest, suggest_scoped};
