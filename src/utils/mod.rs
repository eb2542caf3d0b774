pub(crate) mod terminal;

pub use terminal::{set_terminal_title, set_terminal_title_and_flush};
