pub mod gesture;
pub mod input;
pub mod print;
pub mod shortcuts;
pub mod sync;
pub mod tools;

pub use input::{Button, InputEvent};
pub use print::{PrintHost, PrintJob, print_with};
pub use sync::{BoardEngine, Mutation, TEXT_PAYLOAD};
