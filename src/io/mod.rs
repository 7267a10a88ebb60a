//! Side-effecting operations: the library file, descriptor reads,
//! interactive confirmation, and child-process launch.

pub mod descriptor;
pub mod library;
pub mod process;
pub mod prompt;
pub mod script;
