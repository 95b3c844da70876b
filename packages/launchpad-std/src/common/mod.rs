pub mod milliseconds;

pub use milliseconds::Milliseconds;
