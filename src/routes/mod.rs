pub mod health;
pub mod interviews;
pub mod pipeline;
