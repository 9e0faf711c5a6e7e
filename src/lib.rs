pub mod about;
pub mod contact;
pub mod content;
pub mod frontend;
pub mod hero;
pub mod icons;
pub mod media;
pub mod motion;
pub mod reveal;
pub mod showcase;

#[cfg(target_arch = "wasm32")]
pub use frontend::run;
